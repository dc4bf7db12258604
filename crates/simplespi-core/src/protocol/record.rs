//! Hex records and patches
//!
//! Bulk data moves in 8-byte records. Input and capture files hold one
//! record per line, hex encoded. The device consumes records in patches of
//! 128 (1 KiB), which is also the granularity of its write acknowledgements.

use std::io::BufRead;

use crate::error::{Error, Result};

/// Bytes per bulk exchange
pub const RECORD_SIZE: usize = 8;

/// Records per patch
pub const PATCH_RECORDS: usize = 128;

/// Bytes per patch
pub const PATCH_SIZE: usize = RECORD_SIZE * PATCH_RECORDS;

/// Decode a hex string into bytes
pub fn parse_hex(s: &str) -> core::result::Result<Vec<u8>, String> {
    if s.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", s.len()));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            s.get(i..i + 2)
                .filter(|pair| pair.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hex at column {}", i + 1))
        })
        .collect()
}

/// Encode bytes as lower-case hex
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Read every record of an input file
///
/// Surrounding whitespace is ignored and blank lines are skipped.
pub fn load_records<R: BufRead>(reader: R) -> Result<Vec<Vec<u8>>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = parse_hex(line).map_err(|reason| Error::InvalidRecord {
            line: idx + 1,
            reason,
        })?;
        if record.len() != RECORD_SIZE {
            log::warn!(
                "Line {}: record is {} bytes, expected {}",
                idx + 1,
                record.len(),
                RECORD_SIZE
            );
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            parse_hex("0011aaFF").unwrap(),
            vec![0x00, 0x11, 0xAA, 0xFF]
        );
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0xDE, 0xAD, 0x00, 0x01]), "dead0001");
    }

    #[test]
    fn test_load_records() {
        let input = "0001020304050607\n\n08090a0b0c0d0e0f  \n";
        let records = load_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], vec![8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_load_records_reports_line() {
        let input = "0001020304050607\nnot-hex!\n";
        match load_records(input.as_bytes()) {
            Err(Error::InvalidRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

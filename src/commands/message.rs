//! Direct-message command

use simplespi_core::protocol::message;
use simplespi_core::protocol::record::to_hex;
use simplespi_core::SpiBridge;

/// Build the message to send from the command line
///
/// A positive `length` wins over the tokens. The result is padded to whole
/// chunks.
pub fn build_payload(tokens: &[String], length: Option<usize>) -> Vec<u8> {
    let raw = match length {
        Some(len) => message::from_length(len),
        None => message::from_tokens(tokens),
    };
    message::pad(raw)
}

/// Format the bytes the device shifted out during one chunk
pub fn format_echo(echoed: &[u8]) -> String {
    format!("Got {} \"{}\"", to_hex(echoed), echoed.escape_ascii())
}

/// Send a direct message in 4-byte chunks, printing what comes back
pub fn run_message(
    bridge: &mut dyn SpiBridge,
    tokens: &[String],
    length: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = build_payload(tokens, length);
    log::debug!("Sending {} bytes: {:?}", payload.len(), payload.escape_ascii().to_string());

    let chunks = message::exchange_chunks(bridge, &payload, |echoed| {
        println!("{}", format_echo(echoed))
    })?;
    log::debug!("{} exchanges", chunks);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_payload() {
        let tokens = vec!["ab".to_string(), "cde".to_string()];
        assert_eq!(build_payload(&tokens, None), b"abcde...");
        assert_eq!(build_payload(&tokens, Some(6)), b"012345..");
        assert_eq!(build_payload(&["1234".to_string()], None), b"1234");
    }

    #[test]
    fn test_format_echo() {
        assert_eq!(format_echo(b"1234"), "Got 31323334 \"1234\"");
        assert_eq!(format_echo(&[0x00, 0x41, 0xff, 0x22]), "Got 0041ff22 \"\\x00A\\xff\\\"\"");
    }
}

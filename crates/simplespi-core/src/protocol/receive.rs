//! Memory read-back
//!
//! The host clocks data out of the device with empty writes. The device
//! stages data in chunks of up to 1 KiB and has no way to say when a chunk
//! is ready, so the host waits a fixed time between chunks.
//!
//! The device dumps everything its memory controller answered, in order:
//!
//! 1. write acknowledgements, one record per 1 KiB patch previously written
//! 2. the payload
//! 3. whatever uninitialised memory follows
//!
//! [`TrimWindow`] cuts the payload out of such a capture.

use std::io::Write;
use std::time::Duration;

use crate::bridge::SpiBridge;
use crate::error::Result;
use crate::protocol::record::{to_hex, PATCH_SIZE, RECORD_SIZE};

/// Largest amount of data requested before pausing
pub const READ_CHUNK_SIZE: usize = 1024;

/// Pause after each chunk so the device can stage the next one
pub const CHUNK_DELAY: Duration = Duration::from_millis(100);

/// File name of the raw capture
pub const RAW_CAPTURE_FILE: &str = "receive.txt";

/// File name of the trimmed capture
pub const TRIMMED_CAPTURE_FILE: &str = "receive_trim.txt";

/// Read `total` bytes from the device as hex lines into `out`
///
/// Each 8-byte record is byte-reversed before it is written. `on_chunk` is
/// called with the size of every chunk before it is read. Returns the number
/// of lines written.
pub fn capture<B, W, F>(bridge: &mut B, total: usize, out: &mut W, mut on_chunk: F) -> Result<usize>
where
    B: SpiBridge + ?Sized,
    W: Write,
    F: FnMut(usize),
{
    let mut bytes_left = total;
    let mut lines = 0;

    while bytes_left > 0 {
        let chunk = bytes_left.min(READ_CHUNK_SIZE);
        on_chunk(chunk);

        for _ in 0..chunk / RECORD_SIZE {
            let mut record = bridge.exchange(&[], RECORD_SIZE)?;
            record.reverse();
            writeln!(out, "{}", to_hex(&record))?;
            lines += 1;
        }

        bytes_left -= chunk;
        bridge.delay(CHUNK_DELAY);
    }

    out.flush()?;
    Ok(lines)
}

/// Line range of a capture that holds the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimWindow {
    /// First payload line (number of write acknowledgements)
    pub head: usize,
    /// One past the last payload line
    pub tail: usize,
}

impl TrimWindow {
    /// Window for a payload of `payload` bytes
    ///
    /// The payload was written in 1 KiB patches, each leaving one
    /// acknowledgement record in front of the data.
    pub fn for_payload(payload: usize) -> Self {
        let head = payload / PATCH_SIZE;
        Self {
            head,
            tail: payload / RECORD_SIZE + head,
        }
    }

    /// Number of payload lines
    pub fn len(&self) -> usize {
        self.tail.saturating_sub(self.head)
    }

    /// Whether the window selects nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract the payload lines of a raw capture
///
/// Lines are joined with `\n` and the result has no trailing newline. A
/// capture shorter than the window yields what is there.
pub fn trim_capture(raw: &str, window: TrimWindow) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    if window.tail > lines.len() {
        log::warn!(
            "Capture has {} lines, payload needs lines {}..{}",
            lines.len(),
            window.head,
            window.tail
        );
    }
    let tail = window.tail.min(lines.len());
    if window.head >= tail {
        return String::new();
    }
    lines[window.head..tail].join("\n")
}

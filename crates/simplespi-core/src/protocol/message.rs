//! Direct messages
//!
//! A direct message is plain ASCII sent in 4-byte chunks, one full-duplex
//! exchange per chunk. Whatever the device shifts out during the chunk is
//! handed back to the caller.

use crate::bridge::SpiBridge;
use crate::error::Result;

/// Bytes per direct-message exchange
pub const CHUNK_SIZE: usize = 4;

/// Byte used to pad a message to a whole number of chunks
pub const FILLER: u8 = b'.';

/// Message sent when no tokens are given
pub const DEFAULT_MESSAGE: &str = "1234";

const NIBBLES: &[u8; 16] = b"0123456789abcdef";

/// Build a message from command-line tokens
///
/// Tokens are concatenated as given, without separators.
pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<u8> {
    tokens
        .iter()
        .flat_map(|t| t.as_ref().bytes())
        .collect()
}

/// Build a test message of `len` characters: `0123456789abcdef0123...`
pub fn from_length(len: usize) -> Vec<u8> {
    (0..len).map(|i| NIBBLES[i & 0xF]).collect()
}

/// Pad a message with [`FILLER`] up to a multiple of [`CHUNK_SIZE`]
pub fn pad(mut message: Vec<u8>) -> Vec<u8> {
    let filled = message.len() % CHUNK_SIZE;
    if filled != 0 {
        message.resize(message.len() + CHUNK_SIZE - filled, FILLER);
    }
    message
}

/// Send a padded message chunk by chunk
///
/// `on_echo` receives the bytes read back during each chunk. Returns the
/// number of exchanges performed.
pub fn exchange_chunks<B, F>(bridge: &mut B, payload: &[u8], mut on_echo: F) -> Result<usize>
where
    B: SpiBridge + ?Sized,
    F: FnMut(&[u8]),
{
    let mut count = 0;
    for chunk in payload.chunks(CHUNK_SIZE) {
        let echoed = bridge.exchange(chunk, 0)?;
        log::trace!("Sent {:02x?}, got {:02x?}", chunk, echoed);
        on_echo(&echoed);
        count += 1;
    }
    Ok(count)
}

//! Error types for simplespi-core

use thiserror::Error;

/// Errors raised while driving the link
#[derive(Debug, Error)]
pub enum Error {
    /// The bridge backend failed (not found, permissions, USB transfer)
    #[error("bridge error: {0}")]
    Bridge(String),

    /// A record in an input file is not valid hex
    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord {
        /// 1-based line number in the input file
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// No exchange of a whole patch returned the expected echo
    #[error("echo mismatch: patch {patch} was never acknowledged (expected {expected})")]
    EchoMismatch {
        /// Index of the patch whose echo was expected
        patch: usize,
        /// Expected echo word, hex encoded
        expected: String,
    },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for link operations
pub type Result<T> = std::result::Result<T, Error>;

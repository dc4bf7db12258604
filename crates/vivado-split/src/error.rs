//! Error types for the source patcher

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::edit::Edit;

/// Result type for patch operations
pub type Result<T> = std::result::Result<T, PatchError>;

/// Errors that can occur while patching sources
#[derive(Debug, Error)]
pub enum PatchError {
    /// Reading or writing a file failed
    #[error("{}: {source}", .path.display())]
    Io {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The patch database is not valid RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The patch database parsed but makes no sense
    #[error("Invalid patch database: {0}")]
    Validation(String),

    /// An edit addressed a line the buffer does not have
    #[error("{edit} is out of range ({len} lines)")]
    OutOfRange {
        /// The offending edit
        edit: Edit,
        /// Buffer length when the edit ran
        len: usize,
    },

    /// An edit of a target failed
    #[error("{target}, step {step}: {source}")]
    Target {
        /// Target name
        target: String,
        /// 1-based step number
        step: usize,
        /// What went wrong
        source: Box<PatchError>,
    },
}

impl PatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PatchError::Io {
            path: path.into(),
            source,
        }
    }
}

//! Store errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or saving the todo/notes files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File content could not be interpreted.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// In-memory state could not be rendered for writing.
    #[error("Failed to serialize store data: {0}")]
    Serialize(String),
}

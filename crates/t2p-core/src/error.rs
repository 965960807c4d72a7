//! Service errors.

use thiserror::Error;
use uuid::Uuid;

use t2p_store::StoreError;

/// Errors from todo/note service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Todo item not found: {0}")]
    TodoNotFound(Uuid),

    #[error("Note not found: {0}")]
    NoteNotFound(Uuid),

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

//! Assistant errors.

use thiserror::Error;

use t2p_core::ServiceError;
use t2p_protocols::LlmError;

/// Errors from the note assistant flows, which cross the LLM, HTTP, and
/// service layers.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Web page fetch failure during capture.
    #[error("Failed to fetch page: {0}")]
    Http(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_is_transparent() {
        let err = AssistError::from(LlmError::Disabled);
        assert_eq!(err.to_string(), LlmError::Disabled.to_string());
    }

    #[test]
    fn test_http_error_display() {
        let err = AssistError::Http("404".to_string());
        assert!(err.to_string().contains("404"));
    }
}

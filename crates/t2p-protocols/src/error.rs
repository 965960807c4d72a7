//! Cross-crate error types.

use thiserror::Error;

/// Errors from LLM transport and response handling.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure reaching the endpoint.
    #[error("LLM network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the endpoint.
    #[error("LLM API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Reply body did not carry the expected `response` field.
    #[error("Unexpected LLM response format: {0}")]
    UnexpectedResponse(String),

    /// No parseable JSON payload in the model output.
    #[error("Failed to extract structured data from LLM output: {0}")]
    Extract(String),

    /// Response cache read/write failure.
    #[error("LLM cache error: {0}")]
    Cache(String),

    /// LLM use is switched off in configuration.
    #[error("LLM assistance is disabled")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("503"));
        assert!(display.contains("overloaded"));
    }

    #[test]
    fn test_all_variants_display() {
        let errors = vec![
            LlmError::Network("refused".to_string()),
            LlmError::Api {
                status: 500,
                message: "m".to_string(),
            },
            LlmError::UnexpectedResponse("body".to_string()),
            LlmError::Extract("no json".to_string()),
            LlmError::Cache("denied".to_string()),
            LlmError::Disabled,
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}

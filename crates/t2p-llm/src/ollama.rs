//! Ollama-style LLM client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use t2p_protocols::{LlmClient, LlmError};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Generate request body for `/api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Reply body; fields other than `response` are ignored.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Client for a local Ollama-compatible `/api/generate` endpoint.
pub struct OllamaClient {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_endpoint(model, DEFAULT_ENDPOINT)
    }

    /// Create a client with a custom endpoint (tests, remote hosts).
    pub fn with_endpoint(model: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn id(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(model = %self.model, chars = prompt.len(), "Calling LLM");

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(e.to_string()))?;

        reply
            .response
            .ok_or_else(|| LlmError::UnexpectedResponse("missing `response` field".to_string()))
    }
}

#[cfg(test)]
#[path = "ollama_tests.rs"]
mod tests;

//! LLM client trait.

use async_trait::async_trait;

use crate::error::LlmError;

/// Text-in, text-out seam between the enrichment middleware and whatever
/// serves the completions. Implementations are used as `Arc<dyn LlmClient>`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Identifier for logs and diagnostics.
    fn id(&self) -> &str;

    /// Send a prompt and return the raw completion text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

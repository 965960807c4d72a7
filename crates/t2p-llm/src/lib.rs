//! # t2p LLM
//!
//! Enrichment middleware for the t2p CLI: an Ollama-style HTTP client, JSON
//! extraction from model output with deterministic fallbacks, a disk cache
//! for todo suggestions, note generation/summarization, and web-page
//! capture.
//!
//! Everything downstream of [`t2p_protocols::LlmClient`] treats the model
//! as text-in/text-out; structure is recovered by [`extract`] and degraded
//! gracefully when the model misbehaves.

mod assistant;
mod error;
pub mod extract;
mod middleware;
mod ollama;
mod web;

pub use assistant::NoteAssistant;
pub use error::AssistError;
pub use middleware::{DisabledLlm, LlmMiddleware, NoteSuggestion, SummaryLength, TodoSuggestion};
pub use ollama::OllamaClient;
pub use web::{PageCapture, WebCapture};

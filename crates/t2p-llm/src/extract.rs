//! JSON extraction from freeform LLM output.
//!
//! Models are asked for JSON but reply with prose, code fences, or both.
//! Candidates are tried in order: a ```json fence, a bare ``` fence, then
//! the widest `{...}` brace span.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use t2p_protocols::LlmError;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*\n(.*?)\n```").unwrap());
static BARE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```\s*\n(.*?)\n```").unwrap());
static BRACE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Pull the first JSON payload out of `text` and deserialize it.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let candidate = JSON_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .or_else(|| {
            BARE_FENCE
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
        })
        .or_else(|| BRACE_SPAN.find(text).map(|m| m.as_str()))
        .ok_or_else(|| LlmError::Extract("no JSON payload in output".to_string()))?;

    serde_json::from_str(candidate).map_err(|e| LlmError::Extract(e.to_string()))
}

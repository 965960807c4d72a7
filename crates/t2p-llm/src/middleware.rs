//! Enrichment middleware: freeform text in, structured suggestions out.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use t2p_protocols::todo::{Horizon, Priority, TodoDraft, TodoStatus};
use t2p_protocols::{LlmClient, LlmError};

use crate::extract::extract_json;

/// Structured todo suggestion recovered from model output.
///
/// `title`, `tags`, and `priority` are required; a reply missing any of
/// them is treated as a failed extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoSuggestion {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    pub priority: Priority,
    #[serde(default)]
    pub horizon: Horizon,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub rationale: String,
}

impl TodoSuggestion {
    /// Convert into the draft the todo service accepts.
    pub fn into_draft(self) -> TodoDraft {
        let mut draft = TodoDraft::new(self.title)
            .with_priority(self.priority)
            .with_horizon(self.horizon)
            .with_status(self.status)
            .with_tags(self.tags);
        if !self.description.trim().is_empty() {
            draft = draft.with_description(self.description);
        }
        if !self.category.trim().is_empty() {
            draft = draft.with_category(self.category);
        }
        draft
    }
}

/// Structured note suggestion recovered from model output.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteSuggestion {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
}

/// Target summary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn word_count(&self) -> usize {
        match self {
            SummaryLength::Short => 50,
            SummaryLength::Medium => 100,
            SummaryLength::Long => 200,
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        };
        f.write_str(name)
    }
}

impl FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "long" => Ok(SummaryLength::Long),
            other => Err(format!("unknown summary length: {other}")),
        }
    }
}

/// Middleware over an [`LlmClient`].
///
/// Todo suggestions are cached on disk keyed by the normalized input; every
/// other call goes straight to the model. All failures degrade: a fallback
/// suggestion for todos, an error the CLI reports for notes.
pub struct LlmMiddleware {
    client: Arc<dyn LlmClient>,
    cache_dir: Option<PathBuf>,
}

impl LlmMiddleware {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            cache_dir: None,
        }
    }

    /// Enable the todo-suggestion disk cache.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Refine freeform text into a structured todo suggestion.
    ///
    /// Never fails: any LLM or extraction problem yields the deterministic
    /// fallback built from the raw input.
    pub async fn process_todo(&self, input: &str) -> TodoSuggestion {
        if let Some(cached) = self.cached_suggestion(input).await {
            debug!("Todo suggestion served from cache");
            return cached;
        }

        match self.request_suggestion(input).await {
            Ok(suggestion) => {
                self.store_suggestion(input, &suggestion).await;
                suggestion
            }
            Err(e) => {
                warn!(error = %e, "LLM enrichment failed, using fallback");
                Self::fallback_suggestion(input)
            }
        }
    }

    /// The suggestion used when the model cannot be reached or understood.
    pub fn fallback_suggestion(input: &str) -> TodoSuggestion {
        let title = if input.chars().count() > 80 {
            let truncated: String = input.chars().take(77).collect();
            format!("{truncated}...")
        } else {
            input.to_string()
        };

        TodoSuggestion {
            title,
            description: input.to_string(),
            tags: vec!["general".to_string()],
            category: "general".to_string(),
            priority: Priority::default(),
            horizon: Horizon::H2,
            status: TodoStatus::NotStarted,
            rationale: "Generated as fallback due to processing error".to_string(),
        }
    }

    /// Ask for improvements to specific parts of a suggestion.
    ///
    /// The result only contains the requested parts; on failure every
    /// requested part maps to a failure message.
    pub async fn remix_suggestions(
        &self,
        current: &TodoSuggestion,
        parts: &[String],
    ) -> HashMap<String, Value> {
        match self.request_remix(current, parts).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(error = %e, "Remix suggestions failed");
                parts
                    .iter()
                    .map(|part| {
                        (
                            part.clone(),
                            Value::String(format!("Failed to generate suggestion for {part}")),
                        )
                    })
                    .collect()
            }
        }
    }

    /// Generate a note from a prompt. Unlike todos there is no fallback:
    /// the caller reports the failure instead of saving a junk note.
    pub async fn generate_note(
        &self,
        prompt: &str,
        title_override: Option<&str>,
    ) -> Result<NoteSuggestion, LlmError> {
        let ai_prompt = format!(
            "Generate a detailed note based on the following prompt:\n\n\
             \"{prompt}\"\n\n\
             The note should include:\n\
             1. A clear title (if not already provided)\n\
             2. Well-structured content with markdown formatting\n\
             3. 2-5 relevant tags\n\
             4. A suitable category\n\n\
             Format the response as a JSON object with these fields:\n\
             - title: The note title\n\
             - content: The markdown content\n\
             - tags: Array of relevant tags\n\
             - category: A suitable category\n"
        );

        let reply = self.client.generate(&ai_prompt).await?;
        let mut suggestion: NoteSuggestion = extract_json(&reply)?;
        if let Some(title) = title_override {
            suggestion.title = title.to_string();
        }
        if suggestion.title.trim().is_empty() {
            return Err(LlmError::Extract("generated note has no title".to_string()));
        }
        Ok(suggestion)
    }

    /// Summarize note content to roughly the requested word count.
    pub async fn summarize(
        &self,
        title: &str,
        content: &str,
        length: SummaryLength,
    ) -> Result<String, LlmError> {
        let prompt = format!(
            "Summarize the following note in approximately {} words:\n\n\
             Title: {}\n\n\
             {}\n\n\
             Provide a concise summary that captures the key points.\n",
            length.word_count(),
            title,
            content
        );

        let reply = self.client.generate(&prompt).await?;
        Ok(reply.trim().to_string())
    }

    async fn request_suggestion(&self, input: &str) -> Result<TodoSuggestion, LlmError> {
        let prompt = format!(
            "You are a task management assistant. Help me refine this todo item with \
             appropriate tags, category, priority, and status.\n\
             Format your response as JSON with the following fields:\n\
             - title: A clear, concise title (max 80 chars)\n\
             - description: Detailed description of the task\n\
             - tags: Array of relevant tags (3-5 tags)\n\
             - category: Single category that best fits the task\n\
             - priority: Number from 1-5 (1 = highest, 5 = lowest)\n\
             - horizon: One of \"H1\" (urgent), \"H2\" (medium-term), or \"H3\" (long-term)\n\
             - status: One of \"not-started\", \"in-progress\", \"blocked\", \"completed\", or \"recurring\"\n\
             - rationale: Brief explanation of your choices\n\n\
             Todo: {input}\n"
        );

        let reply = self.client.generate(&prompt).await?;
        let suggestion: TodoSuggestion = extract_json(&reply)?;
        if suggestion.title.trim().is_empty() {
            return Err(LlmError::Extract("suggestion has an empty title".to_string()));
        }
        Ok(suggestion)
    }

    async fn request_remix(
        &self,
        current: &TodoSuggestion,
        parts: &[String],
    ) -> Result<HashMap<String, Value>, LlmError> {
        let prompt = format!(
            "You are a productivity expert helping improve a todo item. Focus only on \
             the parts that need remixing.\n\
             Current todo details:\n\
             Title: {}\n\
             Description: {}\n\
             Tags: {}\n\
             Category: {}\n\
             Priority: {}\n\
             Horizon: {}\n\
             Status: {}\n\n\
             Please suggest improvements ONLY for these specific parts: {}\n\n\
             Format your response as JSON with a key for each part to remix, for example:\n\
             {{\"title\": \"Suggested improved title\", \"tags\": [\"tag1\", \"tag2\"]}}\n\n\
             Only include the fields that need remixing in your response.\n",
            current.title,
            current.description,
            current.tags.join(", "),
            current.category,
            current.priority,
            current.horizon,
            current.status,
            parts.join(", ")
        );

        let reply = self.client.generate(&prompt).await?;
        let raw: HashMap<String, Value> = extract_json(&reply)?;

        // Keep only what was asked for; the model likes to volunteer more.
        Ok(raw
            .into_iter()
            .filter(|(key, _)| parts.iter().any(|p| p == key))
            .collect())
    }

    fn cache_path(&self, input: &str) -> Option<PathBuf> {
        let dir = self.cache_dir.as_ref()?;
        let normalized = input.trim().to_lowercase();
        let safe: String = normalized
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .take(100)
            .collect();
        Some(dir.join(format!("todo-{safe}.json")))
    }

    async fn cached_suggestion(&self, input: &str) -> Option<TodoSuggestion> {
        let path = self.cache_path(input)?;
        let data = fs::read_to_string(&path).await.ok()?;
        serde_json::from_str(&data).ok()
    }

    async fn store_suggestion(&self, input: &str, suggestion: &TodoSuggestion) {
        let Some(path) = self.cache_path(input) else {
            return;
        };
        let Ok(data) = serde_json::to_string(suggestion) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!(error = %e, "Failed to create LLM cache directory");
                return;
            }
        }
        if let Err(e) = fs::write(&path, data).await {
            warn!(error = %e, "Failed to write LLM cache entry");
        }
    }
}

/// Client used when LLM assistance is switched off: every call fails with
/// [`LlmError::Disabled`], which the middleware degrades like any other
/// failure.
pub struct DisabledLlm;

#[async_trait::async_trait]
impl LlmClient for DisabledLlm {
    fn id(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;

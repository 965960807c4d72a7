//! AI-assisted note flows: generation, summarization, web capture.

use tracing::{info, warn};

use t2p_core::NoteService;
use t2p_protocols::note::{Note, NoteDraft, NoteUpdate};

use crate::error::AssistError;
use crate::middleware::{LlmMiddleware, SummaryLength};
use crate::web::WebCapture;

const WEB_CAPTURE_TAG: &str = "web-capture";

/// Composes the middleware and web capture over a [`NoteService`].
pub struct NoteAssistant {
    middleware: LlmMiddleware,
    web: WebCapture,
}

impl NoteAssistant {
    pub fn new(middleware: LlmMiddleware) -> Self {
        Self {
            middleware,
            web: WebCapture::new(),
        }
    }

    /// Generate a note from a prompt and save it, marked AI-generated.
    pub async fn generate_note_with_ai(
        &self,
        notes: &mut NoteService,
        prompt: &str,
        title_override: Option<&str>,
    ) -> Result<Note, AssistError> {
        let suggestion = self.middleware.generate_note(prompt, title_override).await?;

        let mut draft = NoteDraft::new(suggestion.title, suggestion.content)
            .with_tags(suggestion.tags);
        if !suggestion.category.trim().is_empty() {
            draft = draft.with_category(suggestion.category);
        }

        let note = notes.create_note(draft).await?;
        let note = notes
            .update_note(
                note.id,
                NoteUpdate {
                    ai_generated: Some(true),
                    ..NoteUpdate::default()
                },
            )
            .await?;

        info!(id = %note.id, "Generated note with AI");
        Ok(note)
    }

    /// Summarize an existing note.
    pub async fn summarize_note(
        &self,
        note: &Note,
        length: SummaryLength,
    ) -> Result<String, AssistError> {
        let summary = self
            .middleware
            .summarize(&note.title, &note.content, length)
            .await?;
        Ok(summary)
    }

    /// Create a note from a web page.
    ///
    /// Scrape first; when the page yields nothing (or the fetch fails),
    /// fall back to asking the LLM to write about the URL. Scraped notes
    /// are saved as drafts for review.
    pub async fn create_note_from_web_page(
        &self,
        notes: &mut NoteService,
        url: &str,
    ) -> Result<Note, AssistError> {
        let capture = match self.web.fetch(url).await {
            Ok(capture) => capture,
            Err(e) => {
                warn!(url, error = %e, "Web capture failed, trying AI generation");
                None
            }
        };

        let Some(capture) = capture else {
            return self.generate_note_from_url(notes, url).await;
        };

        let mut content = capture.lines.join("\n\n");
        content.push_str(&format!("\n\nSource: {url}"));

        let draft = NoteDraft::new(capture.title, content)
            .with_tags(vec![WEB_CAPTURE_TAG.to_string()])
            .with_category("research")
            .as_draft();

        let note = notes.create_note(draft).await?;
        let note = notes
            .update_note(
                note.id,
                NoteUpdate {
                    source_url: Some(url.to_string()),
                    ..NoteUpdate::default()
                },
            )
            .await?;

        info!(id = %note.id, url, "Captured web page into note");
        Ok(note)
    }

    async fn generate_note_from_url(
        &self,
        notes: &mut NoteService,
        url: &str,
    ) -> Result<Note, AssistError> {
        let prompt = format!("Generate a detailed note about the webpage at: {url}");
        let note = self.generate_note_with_ai(notes, &prompt, None).await?;

        let mut tags = note.tags.clone();
        if !tags.iter().any(|t| t == WEB_CAPTURE_TAG) {
            tags.push(WEB_CAPTURE_TAG.to_string());
        }

        let note = notes
            .update_note(
                note.id,
                NoteUpdate {
                    tags: Some(tags),
                    source_url: Some(url.to_string()),
                    ..NoteUpdate::default()
                },
            )
            .await?;
        Ok(note)
    }
}

#[cfg(test)]
#[path = "assistant_tests.rs"]
mod tests;

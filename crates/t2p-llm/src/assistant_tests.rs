use std::sync::Arc;

use async_trait::async_trait;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

use t2p_protocols::{LlmClient, LlmError};
use t2p_store::NoteStore;

use super::*;

struct CannedLlm(String);

#[async_trait]
impl LlmClient for CannedLlm {
    fn id(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.0.clone())
    }
}

const NOTE_REPLY: &str =
    r##"{"title": "Rust notes", "content": "# Ownership", "tags": ["rust"], "category": "learning"}"##;

async fn note_service() -> (tempfile::TempDir, NoteService) {
    let dir = tempfile::tempdir().unwrap();
    let store = NoteStore::new(dir.path().join("master-notes.md"));
    let service = NoteService::open(store).await.unwrap();
    (dir, service)
}

fn assistant(reply: &str) -> NoteAssistant {
    NoteAssistant::new(LlmMiddleware::new(Arc::new(CannedLlm(reply.to_string()))))
}

#[tokio::test]
async fn test_generate_note_with_ai_marks_note() {
    let (_dir, mut notes) = note_service().await;

    let note = assistant(NOTE_REPLY)
        .generate_note_with_ai(&mut notes, "collect rust learnings", None)
        .await
        .unwrap();

    assert_eq!(note.title, "Rust notes");
    assert_eq!(note.ai_generated, Some(true));
    assert_eq!(note.category.as_deref(), Some("learning"));
    assert!(notes.get_note(note.id).is_some());
}

#[tokio::test]
async fn test_generate_note_with_ai_fails_cleanly() {
    let (_dir, mut notes) = note_service().await;

    let result = assistant("nothing structured")
        .generate_note_with_ai(&mut notes, "prompt", None)
        .await;

    assert!(matches!(result, Err(AssistError::Llm(LlmError::Extract(_)))));
    // A failed generation must not leave a half-written note behind.
    assert_eq!(notes.stats().total_items, 0);
}

#[tokio::test]
async fn test_web_capture_creates_draft_note() {
    let server = MockServer::start().await;
    let page = "<html><head><title>Docs</title>\
                <meta name=\"description\" content=\"All the docs\"></head>\
                <body><h1>Read me</h1></body></html>";
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let (_dir, mut notes) = note_service().await;
    let url = format!("{}/docs", server.uri());

    let note = assistant(NOTE_REPLY)
        .create_note_from_web_page(&mut notes, &url)
        .await
        .unwrap();

    assert_eq!(note.title, "Docs");
    assert!(note.content.contains("All the docs"));
    assert!(note.content.contains(&format!("Source: {url}")));
    assert!(note.is_draft);
    assert_eq!(note.tags, vec!["web-capture"]);
    assert_eq!(note.category.as_deref(), Some("research"));
    assert_eq!(note.source_url.as_deref(), Some(url.as_str()));
    assert!(note.ai_generated.is_none());
}

#[tokio::test]
async fn test_web_capture_falls_back_to_ai() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("no markup here"))
        .mount(&server)
        .await;

    let (_dir, mut notes) = note_service().await;
    let url = server.uri();

    let note = assistant(NOTE_REPLY)
        .create_note_from_web_page(&mut notes, &url)
        .await
        .unwrap();

    assert_eq!(note.title, "Rust notes");
    assert_eq!(note.ai_generated, Some(true));
    assert!(note.tags.contains(&"web-capture".to_string()));
    assert_eq!(note.source_url.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn test_summarize_note() {
    let (_dir, mut notes) = note_service().await;
    let note = notes
        .create_note(t2p_protocols::note::NoteDraft::new("Long", "Many words"))
        .await
        .unwrap();

    let summary = assistant("  the gist  ")
        .summarize_note(&note, SummaryLength::Medium)
        .await
        .unwrap();
    assert_eq!(summary, "the gist");
}

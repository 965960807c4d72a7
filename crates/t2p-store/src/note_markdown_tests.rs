use chrono::Utc;
use uuid::Uuid;

use super::*;
use t2p_protocols::note::{Note, NoteList};

fn sample_list() -> NoteList {
    NoteList {
        items: vec![Note {
            id: Uuid::new_v4(),
            title: "Release checklist".to_string(),
            content: "- tag the build\n- update the changelog".to_string(),
            tags: vec!["release".to_string(), "process".to_string()],
            category: Some("work".to_string()),
            related_todos: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_draft: false,
            ai_generated: None,
            source_url: None,
        }],
        last_updated: Utc::now(),
    }
}

#[test]
fn test_render_embeds_blob_and_visible_markdown() {
    let list = sample_list();
    let content = NoteMarkdown::render(&list).unwrap();

    assert!(content.starts_with("# Notes\n"));
    assert!(content.contains("## Release checklist"));
    assert!(content.contains("Tags: release, process"));
    assert!(content.contains("<!-- T2P_NOTES_DATA\n"));
    assert!(content.trim_end().ends_with("-->"));
}

#[test]
fn test_parse_round_trip() {
    let list = sample_list();
    let content = NoteMarkdown::render(&list).unwrap();

    let parsed = NoteMarkdown::parse(&content).unwrap().unwrap();
    assert_eq!(parsed.items.len(), 1);
    assert_eq!(parsed.items[0].id, list.items[0].id);
    assert_eq!(parsed.items[0].tags, list.items[0].tags);
    assert_eq!(parsed.items[0].category, list.items[0].category);
}

#[test]
fn test_blob_uses_camel_case_field_names() {
    let content = NoteMarkdown::render(&sample_list()).unwrap();
    let blob = NoteMarkdown::extract_blob(&content).unwrap();
    assert!(blob.contains("\"lastUpdated\""));
    assert!(blob.contains("\"createdAt\""));
    assert!(blob.contains("\"isDraft\""));
}

#[test]
fn test_parse_without_blob_is_none() {
    let result = NoteMarkdown::parse("# Notes\n\nJust prose.\n").unwrap();
    assert!(result.is_none());
}

#[test]
fn test_parse_malformed_blob_is_error() {
    let content = "# Notes\n\n<!-- T2P_NOTES_DATA\n{not json}\n-->";
    assert!(NoteMarkdown::parse(content).is_err());
}

#[test]
fn test_visible_markdown_is_cosmetic() {
    // Mangling the visible sections must not affect what parse returns.
    let list = sample_list();
    let content = NoteMarkdown::render(&list).unwrap();
    let mangled = content.replace("## Release checklist", "## Something else");

    let parsed = NoteMarkdown::parse(&mangled).unwrap().unwrap();
    assert_eq!(parsed.items[0].title, "Release checklist");
}

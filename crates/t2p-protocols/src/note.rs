//! Note domain model.
//!
//! Field names serialize as camelCase: the notes file embeds this model as
//! a JSON blob and the names are part of the on-disk format.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A markdown note, optionally linked to todos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Weak references: ids are stored but never checked against the todo list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_todos: Option<Vec<Uuid>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_generated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Note {
    pub fn has_todo_relations(&self) -> bool {
        self.related_todos
            .as_ref()
            .is_some_and(|ids| !ids.is_empty())
    }
}

/// Ordered collection of notes plus the last mutation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteList {
    pub items: Vec<Note>,
    pub last_updated: DateTime<Utc>,
}

impl NoteList {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

impl Default for NoteList {
    fn default() -> Self {
        Self::empty()
    }
}

/// Input for creating a note; id and timestamps are assigned by the service.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub related_todos: Option<Vec<Uuid>>,
    pub is_draft: bool,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn as_draft(mut self) -> Self {
        self.is_draft = true;
        self
    }
}

/// Field-wise patch applied by `update_note`; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub related_todos: Option<Vec<Uuid>>,
    pub is_draft: Option<bool>,
    pub ai_generated: Option<bool>,
    pub source_url: Option<String>,
}

/// Conjunctive filter over notes.
///
/// Unlike the todo filter, tag matching is any-of: a note matches when it
/// carries at least one of the filter tags.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub tags: Vec<String>,
    pub category: Option<String>,
    /// Case-insensitive substring over title and content.
    pub search: Option<String>,
    pub has_todo_relations: Option<bool>,
    pub is_ai_generated: Option<bool>,
    pub is_draft: Option<bool>,
}

/// Aggregate counts over a note list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStats {
    pub total_items: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_tag: BTreeMap<String, usize>,
    pub with_todo_relations: usize,
    pub ai_generated: usize,
    pub drafts: usize,
}

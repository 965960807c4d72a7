//! Note service: CRUD, filtering, stats, todo linking, and export.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use t2p_protocols::note::{Note, NoteDraft, NoteFilter, NoteList, NoteStats, NoteUpdate};
use t2p_store::NoteStore;

use crate::error::ServiceError;
use crate::export::{self, ExportFormat};

/// Owns the in-memory note list and its file store.
pub struct NoteService {
    store: NoteStore,
    notes: NoteList,
}

impl NoteService {
    /// Open the store and load the current list (creating the file when
    /// missing).
    pub async fn open(store: NoteStore) -> Result<Self, ServiceError> {
        let notes = store.load().await?;
        info!(items = notes.items.len(), "Note service ready");
        Ok(Self { store, notes })
    }

    pub async fn create_note(&mut self, draft: NoteDraft) -> Result<Note, ServiceError> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::InvalidField {
                field: "title".to_string(),
                message: "title must not be empty".to_string(),
            });
        }

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            category: draft.category,
            related_todos: draft.related_todos,
            created_at: now,
            updated_at: now,
            is_draft: draft.is_draft,
            ai_generated: None,
            source_url: None,
        };

        self.notes.items.push(note.clone());
        self.persist().await?;
        debug!(id = %note.id, title = %note.title, "Created note");
        Ok(note)
    }

    pub async fn update_note(&mut self, id: Uuid, update: NoteUpdate) -> Result<Note, ServiceError> {
        self.mutate(id, |note| {
            if let Some(title) = update.title {
                note.title = title;
            }
            if let Some(content) = update.content {
                note.content = content;
            }
            if let Some(tags) = update.tags {
                note.tags = tags;
            }
            if let Some(category) = update.category {
                note.category = Some(category);
            }
            if let Some(related) = update.related_todos {
                note.related_todos = Some(related);
            }
            if let Some(is_draft) = update.is_draft {
                note.is_draft = is_draft;
            }
            if let Some(ai_generated) = update.ai_generated {
                note.ai_generated = Some(ai_generated);
            }
            if let Some(source_url) = update.source_url {
                note.source_url = Some(source_url);
            }
        })
        .await
    }

    /// Delete a note; returns false when the id is unknown.
    pub async fn delete_note(&mut self, id: Uuid) -> Result<bool, ServiceError> {
        let before = self.notes.items.len();
        self.notes.items.retain(|note| note.id != id);
        if self.notes.items.len() == before {
            return Ok(false);
        }
        self.persist().await?;
        debug!(id = %id, "Deleted note");
        Ok(true)
    }

    pub fn get_note(&self, id: Uuid) -> Option<&Note> {
        self.notes.items.iter().find(|note| note.id == id)
    }

    /// Linear scan with conjunctive predicates.
    pub fn get_notes(&self, filter: &NoteFilter) -> Vec<&Note> {
        self.notes
            .items
            .iter()
            .filter(|note| matches_filter(note, filter))
            .collect()
    }

    pub fn stats(&self) -> NoteStats {
        let mut stats = NoteStats {
            total_items: self.notes.items.len(),
            ..NoteStats::default()
        };

        for note in &self.notes.items {
            if let Some(category) = &note.category {
                *stats.by_category.entry(category.clone()).or_default() += 1;
            }
            for tag in &note.tags {
                *stats.by_tag.entry(tag.clone()).or_default() += 1;
            }
            if note.has_todo_relations() {
                stats.with_todo_relations += 1;
            }
            if note.ai_generated == Some(true) {
                stats.ai_generated += 1;
            }
            if note.is_draft {
                stats.drafts += 1;
            }
        }

        stats
    }

    /// Add todo ids to a note's relations (set union, order preserved).
    pub async fn link_to_todos(&mut self, note_id: Uuid, todo_ids: &[Uuid]) -> Result<Note, ServiceError> {
        self.mutate(note_id, |note| {
            let mut relations = note.related_todos.take().unwrap_or_default();
            for id in todo_ids {
                if !relations.contains(id) {
                    relations.push(*id);
                }
            }
            note.related_todos = Some(relations);
        })
        .await
    }

    /// Remove todo ids from a note's relations.
    pub async fn unlink_from_todos(&mut self, note_id: Uuid, todo_ids: &[Uuid]) -> Result<Note, ServiceError> {
        self.mutate(note_id, |note| {
            if let Some(relations) = note.related_todos.as_mut() {
                relations.retain(|id| !todo_ids.contains(id));
            }
        })
        .await
    }

    /// Export filtered notes to `path` in the given format; returns the
    /// path written.
    pub async fn export_notes(
        &self,
        format: ExportFormat,
        path: &Path,
        filter: &NoteFilter,
    ) -> Result<PathBuf, ServiceError> {
        let notes = self.get_notes(filter);
        let content = match format {
            ExportFormat::Markdown => export::to_markdown(&notes),
            ExportFormat::Json => export::to_json(&notes)?,
            ExportFormat::Html => export::to_html(&notes),
        };
        tokio::fs::write(path, content).await.map_err(t2p_store::StoreError::Io)?;
        info!(path = %path.display(), count = notes.len(), format = %format, "Exported notes");
        Ok(path.to_path_buf())
    }

    async fn mutate<F>(&mut self, id: Uuid, apply: F) -> Result<Note, ServiceError>
    where
        F: FnOnce(&mut Note),
    {
        let snapshot = {
            let note = self
                .notes
                .items
                .iter_mut()
                .find(|note| note.id == id)
                .ok_or(ServiceError::NoteNotFound(id))?;
            apply(note);
            note.updated_at = Utc::now();
            note.clone()
        };
        self.persist().await?;
        Ok(snapshot)
    }

    async fn persist(&mut self) -> Result<(), ServiceError> {
        self.notes.last_updated = Utc::now();
        self.store.save(&self.notes).await?;
        Ok(())
    }
}

fn matches_filter(note: &Note, filter: &NoteFilter) -> bool {
    // Any-of semantics for tags, unlike the todo filter.
    if !filter.tags.is_empty() && !note.tags.iter().any(|tag| filter.tags.contains(tag)) {
        return false;
    }
    if let Some(category) = &filter.category {
        if note.category.as_ref() != Some(category) {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        if !note.title.to_lowercase().contains(&needle)
            && !note.content.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    if let Some(wanted) = filter.has_todo_relations {
        if note.has_todo_relations() != wanted {
            return false;
        }
    }
    if let Some(wanted) = filter.is_ai_generated {
        if note.ai_generated.unwrap_or(false) != wanted {
            return false;
        }
    }
    if let Some(wanted) = filter.is_draft {
        if note.is_draft != wanted {
            return false;
        }
    }
    true
}

#[cfg(test)]
#[path = "note_service_tests.rs"]
mod tests;

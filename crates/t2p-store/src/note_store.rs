//! Notes file store.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use t2p_protocols::note::NoteList;

use crate::error::StoreError;
use crate::note_markdown::NoteMarkdown;

/// File-backed store for the notes list.
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load notes from disk.
    ///
    /// A missing file is created with an empty list. A file without a data
    /// blob, or with a blob that does not parse, loads as an empty list
    /// with a warning; notes are low-stakes enough that a damaged file
    /// should not brick the CLI.
    pub async fn load(&self) -> Result<NoteList, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let list = NoteList::empty();
                self.write_default(&list).await?;
                info!(path = %self.path.display(), "Created notes file");
                return Ok(list);
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        match NoteMarkdown::parse(&content) {
            Ok(Some(list)) => {
                debug!(path = %self.path.display(), items = list.items.len(), "Loaded notes");
                Ok(list)
            }
            Ok(None) => {
                warn!(path = %self.path.display(), "Notes file has no data blob, starting empty");
                Ok(NoteList::empty())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Notes blob unreadable, starting empty");
                Ok(NoteList::empty())
            }
        }
    }

    /// Render and rewrite the whole notes file.
    pub async fn save(&self, list: &NoteList) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = NoteMarkdown::render(list)?;
        fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), items = list.items.len(), "Saved notes");
        Ok(())
    }

    async fn write_default(&self, list: &NoteList) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, NoteMarkdown::default_file(list)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use t2p_protocols::note::Note;
    use uuid::Uuid;

    fn sample_note(title: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: "body".to_string(),
            tags: vec![],
            category: None,
            related_todos: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_draft: false,
            ai_generated: None,
            source_url: None,
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("master-notes.md"));

        let list = store.load().await.unwrap();
        assert!(list.items.is_empty());
        assert!(store.path().exists());

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("T2P_NOTES_DATA"));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("master-notes.md"));

        let list = NoteList {
            items: vec![sample_note("kept")],
            last_updated: Utc::now(),
        };
        store.save(&list).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].title, "kept");
    }

    #[tokio::test]
    async fn test_load_blobless_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master-notes.md");
        std::fs::write(&path, "# Notes\n\nHand-written, no blob.\n").unwrap();

        let store = NoteStore::new(&path);
        let list = store.load().await.unwrap();
        assert!(list.items.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_blob_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master-notes.md");
        std::fs::write(&path, "# Notes\n\n<!-- T2P_NOTES_DATA\nnot json\n-->").unwrap();

        let store = NoteStore::new(&path);
        let list = store.load().await.unwrap();
        assert!(list.items.is_empty());
    }
}

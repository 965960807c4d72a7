//! Todo file store.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use t2p_protocols::todo::TodoList;

use crate::error::StoreError;
use crate::todo_markdown::TodoMarkdown;

/// File-backed store for the master todo list.
///
/// Every save rewrites the whole file; a crash mid-write can lose the file
/// contents. This matches the single-user model the tool is built for.
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the todo list from disk.
    ///
    /// A missing file is an empty list (it is created on first save); any
    /// other read error propagates.
    pub async fn load(&self, created_by: &str) -> Result<TodoList, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let list = TodoMarkdown::parse(&content, created_by);
                debug!(path = %self.path.display(), items = list.items.len(), "Loaded todos");
                Ok(list)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Todo file missing, starting empty");
                Ok(TodoList::empty())
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Render and rewrite the whole todo file.
    pub async fn save(&self, list: &TodoList) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = TodoMarkdown::render(list);
        fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), items = list.items.len(), "Saved todos");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use t2p_protocols::todo::{Horizon, Priority, TodoItem, TodoStatus};
    use uuid::Uuid;

    fn sample_item(title: &str) -> TodoItem {
        let now = Utc::now();
        TodoItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: TodoStatus::NotStarted,
            priority: Priority::default(),
            horizon: Horizon::H1,
            tags: vec![],
            category: None,
            created_at: now,
            updated_at: now,
            created_by: "tester".to_string(),
            assigned_to: None,
            approval_status: None,
            approval_notes: None,
            github_issue: None,
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TodoStore::new(dir.path().join("master-todo.md"));
        let list = store.load("tester").await.unwrap();
        assert!(list.items.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TodoStore::new(dir.path().join("master-todo.md"));

        let list = TodoList {
            items: vec![sample_item("persisted")],
            last_updated: Utc::now(),
        };
        store.save(&list).await.unwrap();

        let loaded = store.load("tester").await.unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].title, "persisted");
    }

    #[tokio::test]
    async fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = TodoStore::new(dir.path().join("nested").join("master-todo.md"));
        store.save(&TodoList::empty()).await.unwrap();
        assert!(store.path().exists());
    }
}

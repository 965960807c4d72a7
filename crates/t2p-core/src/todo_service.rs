//! Todo service: CRUD, filtering, stats, and the approval workflow.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use t2p_protocols::todo::{
    ApprovalStatus, TodoDraft, TodoFilter, TodoItem, TodoList, TodoStats, TodoStatus, TodoUpdate,
};
use t2p_store::TodoStore;

use crate::error::ServiceError;

/// Owns the in-memory todo list and its file store.
///
/// Every mutation bumps the item's `updated_at` and the list's
/// `last_updated`, then rewrites the file. A failed save is returned to the
/// caller while the in-memory mutation stays applied: single user,
/// last-writer-wins.
pub struct TodoService {
    store: TodoStore,
    todos: TodoList,
    current_user: String,
}

impl TodoService {
    /// Open the store and load the current list.
    pub async fn open(store: TodoStore, current_user: impl Into<String>) -> Result<Self, ServiceError> {
        let current_user = current_user.into();
        let todos = store.load(&current_user).await?;
        info!(items = todos.items.len(), user = %current_user, "Todo service ready");
        Ok(Self {
            store,
            todos,
            current_user,
        })
    }

    /// Re-read the list from disk, dropping unsaved in-memory state.
    pub async fn reload(&mut self) -> Result<(), ServiceError> {
        self.todos = self.store.load(&self.current_user).await?;
        Ok(())
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn set_current_user(&mut self, username: impl Into<String>) {
        self.current_user = username.into();
    }

    /// Add a new item from a draft; id, timestamps, and creator are
    /// assigned here.
    pub async fn add_todo(&mut self, draft: TodoDraft) -> Result<TodoItem, ServiceError> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::InvalidField {
                field: "title".to_string(),
                message: "title must not be empty".to_string(),
            });
        }

        let now = Utc::now();
        let todo = TodoItem {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            horizon: draft.horizon,
            tags: draft.tags,
            category: draft.category,
            created_at: now,
            updated_at: now,
            created_by: self.current_user.clone(),
            assigned_to: None,
            approval_status: None,
            approval_notes: None,
            github_issue: None,
        };

        self.todos.items.push(todo.clone());
        self.persist().await?;
        debug!(id = %todo.id, title = %todo.title, "Added todo");
        Ok(todo)
    }

    /// Apply a field-wise patch to an item.
    pub async fn update_todo(&mut self, id: Uuid, update: TodoUpdate) -> Result<TodoItem, ServiceError> {
        self.mutate(id, |item| {
            if let Some(title) = update.title {
                item.title = title;
            }
            if let Some(description) = update.description {
                item.description = Some(description);
            }
            if let Some(status) = update.status {
                item.status = status;
            }
            if let Some(priority) = update.priority {
                item.priority = priority;
            }
            if let Some(horizon) = update.horizon {
                item.horizon = horizon;
            }
            if let Some(tags) = update.tags {
                item.tags = tags;
            }
            if let Some(category) = update.category {
                item.category = Some(category);
            }
            if let Some(issue) = update.github_issue {
                item.github_issue = Some(issue);
            }
        })
        .await
    }

    pub async fn delete_todo(&mut self, id: Uuid) -> Result<(), ServiceError> {
        let index = self
            .todos
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(ServiceError::TodoNotFound(id))?;
        self.todos.items.remove(index);
        self.persist().await?;
        debug!(id = %id, "Deleted todo");
        Ok(())
    }

    pub fn get_todo(&self, id: Uuid) -> Option<&TodoItem> {
        self.todos.items.iter().find(|item| item.id == id)
    }

    /// Linear scan with conjunctive predicates; every set filter field must
    /// match.
    pub fn get_todos(&self, filter: &TodoFilter) -> Vec<&TodoItem> {
        self.todos
            .items
            .iter()
            .filter(|item| matches_filter(item, filter))
            .collect()
    }

    pub fn stats(&self) -> TodoStats {
        let mut stats = TodoStats {
            total_items: self.todos.items.len(),
            ..TodoStats::default()
        };

        for todo in &self.todos.items {
            *stats.by_priority.entry(todo.priority.value()).or_default() += 1;
            *stats
                .by_status
                .entry(todo.status.as_str().to_string())
                .or_default() += 1;
            *stats
                .by_horizon
                .entry(todo.horizon.as_str().to_string())
                .or_default() += 1;
            if let Some(category) = &todo.category {
                *stats.by_category.entry(category.clone()).or_default() += 1;
            }
        }

        stats
    }

    /// Assign an item to one or more users for approval.
    ///
    /// Duplicate usernames are dropped. Approval status is reset to
    /// pending unconditionally: re-assignment re-enters the review queue
    /// even for a previously approved or rejected item.
    pub async fn assign_todo(&mut self, id: Uuid, users: Vec<String>) -> Result<TodoItem, ServiceError> {
        let mut unique: Vec<String> = Vec::new();
        for user in users {
            if !unique.contains(&user) {
                unique.push(user);
            }
        }

        self.mutate(id, |item| {
            item.assigned_to = Some(unique);
            item.approval_status = Some(ApprovalStatus::Pending);
        })
        .await
    }

    /// Mark an item approved. No guard: an already-approved item can be
    /// approved again, and the previous notes are replaced.
    pub async fn approve_todo(&mut self, id: Uuid, notes: Option<String>) -> Result<TodoItem, ServiceError> {
        self.mutate(id, |item| {
            item.approval_status = Some(ApprovalStatus::Approved);
            item.approval_notes = notes;
        })
        .await
    }

    /// Mark an item rejected; same non-guarding semantics as approval.
    pub async fn reject_todo(&mut self, id: Uuid, notes: Option<String>) -> Result<TodoItem, ServiceError> {
        self.mutate(id, |item| {
            item.approval_status = Some(ApprovalStatus::Rejected);
            item.approval_notes = notes;
        })
        .await
    }

    /// Pending items assigned to the current user.
    pub fn approvable_todos(&self) -> Vec<&TodoItem> {
        self.todos_needing_approval_by(&self.current_user)
    }

    /// All pending items, excluding completed ones unless asked.
    pub fn pending_approval_todos(&self, include_completed: bool) -> Vec<&TodoItem> {
        self.todos
            .items
            .iter()
            .filter(|item| {
                item.approval_status == Some(ApprovalStatus::Pending)
                    && (include_completed || item.status != TodoStatus::Completed)
            })
            .collect()
    }

    /// Pending items assigned to `user`.
    pub fn todos_needing_approval_by(&self, user: &str) -> Vec<&TodoItem> {
        self.todos
            .items
            .iter()
            .filter(|item| {
                item.approval_status == Some(ApprovalStatus::Pending) && item.is_assigned_to(user)
            })
            .collect()
    }

    /// Items created by the current user.
    pub fn my_todos(&self) -> Vec<&TodoItem> {
        self.todos
            .items
            .iter()
            .filter(|item| item.created_by == self.current_user)
            .collect()
    }

    /// Items assigned to the current user.
    pub fn assigned_todos(&self) -> Vec<&TodoItem> {
        self.todos
            .items
            .iter()
            .filter(|item| item.is_assigned_to(&self.current_user))
            .collect()
    }

    async fn mutate<F>(&mut self, id: Uuid, apply: F) -> Result<TodoItem, ServiceError>
    where
        F: FnOnce(&mut TodoItem),
    {
        let snapshot = {
            let item = self
                .todos
                .items
                .iter_mut()
                .find(|item| item.id == id)
                .ok_or(ServiceError::TodoNotFound(id))?;
            apply(item);
            item.updated_at = Utc::now();
            item.clone()
        };
        self.persist().await?;
        Ok(snapshot)
    }

    async fn persist(&mut self) -> Result<(), ServiceError> {
        self.todos.last_updated = Utc::now();
        self.store.save(&self.todos).await?;
        Ok(())
    }
}

fn matches_filter(item: &TodoItem, filter: &TodoFilter) -> bool {
    if let Some(priority) = filter.priority {
        if item.priority != priority {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if item.status != status {
            return false;
        }
    }
    // Subset semantics: every filter tag must be on the item.
    if !filter.tags.is_empty() && !filter.tags.iter().all(|tag| item.tags.contains(tag)) {
        return false;
    }
    if let Some(category) = &filter.category {
        if item.category.as_ref() != Some(category) {
            return false;
        }
    }
    if let Some(horizon) = filter.horizon {
        if item.horizon != horizon {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let in_title = item.title.to_lowercase().contains(&needle);
        let in_description = item
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        if !in_title && !in_description {
            return false;
        }
    }
    if let Some(approval) = filter.approval_status {
        if item.approval_status != Some(approval) {
            return false;
        }
    }
    if let Some(user) = &filter.assigned_to {
        if !item.is_assigned_to(user) {
            return false;
        }
    }
    true
}

#[cfg(test)]
#[path = "todo_service_tests.rs"]
mod tests;

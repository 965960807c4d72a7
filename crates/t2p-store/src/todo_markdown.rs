//! Todo markdown codec.
//!
//! Item lines follow the fixed pattern
//! `- <emoji> [<horizon>] **P<priority>**: <title>`. Indented
//! `- Key: Value` lines after an item carry its metadata. Anything else is
//! skipped without error; deviating lines simply do not survive a reload.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use t2p_protocols::todo::{
    ApprovalStatus, GithubIssue, Horizon, Priority, TodoItem, TodoList, TodoStatus,
};

static ITEM_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^- (.+?) \[(H[1-3])\] \*\*P([1-5])\*\*: (.+)$").unwrap());

static METADATA_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*- ([^:]+): (.+)$").unwrap());

static GITHUB_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#(\d+) \((.+)\)$").unwrap());

/// Codec for the master todo file.
pub struct TodoMarkdown;

impl TodoMarkdown {
    /// Parse file content into a todo list.
    ///
    /// Ids and timestamps are not part of the file format and are
    /// regenerated; `created_by` is stamped on every parsed item.
    pub fn parse(content: &str, created_by: &str) -> TodoList {
        let mut items: Vec<TodoItem> = Vec::new();
        let mut current: Option<TodoItem> = None;

        for line in content.lines() {
            if let Some(caps) = ITEM_LINE.captures(line) {
                if let Some(item) = current.take() {
                    items.push(item);
                }

                let marker = &caps[1];
                let horizon: Horizon = caps[2].parse().unwrap_or_default();
                // The regex guarantees a single digit in 1..=5.
                let priority = Priority::new(caps[3].parse().unwrap_or(3)).unwrap_or_default();
                let title = caps[4].trim().to_string();

                let now = Utc::now();
                current = Some(TodoItem {
                    id: Uuid::new_v4(),
                    title,
                    description: None,
                    status: detect_status(marker, line),
                    priority,
                    horizon,
                    tags: Vec::new(),
                    category: None,
                    created_at: now,
                    updated_at: now,
                    created_by: created_by.to_string(),
                    assigned_to: None,
                    approval_status: None,
                    approval_notes: None,
                    github_issue: None,
                });
            } else if let Some(item) = current.as_mut() {
                if line.trim_start().starts_with("- ") {
                    if let Some(caps) = METADATA_LINE.captures(line) {
                        apply_metadata(item, caps[1].trim(), caps[2].trim());
                    }
                }
            }
        }

        if let Some(item) = current {
            items.push(item);
        }

        TodoList {
            items,
            last_updated: Utc::now(),
        }
    }

    /// Render a todo list back to file content.
    ///
    /// Items are grouped per horizon (H1, H2, H3) and sorted by priority
    /// within each group.
    pub fn render(list: &TodoList) -> String {
        let mut content = String::from("# Master Todo List\n\n");

        for horizon in Horizon::all() {
            let mut group: Vec<&TodoItem> =
                list.items.iter().filter(|t| t.horizon == horizon).collect();
            if group.is_empty() {
                continue;
            }
            group.sort_by_key(|t| t.priority.value());

            content.push_str(&format!("\n## {} Tasks\n\n", horizon));

            for todo in group {
                content.push_str(&format!(
                    "- {} [{}] **{}**: {}\n",
                    todo.status.emoji(),
                    horizon,
                    todo.priority,
                    todo.title
                ));
                if let Some(description) = &todo.description {
                    content.push_str(&format!("  - Description: {}\n", description));
                }
                if !todo.tags.is_empty() {
                    content.push_str(&format!("  - Tags: {}\n", todo.tags.join(", ")));
                }
                if let Some(category) = &todo.category {
                    content.push_str(&format!("  - Category: {}\n", category));
                }
                if let Some(assigned) = todo.assigned_to.as_ref().filter(|a| !a.is_empty()) {
                    content.push_str(&format!("  - Assigned: {}\n", assigned.join(", ")));
                }
                if let Some(approval) = &todo.approval_status {
                    content.push_str(&format!("  - Approval: {}\n", approval));
                }
                if let Some(notes) = &todo.approval_notes {
                    content.push_str(&format!("  - Approval-Notes: {}\n", notes));
                }
                if let Some(issue) = &todo.github_issue {
                    content.push_str(&format!("  - GitHub: #{} ({})\n", issue.number, issue.url));
                }
                content.push('\n');
            }
        }

        content
    }
}

/// Determine item status from the line.
///
/// A known emoji in the marker slot wins; text indicators anywhere on the
/// line are the fallback for hand-edited files.
fn detect_status(marker: &str, line: &str) -> TodoStatus {
    for status in TodoStatus::all() {
        if marker.contains(status.emoji()) {
            return status;
        }
    }

    let lower = line.to_lowercase();
    if lower.contains("(in-progress)") || lower.contains("in progress") {
        TodoStatus::InProgress
    } else if lower.contains("(blocked)") || lower.contains("blocked") {
        TodoStatus::Blocked
    } else if lower.contains("(completed)") || lower.contains("completed") {
        TodoStatus::Completed
    } else if lower.contains("(recurring)") || lower.contains("recurring") {
        TodoStatus::Recurring
    } else {
        TodoStatus::NotStarted
    }
}

fn apply_metadata(item: &mut TodoItem, key: &str, value: &str) {
    match key.to_lowercase().as_str() {
        "description" => item.description = Some(value.to_string()),
        "tags" => {
            item.tags = value
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        "category" => item.category = Some(value.to_string()),
        "assigned" => {
            let users: Vec<String> = value
                .split(',')
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect();
            if !users.is_empty() {
                item.assigned_to = Some(users);
            }
        }
        "approval" => item.approval_status = value.parse::<ApprovalStatus>().ok(),
        "approval-notes" => item.approval_notes = Some(value.to_string()),
        "github" => {
            if let Some(caps) = GITHUB_REF.captures(value) {
                if let Ok(number) = caps[1].parse() {
                    item.github_issue = Some(GithubIssue {
                        number,
                        url: caps[2].to_string(),
                    });
                }
            }
        }
        // Unknown keys are dropped, like any other unparsable line.
        _ => {}
    }
}

#[cfg(test)]
#[path = "todo_markdown_tests.rs"]
mod tests;

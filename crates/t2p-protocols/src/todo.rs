//! Todo domain model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a todo item.
///
/// Each status maps to an emoji in the markdown file format and a
/// kebab-case string form on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    NotStarted,
    InProgress,
    Blocked,
    Completed,
    Recurring,
}

impl TodoStatus {
    /// Status marker used in the todo markdown format.
    pub fn emoji(&self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "🔴",
            TodoStatus::InProgress => "🟡",
            TodoStatus::Blocked => "🔵",
            TodoStatus::Completed => "🟢",
            TodoStatus::Recurring => "📌",
        }
    }

    /// Kebab-case string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "not-started",
            TodoStatus::InProgress => "in-progress",
            TodoStatus::Blocked => "blocked",
            TodoStatus::Completed => "completed",
            TodoStatus::Recurring => "recurring",
        }
    }

    /// All statuses, in file-format order.
    pub fn all() -> [TodoStatus; 5] {
        [
            TodoStatus::NotStarted,
            TodoStatus::InProgress,
            TodoStatus::Blocked,
            TodoStatus::Completed,
            TodoStatus::Recurring,
        ]
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not-started" | "not_started" => Ok(TodoStatus::NotStarted),
            "in-progress" | "in_progress" => Ok(TodoStatus::InProgress),
            "blocked" => Ok(TodoStatus::Blocked),
            "completed" => Ok(TodoStatus::Completed),
            "recurring" => Ok(TodoStatus::Recurring),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Priority level, 1 (highest) through 5 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Create a priority, rejecting values outside 1..=5.
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(3)
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Priority::new(value).ok_or_else(|| format!("priority must be 1-5, got {value}"))
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches(['P', 'p']);
        let value: u8 = digits
            .parse()
            .map_err(|_| format!("invalid priority: {s}"))?;
        Priority::new(value).ok_or_else(|| format!("priority must be 1-5, got {value}"))
    }
}

/// Planning-distance tag: H1 (now), H2 (next), H3 (future).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Horizon {
    #[default]
    H1,
    H2,
    H3,
}

impl Horizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::H1 => "H1",
            Horizon::H2 => "H2",
            Horizon::H3 => "H3",
        }
    }

    /// All horizons, in rendering order.
    pub fn all() -> [Horizon; 3] {
        [Horizon::H1, Horizon::H2, Horizon::H3]
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "H1" => Ok(Horizon::H1),
            "H2" => Ok(Horizon::H2),
            "H3" => Ok(Horizon::H3),
            other => Err(format!("unknown horizon: {other}")),
        }
    }
}

/// Approval state of an assigned todo.
///
/// Only meaningful when the item has a non-empty assignee list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(format!("unknown approval status: {other}")),
        }
    }
}

/// Reference to a GitHub issue attached to a todo.
///
/// Stored and rendered only; t2p never calls the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubIssue {
    pub number: u64,
    pub url: String,
}

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: Priority,
    pub horizon: Horizon,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_issue: Option<GithubIssue>,
}

impl TodoItem {
    /// True when the item is assigned to `user`.
    pub fn is_assigned_to(&self, user: &str) -> bool {
        self.assigned_to
            .as_ref()
            .is_some_and(|users| users.iter().any(|u| u == user))
    }
}

/// Ordered collection of todo items plus the last mutation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub items: Vec<TodoItem>,
    pub last_updated: DateTime<Utc>,
}

impl TodoList {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

impl Default for TodoList {
    fn default() -> Self {
        Self::empty()
    }
}

/// Input for creating a todo; id, timestamps, and creator are assigned by
/// the service.
#[derive(Debug, Clone, Default)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: Priority,
    pub horizon: Horizon,
    pub tags: Vec<String>,
    pub category: Option<String>,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Field-wise patch applied by `update_todo`; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub priority: Option<Priority>,
    pub horizon: Option<Horizon>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub github_issue: Option<GithubIssue>,
}

impl TodoUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.horizon.is_none()
            && self.tags.is_none()
            && self.category.is_none()
            && self.github_issue.is_none()
    }
}

/// Conjunctive filter over todo items: every set predicate must match.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    pub priority: Option<Priority>,
    pub status: Option<TodoStatus>,
    /// Subset semantics: every filter tag must be present on the item.
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub horizon: Option<Horizon>,
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
    pub approval_status: Option<ApprovalStatus>,
    /// Membership in the item's assignee list.
    pub assigned_to: Option<String>,
}

/// Aggregate counts over a todo list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total_items: usize,
    pub by_priority: BTreeMap<u8, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_horizon: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in TodoStatus::all() {
            let parsed: TodoStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_serde_kebab_case() {
        let json = serde_json::to_string(&TodoStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
        let back: TodoStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, TodoStatus::InProgress);
    }

    #[test]
    fn test_priority_bounds() {
        assert!(Priority::new(0).is_none());
        assert!(Priority::new(6).is_none());
        assert_eq!(Priority::new(1).unwrap().value(), 1);
        assert_eq!(Priority::default().value(), 3);
    }

    #[test]
    fn test_priority_deserialize_rejects_out_of_range() {
        let result: Result<Priority, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[test]
    fn test_priority_from_str_accepts_p_prefix() {
        assert_eq!(Priority::from_str("P2").unwrap().value(), 2);
        assert_eq!(Priority::from_str("4").unwrap().value(), 4);
        assert!(Priority::from_str("P9").is_err());
    }

    #[test]
    fn test_horizon_parse() {
        assert_eq!(Horizon::from_str("h2").unwrap(), Horizon::H2);
        assert!(Horizon::from_str("H4").is_err());
    }

    #[test]
    fn test_todo_item_serde_camel_case() {
        let item = TodoItem {
            id: Uuid::new_v4(),
            title: "Write docs".to_string(),
            description: None,
            status: TodoStatus::NotStarted,
            priority: Priority::default(),
            horizon: Horizon::H1,
            tags: vec!["docs".to_string()],
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "alice".to_string(),
            assigned_to: None,
            approval_status: None,
            approval_notes: None,
            github_issue: None,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("createdAt"));
        assert!(json.contains("createdBy"));
        assert!(!json.contains("approvalStatus"));
    }

    #[test]
    fn test_is_assigned_to() {
        let mut item = TodoItem {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            status: TodoStatus::NotStarted,
            priority: Priority::default(),
            horizon: Horizon::H1,
            tags: vec![],
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "alice".to_string(),
            assigned_to: None,
            approval_status: None,
            approval_notes: None,
            github_issue: None,
        };
        assert!(!item.is_assigned_to("bob"));

        item.assigned_to = Some(vec!["bob".to_string(), "carol".to_string()]);
        assert!(item.is_assigned_to("bob"));
        assert!(!item.is_assigned_to("alice"));
    }
}

use super::*;
use t2p_protocols::todo::{Horizon, Priority};

async fn service() -> (tempfile::TempDir, TodoService) {
    let dir = tempfile::tempdir().unwrap();
    let store = TodoStore::new(dir.path().join("master-todo.md"));
    let service = TodoService::open(store, "alice").await.unwrap();
    (dir, service)
}

#[tokio::test]
async fn test_add_and_get() {
    let (_dir, mut service) = service().await;

    let added = service
        .add_todo(
            TodoDraft::new("Write parser")
                .with_priority(Priority::new(2).unwrap())
                .with_tags(vec!["parser".to_string()]),
        )
        .await
        .unwrap();

    assert_eq!(added.created_by, "alice");
    let fetched = service.get_todo(added.id).unwrap();
    assert_eq!(fetched.title, "Write parser");
    assert_eq!(fetched.priority.value(), 2);
}

#[tokio::test]
async fn test_add_rejects_empty_title() {
    let (_dir, mut service) = service().await;
    let result = service.add_todo(TodoDraft::new("   ")).await;
    assert!(matches!(result, Err(ServiceError::InvalidField { .. })));
}

#[tokio::test]
async fn test_mutations_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("master-todo.md");

    {
        let store = TodoStore::new(&path);
        let mut service = TodoService::open(store, "alice").await.unwrap();
        service.add_todo(TodoDraft::new("survives")).await.unwrap();
    }

    let store = TodoStore::new(&path);
    let service = TodoService::open(store, "alice").await.unwrap();
    let all = service.get_todos(&TodoFilter::default());
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "survives");
}

#[tokio::test]
async fn test_update_patches_only_given_fields() {
    let (_dir, mut service) = service().await;
    let added = service
        .add_todo(TodoDraft::new("original").with_description("keep me"))
        .await
        .unwrap();

    let updated = service
        .update_todo(
            added.id,
            TodoUpdate {
                title: Some("renamed".to_string()),
                status: Some(TodoStatus::InProgress),
                ..TodoUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.status, TodoStatus::InProgress);
    assert_eq!(updated.description.as_deref(), Some("keep me"));
    assert!(updated.updated_at >= added.updated_at);
}

#[tokio::test]
async fn test_update_unknown_id_errors() {
    let (_dir, mut service) = service().await;
    let result = service.update_todo(Uuid::new_v4(), TodoUpdate::default()).await;
    assert!(matches!(result, Err(ServiceError::TodoNotFound(_))));
}

#[tokio::test]
async fn test_delete() {
    let (_dir, mut service) = service().await;
    let added = service.add_todo(TodoDraft::new("doomed")).await.unwrap();

    service.delete_todo(added.id).await.unwrap();
    assert!(service.get_todo(added.id).is_none());

    let again = service.delete_todo(added.id).await;
    assert!(matches!(again, Err(ServiceError::TodoNotFound(_))));
}

#[tokio::test]
async fn test_filter_conjunction() {
    let (_dir, mut service) = service().await;
    service
        .add_todo(
            TodoDraft::new("blocked p1")
                .with_priority(Priority::new(1).unwrap())
                .with_status(TodoStatus::Blocked),
        )
        .await
        .unwrap();
    service
        .add_todo(
            TodoDraft::new("blocked p2")
                .with_priority(Priority::new(2).unwrap())
                .with_status(TodoStatus::Blocked),
        )
        .await
        .unwrap();
    service
        .add_todo(TodoDraft::new("open p1").with_priority(Priority::new(1).unwrap()))
        .await
        .unwrap();

    let filter = TodoFilter {
        priority: Priority::new(1),
        status: Some(TodoStatus::Blocked),
        ..TodoFilter::default()
    };
    let matches = service.get_todos(&filter);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].title, "blocked p1");
}

#[tokio::test]
async fn test_filter_tags_subset() {
    let (_dir, mut service) = service().await;
    service
        .add_todo(TodoDraft::new("both").with_tags(vec!["a".to_string(), "b".to_string()]))
        .await
        .unwrap();
    service
        .add_todo(TodoDraft::new("only a").with_tags(vec!["a".to_string()]))
        .await
        .unwrap();

    let filter = TodoFilter {
        tags: vec!["a".to_string(), "b".to_string()],
        ..TodoFilter::default()
    };
    let matches = service.get_todos(&filter);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].title, "both");
}

#[tokio::test]
async fn test_filter_search_covers_description() {
    let (_dir, mut service) = service().await;
    service
        .add_todo(TodoDraft::new("opaque title").with_description("mentions the Parser here"))
        .await
        .unwrap();
    service.add_todo(TodoDraft::new("unrelated")).await.unwrap();

    let filter = TodoFilter {
        search: Some("parser".to_string()),
        ..TodoFilter::default()
    };
    assert_eq!(service.get_todos(&filter).len(), 1);
}

#[tokio::test]
async fn test_stats_counts() {
    let (_dir, mut service) = service().await;
    service
        .add_todo(
            TodoDraft::new("a")
                .with_priority(Priority::new(1).unwrap())
                .with_horizon(Horizon::H1)
                .with_category("infra"),
        )
        .await
        .unwrap();
    service
        .add_todo(
            TodoDraft::new("b")
                .with_priority(Priority::new(1).unwrap())
                .with_horizon(Horizon::H2),
        )
        .await
        .unwrap();

    let stats = service.stats();
    assert_eq!(stats.total_items, 2);
    assert_eq!(stats.by_priority.get(&1), Some(&2));
    assert_eq!(stats.by_horizon.get("H1"), Some(&1));
    assert_eq!(stats.by_category.get("infra"), Some(&1));
    assert_eq!(stats.by_status.get("not-started"), Some(&2));
}

#[tokio::test]
async fn test_assign_sets_pending_and_dedupes() {
    let (_dir, mut service) = service().await;
    let added = service.add_todo(TodoDraft::new("review me")).await.unwrap();

    let assigned = service
        .assign_todo(
            added.id,
            vec!["bob".to_string(), "carol".to_string(), "bob".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(
        assigned.assigned_to,
        Some(vec!["bob".to_string(), "carol".to_string()])
    );
    assert_eq!(assigned.approval_status, Some(ApprovalStatus::Pending));
}

#[tokio::test]
async fn test_assign_resets_approved_item_to_pending() {
    let (_dir, mut service) = service().await;
    let added = service.add_todo(TodoDraft::new("review me")).await.unwrap();

    service
        .assign_todo(added.id, vec!["bob".to_string()])
        .await
        .unwrap();
    service
        .approve_todo(added.id, Some("looks good".to_string()))
        .await
        .unwrap();

    // Re-assignment puts the item back into the review queue.
    let reassigned = service
        .assign_todo(added.id, vec!["carol".to_string()])
        .await
        .unwrap();
    assert_eq!(reassigned.approval_status, Some(ApprovalStatus::Pending));
}

#[tokio::test]
async fn test_approve_and_reject_have_no_guard() {
    let (_dir, mut service) = service().await;
    let added = service.add_todo(TodoDraft::new("review me")).await.unwrap();
    service
        .assign_todo(added.id, vec!["bob".to_string()])
        .await
        .unwrap();

    let approved = service
        .approve_todo(added.id, Some("fine".to_string()))
        .await
        .unwrap();
    assert_eq!(approved.approval_status, Some(ApprovalStatus::Approved));
    assert_eq!(approved.approval_notes.as_deref(), Some("fine"));

    // Rejecting an approved item is allowed and replaces the notes.
    let rejected = service.reject_todo(added.id, None).await.unwrap();
    assert_eq!(rejected.approval_status, Some(ApprovalStatus::Rejected));
    assert!(rejected.approval_notes.is_none());
}

#[tokio::test]
async fn test_approval_queues() {
    let (_dir, mut service) = service().await;
    let mine = service.add_todo(TodoDraft::new("for alice")).await.unwrap();
    let other = service.add_todo(TodoDraft::new("for bob")).await.unwrap();
    let done = service
        .add_todo(TodoDraft::new("completed").with_status(TodoStatus::Completed))
        .await
        .unwrap();

    service
        .assign_todo(mine.id, vec!["alice".to_string()])
        .await
        .unwrap();
    service
        .assign_todo(other.id, vec!["bob".to_string()])
        .await
        .unwrap();
    service
        .assign_todo(done.id, vec!["bob".to_string()])
        .await
        .unwrap();

    let approvable = service.approvable_todos();
    assert_eq!(approvable.len(), 1);
    assert_eq!(approvable[0].title, "for alice");

    assert_eq!(service.todos_needing_approval_by("bob").len(), 2);

    // Completed items are excluded unless asked for.
    assert_eq!(service.pending_approval_todos(false).len(), 2);
    assert_eq!(service.pending_approval_todos(true).len(), 3);
}

#[tokio::test]
async fn test_my_and_assigned_todos() {
    let (_dir, mut service) = service().await;
    let a = service.add_todo(TodoDraft::new("mine")).await.unwrap();
    service
        .assign_todo(a.id, vec!["alice".to_string()])
        .await
        .unwrap();

    service.set_current_user("bob");
    service.add_todo(TodoDraft::new("bobs")).await.unwrap();

    assert_eq!(service.my_todos().len(), 1);
    service.set_current_user("alice");
    assert_eq!(service.my_todos().len(), 1);
    assert_eq!(service.assigned_todos().len(), 1);
}

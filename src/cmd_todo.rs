//! Todo command handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use uuid::Uuid;

use t2p_config::{Config, ConfigLoader};
use t2p_core::TodoService;
use t2p_llm::{DisabledLlm, LlmMiddleware, OllamaClient, TodoSuggestion};
use t2p_protocols::todo::{
    ApprovalStatus, Horizon, Priority, TodoDraft, TodoFilter, TodoItem, TodoStatus, TodoUpdate,
};
use t2p_protocols::LlmClient;
use t2p_store::TodoStore;

use crate::cli::{ApprovalAction, TodoAction};

pub(crate) async fn run(
    action: TodoAction,
    config: &Config,
    config_path: &Path,
) -> anyhow::Result<()> {
    let store = TodoStore::new(config.todo_file());
    let mut service = TodoService::open(store, config.current_user()).await?;

    match action {
        TodoAction::Add {
            text,
            priority,
            status,
            horizon,
            tags,
            category,
            no_llm,
            remix,
        } => {
            let use_llm = config.llm.enabled && !no_llm;

            let mut draft = if use_llm {
                let middleware = build_middleware(config);
                let mut suggestion = middleware.process_todo(&text).await;

                if let Some(parts) = remix {
                    let parts: Vec<String> = split_list(&parts);
                    let remixed = middleware.remix_suggestions(&suggestion, &parts).await;
                    apply_remix(&mut suggestion, &remixed);
                }

                print_suggestion(&suggestion);
                suggestion.into_draft()
            } else {
                TodoDraft::new(text)
            };

            // Explicit flags override whatever the model suggested.
            if let Some(value) = priority {
                draft.priority = parse_priority(value)?;
            }
            if let Some(value) = status {
                draft.status = parse_status(&value)?;
            }
            if let Some(value) = horizon {
                draft.horizon = parse_horizon(&value)?;
            }
            if let Some(value) = tags {
                draft.tags = split_list(&value);
            }
            if let Some(value) = category {
                draft.category = Some(value);
            }

            let todo = service.add_todo(draft).await?;
            println!("✓ Todo added:");
            print_todo(&todo, true);
        }

        TodoAction::List {
            priority,
            status,
            horizon,
            tags,
            category,
            search,
            approval,
            assigned_to,
            show_ids,
        } => {
            let filter = TodoFilter {
                priority: priority.map(parse_priority).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                horizon: horizon.as_deref().map(parse_horizon).transpose()?,
                tags: tags.as_deref().map(split_list).unwrap_or_default(),
                category,
                search,
                approval_status: approval.as_deref().map(parse_approval).transpose()?,
                assigned_to,
            };

            let todos = service.get_todos(&filter);
            if todos.is_empty() {
                println!("No todos found.");
            } else {
                for todo in &todos {
                    print_todo(todo, show_ids);
                }
                println!("\n{} item(s)", todos.len());
            }
        }

        TodoAction::Update {
            id,
            title,
            description,
            priority,
            status,
            horizon,
            tags,
            category,
        } => {
            let update = TodoUpdate {
                title,
                description,
                priority: priority.map(parse_priority).transpose()?,
                status: status.as_deref().map(parse_status).transpose()?,
                horizon: horizon.as_deref().map(parse_horizon).transpose()?,
                tags: tags.as_deref().map(split_list),
                category,
                github_issue: None,
            };
            if update.is_empty() {
                bail!("nothing to update; pass at least one field flag");
            }

            let todo = service.update_todo(parse_id(&id)?, update).await?;
            println!("✓ Todo updated:");
            print_todo(&todo, true);
        }

        TodoAction::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete_todo(id).await?;
            println!("✓ Todo {id} deleted");
        }

        TodoAction::Stats => {
            let stats = service.stats();
            println!("Total items: {}", stats.total_items);

            println!("\nBy status:");
            for (status, count) in &stats.by_status {
                println!("  {status}: {count}");
            }
            println!("\nBy priority:");
            for (priority, count) in &stats.by_priority {
                println!("  P{priority}: {count}");
            }
            println!("\nBy horizon:");
            for (horizon, count) in &stats.by_horizon {
                println!("  {horizon}: {count}");
            }
            if !stats.by_category.is_empty() {
                println!("\nBy category:");
                for (category, count) in &stats.by_category {
                    println!("  {category}: {count}");
                }
            }
        }

        TodoAction::Approval { action } => {
            run_approval(action, config, &mut service).await?;
        }

        TodoAction::User { username } => {
            let mut updated = config.clone();
            updated.user = Some(username.clone());
            ConfigLoader::save(config_path, &updated)?;
            println!("✓ Current user set to {username}");
        }
    }

    Ok(())
}

async fn run_approval(
    action: ApprovalAction,
    config: &Config,
    service: &mut TodoService,
) -> anyhow::Result<()> {
    match action {
        ApprovalAction::List => {
            let todos = service.approvable_todos();
            print_approval_queue(&todos, "No todos waiting for your approval.");
        }

        ApprovalAction::Pending => {
            let todos: Vec<&TodoItem> = service
                .my_todos()
                .into_iter()
                .filter(|todo| todo.approval_status == Some(ApprovalStatus::Pending))
                .collect();
            print_approval_queue(&todos, "None of your todos are pending approval.");
        }

        ApprovalAction::All {
            include_completed,
            user,
        } => {
            let todos = match &user {
                Some(user) => service.todos_needing_approval_by(user),
                None => service.pending_approval_todos(include_completed),
            };
            print_approval_queue(&todos, "No todos pending approval.");
        }

        ApprovalAction::Approve { id, notes } => {
            let todo = service.approve_todo(parse_id(&id)?, notes).await?;
            println!("✓ Approved: {}", todo.title);
        }

        ApprovalAction::Reject { id, notes } => {
            let todo = service.reject_todo(parse_id(&id)?, notes).await?;
            println!("✗ Rejected: {}", todo.title);
        }

        ApprovalAction::Assign { id, users, team } => {
            let assignees = match (users, team) {
                (Some(users), None) => split_list(&users),
                (None, Some(team)) => config
                    .team(&team)
                    .ok_or_else(|| anyhow!("unknown team: {team}"))?
                    .to_vec(),
                _ => bail!("pass exactly one of --users or --team"),
            };
            if assignees.is_empty() {
                bail!("assignee list is empty");
            }

            let todo = service.assign_todo(parse_id(&id)?, assignees).await?;
            println!(
                "✓ Assigned {} to {} (approval pending)",
                todo.title,
                todo.assigned_to.as_deref().unwrap_or_default().join(", ")
            );
        }
    }

    Ok(())
}

pub(crate) fn build_middleware(config: &Config) -> LlmMiddleware {
    let client: Arc<dyn LlmClient> = if config.llm.enabled {
        Arc::new(OllamaClient::with_endpoint(
            config.llm.model.clone(),
            config.llm_endpoint(),
        ))
    } else {
        Arc::new(DisabledLlm)
    };
    LlmMiddleware::new(client).with_cache_dir(config.llm_cache_dir())
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_id(value: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value.trim()).with_context(|| format!("invalid todo id: {value}"))
}

fn parse_priority(value: u8) -> anyhow::Result<Priority> {
    Priority::new(value).ok_or_else(|| anyhow!("priority must be 1-5, got {value}"))
}

fn parse_status(value: &str) -> anyhow::Result<TodoStatus> {
    value.parse().map_err(|e: String| anyhow!(e))
}

fn parse_horizon(value: &str) -> anyhow::Result<Horizon> {
    value.parse().map_err(|e: String| anyhow!(e))
}

fn parse_approval(value: &str) -> anyhow::Result<ApprovalStatus> {
    value.parse().map_err(|e: String| anyhow!(e))
}

fn print_suggestion(suggestion: &TodoSuggestion) {
    println!("⚡ Refined with AI:");
    println!("  Title: {}", suggestion.title);
    if !suggestion.description.is_empty() {
        println!("  Description: {}", suggestion.description);
    }
    println!("  Tags: {}", suggestion.tags.join(", "));
    println!("  Category: {}", suggestion.category);
    println!(
        "  Priority: {}  Horizon: {}  Status: {}",
        suggestion.priority, suggestion.horizon, suggestion.status
    );
    if !suggestion.rationale.is_empty() {
        println!("  Rationale: {}", suggestion.rationale);
    }
    println!();
}

fn apply_remix(
    suggestion: &mut TodoSuggestion,
    remixed: &std::collections::HashMap<String, serde_json::Value>,
) {
    for (part, value) in remixed {
        match (part.as_str(), value) {
            ("title", serde_json::Value::String(s)) => suggestion.title = s.clone(),
            ("description", serde_json::Value::String(s)) => suggestion.description = s.clone(),
            ("category", serde_json::Value::String(s)) => suggestion.category = s.clone(),
            ("tags", serde_json::Value::Array(items)) => {
                suggestion.tags = items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect();
            }
            _ => {
                println!("  (remix for {part} not applied: {value})");
            }
        }
    }
}

fn print_todo(todo: &TodoItem, show_id: bool) {
    println!(
        "- {} [{}] {}: {}",
        todo.status.emoji(),
        todo.horizon,
        todo.priority,
        todo.title
    );
    if show_id {
        println!("    id: {}", todo.id);
    }
    if let Some(description) = &todo.description {
        println!("    description: {description}");
    }
    if !todo.tags.is_empty() {
        println!("    tags: {}", todo.tags.join(", "));
    }
    if let Some(category) = &todo.category {
        println!("    category: {category}");
    }
    if let Some(assigned) = &todo.assigned_to {
        println!("    assigned: {}", assigned.join(", "));
    }
    if let Some(approval) = &todo.approval_status {
        println!("    approval: {approval}");
    }
}

fn print_approval_queue(todos: &[&TodoItem], empty_message: &str) {
    if todos.is_empty() {
        println!("{empty_message}");
        return;
    }
    for todo in todos {
        print_todo(todo, true);
    }
    println!("\n{} item(s)", todos.len());
}

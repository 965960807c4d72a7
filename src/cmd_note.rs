//! Note command handlers.

use std::path::PathBuf;

use anyhow::{bail, Context};
use uuid::Uuid;

use t2p_config::Config;
use t2p_core::{ExportFormat, NoteService};
use t2p_llm::{NoteAssistant, SummaryLength};
use t2p_protocols::note::{Note, NoteDraft, NoteFilter, NoteUpdate};
use t2p_store::NoteStore;

use crate::cli::NoteAction;
use crate::cmd_todo::{build_middleware, split_list};

pub(crate) async fn run(action: NoteAction, config: &Config) -> anyhow::Result<()> {
    let store = NoteStore::new(config.notes_file());
    let mut service = NoteService::open(store).await?;

    match action {
        NoteAction::New {
            title,
            content,
            ai,
            tags,
            category,
            draft,
        } => {
            let note = if let Some(prompt) = ai {
                let assistant = NoteAssistant::new(build_middleware(config));
                assistant
                    .generate_note_with_ai(&mut service, &prompt, Some(&title))
                    .await?
            } else {
                let mut note_draft = NoteDraft::new(title, content.unwrap_or_default());
                if let Some(tags) = tags {
                    note_draft = note_draft.with_tags(split_list(&tags));
                }
                if let Some(category) = category {
                    note_draft = note_draft.with_category(category);
                }
                if draft {
                    note_draft = note_draft.as_draft();
                }
                service.create_note(note_draft).await?
            };

            println!("✓ Note created:");
            print_note_summary(&note);
        }

        NoteAction::List {
            tag,
            category,
            search,
            todos,
            ai,
            drafts,
            limit,
        } => {
            let filter = NoteFilter {
                tags: tag.map(|t| vec![t]).unwrap_or_default(),
                category,
                search,
                has_todo_relations: todos.then_some(true),
                is_ai_generated: ai.then_some(true),
                is_draft: drafts.then_some(true),
            };

            let notes = service.get_notes(&filter);
            if notes.is_empty() {
                println!("No notes found.");
            } else {
                let total = notes.len();
                for note in notes.iter().take(limit) {
                    print_note_summary(note);
                }
                if total > limit {
                    println!("... and {} more (raise --limit to see them)", total - limit);
                }
            }
        }

        NoteAction::View { id } => {
            let id = parse_id(&id)?;
            let note = service
                .get_note(id)
                .with_context(|| format!("note not found: {id}"))?;

            println!("# {}", note.title);
            println!();
            println!("{}", note.content);
            println!();
            if !note.tags.is_empty() {
                println!("Tags: {}", note.tags.join(", "));
            }
            if let Some(category) = &note.category {
                println!("Category: {category}");
            }
            if let Some(url) = &note.source_url {
                println!("Source: {url}");
            }
            if let Some(related) = &note.related_todos {
                if !related.is_empty() {
                    let ids: Vec<String> = related.iter().map(Uuid::to_string).collect();
                    println!("Related todos: {}", ids.join(", "));
                }
            }
            println!("Created: {}", note.created_at.to_rfc3339());
            println!("Updated: {}", note.updated_at.to_rfc3339());
        }

        NoteAction::Edit {
            id,
            title,
            content,
            tags,
            category,
            draft,
        } => {
            let update = NoteUpdate {
                title,
                content,
                tags: tags.as_deref().map(split_list),
                category,
                is_draft: draft,
                ..NoteUpdate::default()
            };

            let note = service.update_note(parse_id(&id)?, update).await?;
            println!("✓ Note updated:");
            print_note_summary(&note);
        }

        NoteAction::Delete { id, force } => {
            let id = parse_id(&id)?;
            let note = service
                .get_note(id)
                .with_context(|| format!("note not found: {id}"))?;

            if !force {
                bail!(
                    "refusing to delete \"{}\" without --force",
                    note.title
                );
            }

            service.delete_note(id).await?;
            println!("✓ Note {id} deleted");
        }

        NoteAction::Export {
            format,
            output,
            tag,
            category,
            search,
        } => {
            let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let output =
                output.unwrap_or_else(|| PathBuf::from(format!("notes-export.{format}")));
            let filter = NoteFilter {
                tags: tag.map(|t| vec![t]).unwrap_or_default(),
                category,
                search,
                ..NoteFilter::default()
            };

            let written = service.export_notes(format, &output, &filter).await?;
            println!("✓ Notes exported to {}", written.display());
        }

        NoteAction::Link { note_id, todo_ids } => {
            let todo_ids = parse_todo_ids(&todo_ids)?;
            let note = service
                .link_to_todos(parse_id(&note_id)?, &todo_ids)
                .await?;
            println!(
                "✓ Linked \"{}\" to {} todo(s)",
                note.title,
                note.related_todos.as_deref().unwrap_or_default().len()
            );
        }

        NoteAction::Unlink { note_id, todo_ids } => {
            let todo_ids = parse_todo_ids(&todo_ids)?;
            let note = service
                .unlink_from_todos(parse_id(&note_id)?, &todo_ids)
                .await?;
            println!(
                "✓ Unlinked; \"{}\" now references {} todo(s)",
                note.title,
                note.related_todos.as_deref().unwrap_or_default().len()
            );
        }

        NoteAction::Web { url } => {
            let assistant = NoteAssistant::new(build_middleware(config));
            let note = assistant
                .create_note_from_web_page(&mut service, &url)
                .await?;
            println!("✓ Note captured from {url}:");
            print_note_summary(&note);
        }

        NoteAction::Summarize { id, length } => {
            let length: SummaryLength = length.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let id = parse_id(&id)?;
            let note = service
                .get_note(id)
                .with_context(|| format!("note not found: {id}"))?
                .clone();

            let assistant = NoteAssistant::new(build_middleware(config));
            let summary = assistant.summarize_note(&note, length).await?;
            println!("Summary of \"{}\":\n\n{}", note.title, summary);
        }

        NoteAction::Stats => {
            let stats = service.stats();
            println!("Total notes: {}", stats.total_items);
            println!("Drafts: {}", stats.drafts);
            println!("AI-generated: {}", stats.ai_generated);
            println!("With todo relations: {}", stats.with_todo_relations);

            if !stats.by_category.is_empty() {
                println!("\nBy category:");
                for (category, count) in &stats.by_category {
                    println!("  {category}: {count}");
                }
            }
            if !stats.by_tag.is_empty() {
                println!("\nBy tag:");
                for (tag, count) in &stats.by_tag {
                    println!("  {tag}: {count}");
                }
            }
        }
    }

    Ok(())
}

fn parse_id(value: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value.trim()).with_context(|| format!("invalid note id: {value}"))
}

fn parse_todo_ids(values: &[String]) -> anyhow::Result<Vec<Uuid>> {
    values
        .iter()
        .map(|value| {
            Uuid::parse_str(value.trim()).with_context(|| format!("invalid todo id: {value}"))
        })
        .collect()
}

fn print_note_summary(note: &Note) {
    let mut markers = Vec::new();
    if note.is_draft {
        markers.push("draft");
    }
    if note.ai_generated == Some(true) {
        markers.push("ai");
    }
    let suffix = if markers.is_empty() {
        String::new()
    } else {
        format!(" [{}]", markers.join(", "))
    };

    println!("- {}{}", note.title, suffix);
    println!("    id: {}", note.id);
    if !note.tags.is_empty() {
        println!("    tags: {}", note.tags.join(", "));
    }
    if let Some(category) = &note.category {
        println!("    category: {category}");
    }
}

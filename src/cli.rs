//! CLI definitions for t2p.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// t2p CLI.
#[derive(Parser)]
#[command(name = "t2p")]
#[command(about = "Todo and note CLI with local LLM enrichment")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.t2p/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the current user for this invocation
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage todo items
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },

    /// Manage notes
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum TodoAction {
    /// Add a new todo item
    Add {
        /// Freeform todo description
        text: String,

        /// Priority (1-5, 1 = highest)
        #[arg(short, long)]
        priority: Option<u8>,

        /// Status (not-started, in-progress, blocked, completed, recurring)
        #[arg(short, long)]
        status: Option<String>,

        /// Horizon (H1, H2, H3)
        #[arg(short = 'H', long)]
        horizon: Option<String>,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Category
        #[arg(short, long)]
        category: Option<String>,

        /// Skip LLM enrichment
        #[arg(long)]
        no_llm: bool,

        /// Comma-separated suggestion parts to remix (title, description, tags, category)
        #[arg(long)]
        remix: Option<String>,
    },

    /// List todo items
    List {
        /// Filter by priority
        #[arg(short, long)]
        priority: Option<u8>,

        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by horizon
        #[arg(short = 'H', long)]
        horizon: Option<String>,

        /// Filter by tags (comma-separated, all must match)
        #[arg(short, long)]
        tags: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Search in title and description
        #[arg(long)]
        search: Option<String>,

        /// Filter by approval status (pending, approved, rejected)
        #[arg(long)]
        approval: Option<String>,

        /// Filter by assigned user
        #[arg(long)]
        assigned_to: Option<String>,

        /// Show todo IDs
        #[arg(long)]
        show_ids: bool,
    },

    /// Update a todo item
    Update {
        /// Todo ID
        id: String,

        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority
        #[arg(short, long)]
        priority: Option<u8>,

        /// New status
        #[arg(short, long)]
        status: Option<String>,

        /// New horizon
        #[arg(short = 'H', long)]
        horizon: Option<String>,

        /// New tags (comma-separated)
        #[arg(short, long)]
        tags: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a todo item
    Delete {
        /// Todo ID
        id: String,
    },

    /// Show todo statistics
    Stats,

    /// Manage todo approvals
    Approval {
        #[command(subcommand)]
        action: ApprovalAction,
    },

    /// Set the current user and persist it to the config file
    User {
        /// Username
        username: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ApprovalAction {
    /// List todos requiring your approval
    List,

    /// List todos you submitted that are pending approval
    Pending,

    /// List all todos pending approval from any user
    All {
        /// Include completed todos
        #[arg(long)]
        include_completed: bool,

        /// Filter by assigned user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Approve a todo item
    Approve {
        /// Todo ID
        id: String,

        /// Approval notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Reject a todo item
    Reject {
        /// Todo ID
        id: String,

        /// Rejection notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Assign a todo for approval to one or more users
    Assign {
        /// Todo ID
        id: String,

        /// Comma-separated list of usernames
        #[arg(short, long)]
        users: Option<String>,

        /// Assign to a team defined in the config file
        #[arg(short, long)]
        team: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum NoteAction {
    /// Create a new note
    New {
        /// Note title
        title: String,

        /// Note content
        #[arg(short = 'C', long)]
        content: Option<String>,

        /// Generate note content with AI from the given prompt
        #[arg(short, long)]
        ai: Option<String>,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Category
        #[arg(long)]
        category: Option<String>,

        /// Save as draft
        #[arg(short, long)]
        draft: bool,
    },

    /// List notes
    List {
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Search in title and content
        #[arg(short, long)]
        search: Option<String>,

        /// Show only notes with todo relations
        #[arg(long)]
        todos: bool,

        /// Show only AI-generated notes
        #[arg(long)]
        ai: bool,

        /// Show only draft notes
        #[arg(long)]
        drafts: bool,

        /// Limit number of results
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// View a note
    View {
        /// Note ID
        id: String,
    },

    /// Edit a note
    Edit {
        /// Note ID
        id: String,

        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,

        /// New content
        #[arg(short = 'C', long)]
        content: Option<String>,

        /// New tags (comma-separated)
        #[arg(short, long)]
        tags: Option<String>,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// Set draft status
        #[arg(short, long)]
        draft: Option<bool>,
    },

    /// Delete a note
    Delete {
        /// Note ID
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Export notes to a file
    Export {
        /// Export format (md, json, html)
        #[arg(short, long, default_value = "md")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Search in title and content
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Link a note to todos
    Link {
        /// Note ID
        note_id: String,

        /// Todo IDs to link
        #[arg(required = true)]
        todo_ids: Vec<String>,
    },

    /// Unlink a note from todos
    Unlink {
        /// Note ID
        note_id: String,

        /// Todo IDs to unlink
        #[arg(required = true)]
        todo_ids: Vec<String>,
    },

    /// Create a note from a web page
    Web {
        /// URL to capture
        url: String,
    },

    /// Summarize a note with AI
    Summarize {
        /// Note ID
        id: String,

        /// Summary length (short, medium, long)
        #[arg(short, long, default_value = "medium")]
        length: String,
    },

    /// Show note statistics
    Stats,
}

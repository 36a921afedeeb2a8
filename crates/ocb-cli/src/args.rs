//! Command-line interface definitions using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Command-line client for the OpenClaw Board task tracker
///
/// Talks to a running board server over its REST API. Task IDs are
/// accepted as `OCB-<n>` or a bare number, where `<n>` is the task's
/// board number.
#[derive(Parser)]
#[command(version, about, name = "ocb")]
pub struct Args {
    /// Base URL of the board API. Defaults to http://localhost:3000/api
    #[arg(long, global = true, env = "OCB_API_URL")]
    pub api_url: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for the board CLI
#[derive(Subcommand)]
pub enum Command {
    /// List tasks
    #[command(alias = "ls")]
    List(ListArgs),
    /// Show task details
    Show(ShowArgs),
    /// Create a new task
    #[command(alias = "new")]
    Create(CreateArgs),
    /// Start working on a task (move to IN_PROGRESS)
    Start(TaskIdArgs),
    /// Mark a task as done
    Done(TaskIdArgs),
    /// Move a task to needs review
    Review(TaskIdArgs),
    /// Mark a task as blocked
    Block(BlockArgs),
    /// Pick the next TODO task and start working on it
    Pick(PickArgs),
    /// Show the currently active task
    Active(JsonArgs),
    /// Add a comment to a task
    Comment(CommentArgs),
    /// List TODO tasks (shorthand)
    Todo(JsonArgs),
}

/// List tasks with optional filters
#[derive(ClapArgs)]
pub struct ListArgs {
    /// Filter by status (TODO, IN_PROGRESS, NEEDS_REVIEW, DONE)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter by priority (CRITICAL, HIGH, MEDIUM, LOW)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Filter by tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Include archived tasks
    #[arg(short, long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show one task
#[derive(ClapArgs)]
pub struct ShowArgs {
    /// Task ID (OCB-42 or 42)
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create a new task
#[derive(ClapArgs)]
pub struct CreateArgs {
    /// Title of the task
    pub title: String,

    /// Task description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority (CRITICAL, HIGH, MEDIUM, LOW)
    #[arg(short, long, default_value = "MEDIUM")]
    pub priority: String,

    /// Comma-separated tags
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// A single task ID argument
#[derive(ClapArgs)]
pub struct TaskIdArgs {
    /// Task ID (OCB-42 or 42)
    pub id: String,
}

/// Mark a task as blocked
#[derive(ClapArgs)]
pub struct BlockArgs {
    /// Task ID (OCB-42 or 42)
    pub id: String,

    /// Why the task is blocked
    pub reason: Option<String>,
}

/// Pick the next TODO task
#[derive(ClapArgs)]
pub struct PickArgs {
    /// Pick highest priority first
    #[arg(long)]
    pub priority: bool,
}

/// Plain/JSON output switch
#[derive(ClapArgs)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Add a comment to a task
#[derive(ClapArgs)]
pub struct CommentArgs {
    /// Task ID (OCB-42 or 42)
    pub id: String,

    /// Comment text
    pub message: String,
}

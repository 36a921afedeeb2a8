//! Core library for the OpenClaw Board task tracker.
//!
//! This crate provides the business logic for a kanban board shared by a
//! human and an AI agent: domain models, SQLite persistence, the
//! status-transition policy, the Done-column archive policy, and the change
//! event fanout consumed by real-time subscribers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │      Board      │───▶│     Policy      │    │    Database     │
//! │ (async ops +    │    │ (transition,    │    │    (via db/)    │
//! │  event fanout)  │───▶│  archive)       │───▶│                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!    Service surface       Pure decisions        Data persistence
//! ```
//!
//! Every mutation follows the same sequence: validate, compute policy
//! effects, persist in one transaction, run the archive sweep when a task
//! ended up DONE, then publish `task:*` events through the board's
//! [`EventHub`](events::EventHub). Events are strictly downstream — a
//! delivery problem can never fail the mutation that caused it.
//!
//! # Quick Start
//!
//! ```rust
//! use ocb_core::{params::CreateTask, BoardBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a board instance
//! let board = BoardBuilder::new()
//!     .with_database_path(Some("board.db"))
//!     .build()
//!     .await?;
//!
//! // Create a task
//! let create = CreateTask {
//!     title: "Wire up the WebSocket channel".to_string(),
//!     ..Default::default()
//! };
//! let task = board.create_task(&create).await?;
//! println!("Created OCB-{}", task.task_number);
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod params;
pub mod policy;

// Re-export commonly used types
pub use board::{Board, BoardBuilder, TaskUpdateOutcome};
pub use db::Database;
pub use error::{BoardError, Result};
pub use events::{BoardEvent, EventHub};
pub use models::{
    Activity, ActivityFilter, ActivityWithTask, Actor, ArchivePage, ArchiveQuery, Attachment,
    BoardMetrics, Comment, Origin, Priority, StatusHistoryEntry, Subtask, Task, TaskFilter,
    TaskRef, TaskStatus,
};
pub use params::{CreateTask, MetricsQuery, NewAttachment, NewComment, NewSubtask, UpdateSubtask, UpdateTask};

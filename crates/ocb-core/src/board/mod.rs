//! High-level board API for managing tasks and their child records.
//!
//! This module provides the main [`Board`] interface. The board sequences
//! every mutation the same way: validate the request, run the transition
//! policy and persistence inside a blocking database task, run the archive
//! sweep when the mutation left a task in DONE, and finally publish change
//! events through the owned [`EventHub`](crate::events::EventHub). Event
//! publication is downstream of persistence and can never fail a mutation.
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Board`] instances with configuration
//! - [`task_ops`]: Task CRUD, the transition pipeline and the archive sweep
//! - [`child_ops`]: Comment, subtask and attachment operations
//! - [`view_ops`]: Read-only views (activity feed, archive page, metrics)

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{BoardError, Result},
    events::EventHub,
};

pub mod builder;
pub mod child_ops;
pub mod task_ops;
pub mod view_ops;

pub use builder::BoardBuilder;
pub use task_ops::TaskUpdateOutcome;

/// Main board interface for managing tasks.
pub struct Board {
    pub(crate) db_path: PathBuf,
    events: EventHub,
}

impl Board {
    /// Creates a new board with the specified database path and event hub.
    pub(crate) fn new(db_path: PathBuf, events: EventHub) -> Self {
        Self { db_path, events }
    }

    /// The hub this board publishes change events through.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Runs a closure against a fresh database connection on the blocking
    /// thread pool.
    pub(crate) async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            f(db)
        })
        .await
        .map_err(|e| BoardError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

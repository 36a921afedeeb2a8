//! Database operations and SQLite management for tasks and child records.
//!
//! This module provides low-level database operations for the board. It
//! handles SQLite connections, schema management, and the query interfaces
//! for tasks, their child records, and aggregate metrics.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod child_queries;
pub mod metrics_queries;
pub mod migrations;
pub mod task_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

//! Database schema initialization and migrations.

use crate::error::{BoardError, DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Execute the schema SQL
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        // Apply migrations for existing databases
        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Databases created before the blocked-work revision lack the
        // blocked_reason column
        let has_blocked_reason: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('tasks') WHERE name = 'blocked_reason'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_blocked_reason {
            self.connection
                .execute("ALTER TABLE tasks ADD COLUMN blocked_reason TEXT", [])
                .map_err(|e| {
                    BoardError::database_error("Failed to add blocked_reason column to tasks", e)
                })?;
        }

        // story_points arrived alongside the metrics panel
        let has_story_points: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('tasks') WHERE name = 'story_points'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_story_points {
            self.connection
                .execute("ALTER TABLE tasks ADD COLUMN story_points INTEGER", [])
                .map_err(|e| {
                    BoardError::database_error("Failed to add story_points column to tasks", e)
                })?;
        }

        Ok(())
    }
}

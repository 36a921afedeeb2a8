//! Task CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row, ToSql};

use crate::{
    error::{BoardError, DatabaseResultExt, Result},
    models::{Origin, Priority, Task, TaskFilter, TaskRef, TaskStatus},
    params::{CreateTask, UpdateTask},
    policy,
};

// Optimized SQL queries as const strings for compile-time optimization
pub(super) const TASK_COLUMNS: &str = "id, task_number, title, description, status, priority, tags, position, is_active, origin, story_points, blocked_reason, archived, archived_at, started_at, reviewed_at, completed_at, created_at, updated_at";
const NEXT_TASK_NUMBER_SQL: &str = "INSERT INTO counters (name, value) VALUES ('task_number', 1) ON CONFLICT(name) DO UPDATE SET value = value + 1 RETURNING value";
const NEXT_TODO_POSITION_SQL: &str =
    "SELECT COALESCE(MAX(position), -1) + 1 FROM tasks WHERE status = 'TODO' AND archived = 0";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (task_number, title, description, priority, tags, position, origin, story_points, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const CHECK_TASK_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)";
const UPDATE_TASK_SQL: &str = "UPDATE tasks SET title = ?1, description = ?2, status = ?3, priority = ?4, tags = ?5, position = ?6, is_active = ?7, story_points = ?8, blocked_reason = ?9, started_at = ?10, reviewed_at = ?11, completed_at = ?12, updated_at = ?13 WHERE id = ?14";
const TOUCH_TASK_SQL: &str = "UPDATE tasks SET updated_at = ?1 WHERE id = ?2";
const ARCHIVE_TASK_SQL: &str =
    "UPDATE tasks SET archived = 1, archived_at = ?1, updated_at = ?1 WHERE id = ?2";
const ARCHIVE_STATS_SQL: &str =
    "SELECT COUNT(*), COALESCE(SUM(story_points), 0) FROM tasks WHERE archived = 1";
const INSERT_ACTIVITY_SQL: &str = "INSERT INTO activities (task_id, kind, actor, field, old_value, new_value, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const INSERT_STATUS_HISTORY_SQL: &str =
    "INSERT INTO status_history (task_id, status, entered_at) VALUES (?1, ?2, ?3)";
const OPEN_STATUS_ENTRY_SQL: &str =
    "SELECT entered_at FROM status_history WHERE task_id = ?1 AND duration_secs IS NULL";
const CLOSE_STATUS_ENTRY_SQL: &str =
    "UPDATE status_history SET duration_secs = ?1 WHERE task_id = ?2 AND duration_secs IS NULL";
const DELETE_DEPENDENCIES_SQL: &str = "DELETE FROM task_dependencies WHERE task_id = ?1";
const INSERT_DEPENDENCY_SQL: &str =
    "INSERT INTO task_dependencies (task_id, blocked_by_id) VALUES (?1, ?2)";
const SELECT_BLOCKED_BY_SQL: &str = "SELECT t.id, t.task_number, t.title, t.status FROM task_dependencies d JOIN tasks t ON t.id = d.blocked_by_id WHERE d.task_id = ?1 ORDER BY t.id";
const SELECT_BLOCKING_SQL: &str = "SELECT t.id, t.task_number, t.title, t.status FROM task_dependencies d JOIN tasks t ON t.id = d.task_id WHERE d.blocked_by_id = ?1 ORDER BY t.id";
const DELETE_TASK_CHILDREN_SQL: &[&str] = &[
    "DELETE FROM comments WHERE task_id = ?1",
    "DELETE FROM subtasks WHERE task_id = ?1",
    "DELETE FROM attachments WHERE task_id = ?1",
    "DELETE FROM activities WHERE task_id = ?1",
    "DELETE FROM status_history WHERE task_id = ?1",
    "DELETE FROM task_dependencies WHERE task_id = ?1 OR blocked_by_id = ?1",
];
const DELETE_TASK_SQL: &str = "DELETE FROM tasks WHERE id = ?1";

// Board ordering walks the workflow columns left to right
const BOARD_ORDER: &str = "CASE status WHEN 'TODO' THEN 0 WHEN 'IN_PROGRESS' THEN 1 WHEN 'NEEDS_REVIEW' THEN 2 ELSE 3 END, position, id";

/// Parses a required RFC 3339 timestamp column.
pub(super) fn read_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(idx)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parses an optional RFC 3339 timestamp column.
pub(super) fn read_optional_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<Timestamp>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| {
            s.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Parses an enum column stored as its canonical string.
pub(super) fn read_enum<T: std::str::FromStr>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let value: String = row.get(idx)?;
    value.parse::<T>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid enum value: {value}"),
            )),
        )
    })
}

fn split_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn join_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}

impl super::Database {
    /// Helper function to construct a Task from a database row, without its
    /// child collections.
    pub(super) fn build_task_from_row(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get::<_, i64>(0)? as u64,
            task_number: row.get::<_, i64>(1)? as u64,
            title: row.get(2)?,
            description: row.get(3)?,
            status: read_enum::<TaskStatus>(row, 4)?,
            priority: read_enum::<Priority>(row, 5)?,
            tags: split_tags(row.get(6)?),
            position: row.get(7)?,
            is_active: row.get(8)?,
            origin: read_enum::<Origin>(row, 9)?,
            story_points: row.get::<_, Option<i64>>(10)?.map(|p| p as u32),
            blocked_reason: row.get(11)?,
            archived: row.get(12)?,
            archived_at: read_optional_timestamp(row, 13)?,
            started_at: read_optional_timestamp(row, 14)?,
            reviewed_at: read_optional_timestamp(row, 15)?,
            completed_at: read_optional_timestamp(row, 16)?,
            created_at: read_timestamp(row, 17)?,
            updated_at: read_timestamp(row, 18)?,
            comments: Vec::new(),
            subtasks: Vec::new(),
            attachments: Vec::new(),
            blocked_by: Vec::new(),
            blocking: Vec::new(),
        })
    }

    fn build_task_ref_from_row(row: &Row) -> rusqlite::Result<TaskRef> {
        Ok(TaskRef {
            id: row.get::<_, i64>(0)? as u64,
            task_number: row.get::<_, i64>(1)? as u64,
            title: row.get(2)?,
            status: read_enum::<TaskStatus>(row, 3)?,
        })
    }

    /// Creates a new task in TODO at the bottom of the column, assigns the
    /// next sequential task number, and records the creation in the audit
    /// trail and status history.
    pub fn create_task(&mut self, create: &CreateTask) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        let task_number: i64 = tx
            .query_row(NEXT_TASK_NUMBER_SQL, [], |row| row.get(0))
            .map_err(|e| BoardError::database_error("Failed to allocate task number", e))?;

        let position: i64 = tx
            .query_row(NEXT_TODO_POSITION_SQL, [], |row| row.get(0))
            .map_err(|e| BoardError::database_error("Failed to compute column position", e))?;

        let priority = create.priority.unwrap_or_default();
        let origin = create.origin.unwrap_or_default();
        let actor = create.actor.unwrap_or_default();

        tx.execute(
            INSERT_TASK_SQL,
            params![
                task_number,
                create.title,
                create.description,
                priority.as_str(),
                join_tags(&create.tags),
                position,
                origin.as_str(),
                create.story_points,
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| BoardError::database_error("Failed to insert task", e))?;

        let id = tx.last_insert_rowid() as u64;

        tx.execute(
            INSERT_ACTIVITY_SQL,
            params![
                id as i64,
                "created",
                actor.as_str(),
                None::<String>,
                None::<String>,
                None::<String>,
                &now_str
            ],
        )
        .map_err(|e| BoardError::database_error("Failed to record creation activity", e))?;

        tx.execute(
            INSERT_STATUS_HISTORY_SQL,
            params![id as i64, TaskStatus::Todo.as_str(), &now_str],
        )
        .map_err(|e| BoardError::database_error("Failed to open status history", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Task {
            id,
            task_number: task_number as u64,
            title: create.title.clone(),
            description: create.description.clone(),
            status: TaskStatus::Todo,
            priority,
            tags: create.tags.clone(),
            position,
            is_active: false,
            origin,
            story_points: create.story_points,
            blocked_reason: None,
            archived: false,
            archived_at: None,
            started_at: None,
            reviewed_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            subtasks: Vec::new(),
            attachments: Vec::new(),
            blocked_by: Vec::new(),
            blocking: Vec::new(),
        })
    }

    /// Retrieves a task by its ID with all child collections loaded.
    pub fn get_task(&self, id: u64) -> Result<Option<Task>> {
        let mut task = self
            .connection
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id as i64],
                Self::build_task_from_row,
            )
            .optional()
            .map_err(|e| BoardError::database_error("Failed to query task", e))?;

        if let Some(ref mut task) = task {
            self.load_children(task)?;
        }

        Ok(task)
    }

    /// Returns whether a task with the given ID exists.
    pub(super) fn task_exists(&self, id: u64) -> Result<bool> {
        self.connection
            .query_row(CHECK_TASK_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .db_context("Failed to check task existence")
    }

    /// Lists tasks matching the filter in board order (workflow column,
    /// then position), with child collections loaded.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let (conditions, bound) = Self::filter_clauses(filter);
        self.select_tasks(&conditions, &bound, BOARD_ORDER)
    }

    /// Lists archived tasks for the archive view, most recently archived
    /// first, together with archive-wide totals.
    pub fn list_archive(
        &self,
        query: &crate::models::ArchiveQuery,
    ) -> Result<crate::models::ArchivePage> {
        let filter = TaskFilter::archived_only(query);
        let (conditions, bound) = Self::filter_clauses(&filter);
        let tasks = self.select_tasks(&conditions, &bound, "archived_at DESC, id DESC")?;

        let stats = self
            .connection
            .query_row(ARCHIVE_STATS_SQL, [], |row| {
                Ok(crate::models::ArchiveStats {
                    total_archived: row.get::<_, i64>(0)? as u64,
                    total_points: row.get::<_, i64>(1)? as u64,
                })
            })
            .map_err(|e| BoardError::database_error("Failed to query archive stats", e))?;

        Ok(crate::models::ArchivePage { tasks, stats })
    }

    fn filter_clauses(filter: &TaskFilter) -> (Vec<&'static str>, Vec<Box<dyn ToSql>>) {
        let mut conditions: Vec<&'static str> = Vec::new();
        let mut bound: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(archived) = filter.archived {
            conditions.push("archived = ?");
            bound.push(Box::new(archived));
        }

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            bound.push(Box::new(status.as_str().to_string()));
        }

        if let Some(priority) = filter.priority {
            conditions.push("priority = ?");
            bound.push(Box::new(priority.as_str().to_string()));
        }

        if let Some(ref tag) = filter.tag {
            // Exact membership test against the comma-joined tag column
            conditions.push("(',' || COALESCE(tags, '') || ',') LIKE ?");
            bound.push(Box::new(format!("%,{tag},%")));
        }

        if let Some(ref search) = filter.search {
            conditions.push("(title LIKE ? OR description LIKE ?)");
            let pattern = format!("%{search}%");
            bound.push(Box::new(pattern.clone()));
            bound.push(Box::new(pattern));
        }

        (conditions, bound)
    }

    fn select_tasks(
        &self,
        conditions: &[&str],
        bound: &[Box<dyn ToSql>],
        order_by: &str,
    ) -> Result<Vec<Task>> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY ");
        query.push_str(order_by);

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn ToSql> = bound.iter().map(|b| &**b).collect();

        let mut tasks: Vec<Task> = stmt
            .query_map(&params_refs[..], Self::build_task_from_row)
            .map_err(|e| BoardError::database_error("Failed to query tasks", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| BoardError::database_error("Failed to fetch tasks", e))?;

        for task in &mut tasks {
            self.load_children(task)?;
        }

        Ok(tasks)
    }

    fn load_children(&self, task: &mut Task) -> Result<()> {
        task.comments = self.get_comments(task.id)?;
        task.subtasks = self.get_subtasks(task.id)?;
        task.attachments = self.get_attachments(task.id)?;
        task.blocked_by = self.get_task_refs(SELECT_BLOCKED_BY_SQL, task.id)?;
        task.blocking = self.get_task_refs(SELECT_BLOCKING_SQL, task.id)?;
        Ok(())
    }

    fn get_task_refs(&self, sql: &str, task_id: u64) -> Result<Vec<TaskRef>> {
        let mut stmt = self
            .connection
            .prepare(sql)
            .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;

        let refs = stmt
            .query_map(params![task_id as i64], Self::build_task_ref_from_row)
            .map_err(|e| BoardError::database_error("Failed to query task references", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch task references");
        refs
    }

    /// Applies a partial update to a task.
    ///
    /// Runs the transition policy over the requested change, persists the
    /// merged field set together with the derived timestamps, replaces the
    /// dependency set when one is supplied, appends the audit entries, and
    /// keeps the status history log consistent. The whole update is one
    /// transaction; nothing is persisted on error.
    pub fn update_task(&mut self, id: u64, update: &UpdateTask, now: Timestamp) -> Result<Task> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = tx
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id as i64],
                Self::build_task_from_row,
            )
            .optional()
            .map_err(|e| BoardError::database_error("Failed to query task", e))?
            .ok_or(BoardError::TaskNotFound { id })?;

        let effects = policy::transition::plan(&current, update, now);
        let actor = update.actor();
        let now_str = now.to_string();

        // Merge requested fields over the current row
        let title = update.title.as_ref().unwrap_or(&current.title);
        let description = match &update.description {
            Some(description) => description.clone(),
            None => current.description.clone(),
        };
        let status = update.status.unwrap_or(current.status);
        let priority = update.priority.unwrap_or(current.priority);
        let tags = update.tags.as_deref().unwrap_or(&current.tags);
        let position = update.position.unwrap_or(current.position);
        let is_active = effects.is_active.unwrap_or(current.is_active);
        let story_points = match update.story_points {
            Some(points) => points,
            None => current.story_points,
        };
        let blocked_reason = match &update.blocked_reason {
            Some(reason) => reason
                .clone()
                .filter(|r| !r.trim().is_empty()),
            None => current.blocked_reason.clone(),
        };
        let started_at = effects.started_at.or(current.started_at);
        let reviewed_at = match effects.reviewed_at {
            Some(value) => value,
            None => current.reviewed_at,
        };
        let completed_at = match effects.completed_at {
            Some(value) => value,
            None => current.completed_at,
        };

        tx.execute(
            UPDATE_TASK_SQL,
            params![
                title,
                description,
                status.as_str(),
                priority.as_str(),
                join_tags(tags),
                position,
                is_active,
                story_points,
                blocked_reason,
                started_at.map(|t| t.to_string()),
                reviewed_at.map(|t| t.to_string()),
                completed_at.map(|t| t.to_string()),
                &now_str,
                id as i64
            ],
        )
        .map_err(|e| BoardError::database_error("Failed to update task", e))?;

        // Full replacement of the dependency set when present
        if let Some(dep_ids) = &update.blocked_by {
            for dep_id in dep_ids {
                if *dep_id == id {
                    return Err(BoardError::invalid_input("blockedBy")
                        .with_reason("A task cannot depend on itself"));
                }
                let exists: bool = tx
                    .query_row(CHECK_TASK_EXISTS_SQL, params![*dep_id as i64], |row| {
                        row.get(0)
                    })
                    .db_context("Failed to check dependency existence")?;
                if !exists {
                    return Err(BoardError::invalid_input("blockedBy")
                        .with_reason(format!("Unknown dependency task ID {dep_id}")));
                }
            }

            tx.execute(DELETE_DEPENDENCIES_SQL, params![id as i64])
                .map_err(|e| BoardError::database_error("Failed to clear dependencies", e))?;
            for dep_id in dep_ids {
                tx.execute(INSERT_DEPENDENCY_SQL, params![id as i64, *dep_id as i64])
                    .map_err(|e| BoardError::database_error("Failed to insert dependency", e))?;
            }
        }

        // Close the open status-history entry and start the next one
        if status != current.status {
            let entered: Option<String> = tx
                .query_row(OPEN_STATUS_ENTRY_SQL, params![id as i64], |row| row.get(0))
                .optional()
                .db_context("Failed to read open status entry")?;
            if let Some(entered) = entered {
                let entered_ts = entered.parse::<Timestamp>().map_err(|e| {
                    BoardError::invalid_input("entered_at").with_reason(e.to_string())
                })?;
                let duration_secs = (now.as_second() - entered_ts.as_second()).max(0);
                tx.execute(CLOSE_STATUS_ENTRY_SQL, params![duration_secs, id as i64])
                    .map_err(|e| {
                        BoardError::database_error("Failed to close status entry", e)
                    })?;
            }
            tx.execute(
                INSERT_STATUS_HISTORY_SQL,
                params![id as i64, status.as_str(), &now_str],
            )
            .map_err(|e| BoardError::database_error("Failed to open status entry", e))?;
        }

        for draft in &effects.activities {
            tx.execute(
                INSERT_ACTIVITY_SQL,
                params![
                    id as i64,
                    draft.kind.as_str(),
                    actor.as_str(),
                    draft.field,
                    draft.old_value,
                    draft.new_value,
                    &now_str
                ],
            )
            .map_err(|e| BoardError::database_error("Failed to record activity", e))?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_task(id)?.ok_or(BoardError::TaskNotFound { id })
    }

    /// Archives completed tasks beyond the visible Done-column limit.
    ///
    /// Returns the tasks archived by this sweep, oldest completion first.
    /// Runs after every update that leaves a task in DONE.
    pub fn archive_overflow(&mut self, now: Timestamp) -> Result<Vec<Task>> {
        let visible_done: Vec<Task> = {
            let query = format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE status = 'DONE' AND archived = 0 ORDER BY completed_at ASC, id ASC"
            );
            let mut stmt = self
                .connection
                .prepare(&query)
                .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;
            let tasks = stmt
                .query_map([], Self::build_task_from_row)
                .map_err(|e| BoardError::database_error("Failed to query completed tasks", e))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .db_context("Failed to fetch completed tasks")?;
            tasks
        };

        let excess: Vec<u64> = policy::archive::overflow(&visible_done)
            .iter()
            .map(|task| task.id)
            .collect();
        if excess.is_empty() {
            return Ok(Vec::new());
        }

        let now_str = now.to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        for task_id in &excess {
            tx.execute(ARCHIVE_TASK_SQL, params![&now_str, *task_id as i64])
                .map_err(|e| BoardError::database_error("Failed to archive task", e))?;
        }
        tx.commit().db_context("Failed to commit transaction")?;

        excess
            .into_iter()
            .map(|task_id| {
                self.get_task(task_id)?
                    .ok_or(BoardError::TaskNotFound { id: task_id })
            })
            .collect()
    }

    /// Permanently deletes a task and all its child records.
    /// This operation cannot be undone.
    pub fn delete_task(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_TASK_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .map_err(|e| BoardError::database_error("Failed to check task existence", e))?;

        if !exists {
            return Err(BoardError::TaskNotFound { id });
        }

        // Foreign key constraints would cascade, but be explicit
        for sql in DELETE_TASK_CHILDREN_SQL {
            tx.execute(sql, params![id as i64])
                .map_err(|e| BoardError::database_error("Failed to delete task children", e))?;
        }

        tx.execute(DELETE_TASK_SQL, params![id as i64])
            .map_err(|e| BoardError::database_error("Failed to delete task", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Refreshes a task's `updated_at` after a child-record mutation.
    pub(super) fn touch_task(&self, id: u64, now: Timestamp) -> Result<()> {
        self.connection
            .execute(TOUCH_TASK_SQL, params![now.to_string(), id as i64])
            .map(|_| ())
            .db_context("Failed to touch task")
    }
}

//! CRUD operations for records scoped to a parent task: comments,
//! subtasks, attachments, and the activity feed.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row, ToSql};

use crate::{
    error::{BoardError, DatabaseResultExt, Result},
    models::{
        Activity, ActivityFilter, ActivityWithTask, Actor, ActivityKind, Attachment,
        AttachmentKind, Comment, StatusHistoryEntry, Subtask, TaskRef, TaskStatus,
    },
    params::{NewAttachment, NewComment, NewSubtask, UpdateSubtask},
};

use super::task_queries::{read_enum, read_timestamp};

// Optimized SQL queries as const strings for compile-time optimization
const SELECT_COMMENTS_SQL: &str = "SELECT id, task_id, content, created_at FROM comments WHERE task_id = ?1 ORDER BY created_at ASC, id ASC";
const INSERT_COMMENT_SQL: &str =
    "INSERT INTO comments (task_id, content, created_at) VALUES (?1, ?2, ?3)";
const SELECT_SUBTASKS_SQL: &str = "SELECT id, task_id, title, completed, position, created_at FROM subtasks WHERE task_id = ?1 ORDER BY position ASC, id ASC";
const NEXT_SUBTASK_POSITION_SQL: &str =
    "SELECT COALESCE(MAX(position), -1) + 1 FROM subtasks WHERE task_id = ?1";
const INSERT_SUBTASK_SQL: &str =
    "INSERT INTO subtasks (task_id, title, position, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_SUBTASK_SQL: &str =
    "SELECT id, task_id, title, completed, position, created_at FROM subtasks WHERE id = ?1";
const UPDATE_SUBTASK_SQL: &str = "UPDATE subtasks SET title = ?1, completed = ?2 WHERE id = ?3";
const DELETE_SUBTASK_SQL: &str = "DELETE FROM subtasks WHERE id = ?1";
const SELECT_ATTACHMENTS_SQL: &str = "SELECT id, task_id, kind, title, content, mime_type, created_at FROM attachments WHERE task_id = ?1 ORDER BY created_at DESC, id DESC";
const INSERT_ATTACHMENT_SQL: &str = "INSERT INTO attachments (task_id, kind, title, content, mime_type, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_ATTACHMENT_SQL: &str =
    "SELECT id, task_id, kind, title, content, mime_type, created_at FROM attachments WHERE id = ?1";
const DELETE_ATTACHMENT_SQL: &str = "DELETE FROM attachments WHERE id = ?1";
const ACTIVITY_FEED_COLUMNS: &str = "a.id, a.task_id, a.kind, a.actor, a.field, a.old_value, a.new_value, a.created_at, t.id, t.task_number, t.title, t.status";
const SELECT_STATUS_HISTORY_SQL: &str = "SELECT id, task_id, status, entered_at, duration_secs FROM status_history WHERE task_id = ?1 ORDER BY entered_at ASC, id ASC";

fn build_comment_from_row(row: &Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get::<_, i64>(0)? as u64,
        task_id: row.get::<_, i64>(1)? as u64,
        content: row.get(2)?,
        created_at: read_timestamp(row, 3)?,
    })
}

fn build_subtask_from_row(row: &Row) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: row.get::<_, i64>(0)? as u64,
        task_id: row.get::<_, i64>(1)? as u64,
        title: row.get(2)?,
        completed: row.get(3)?,
        position: row.get(4)?,
        created_at: read_timestamp(row, 5)?,
    })
}

fn build_attachment_from_row(row: &Row) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get::<_, i64>(0)? as u64,
        task_id: row.get::<_, i64>(1)? as u64,
        kind: read_enum::<AttachmentKind>(row, 2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        mime_type: row.get(5)?,
        created_at: read_timestamp(row, 6)?,
    })
}

impl super::Database {
    /// Returns a task's comments, oldest first.
    pub fn get_comments(&self, task_id: u64) -> Result<Vec<Comment>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_COMMENTS_SQL)
            .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;

        let comments = stmt
            .query_map(params![task_id as i64], build_comment_from_row)
            .map_err(|e| BoardError::database_error("Failed to query comments", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch comments");
        comments
    }

    /// Adds a comment to the given task.
    pub fn add_comment(&mut self, task_id: u64, comment: &NewComment) -> Result<Comment> {
        if !self.task_exists(task_id)? {
            return Err(BoardError::TaskNotFound { id: task_id });
        }

        let now = Timestamp::now();
        self.connection
            .execute(
                INSERT_COMMENT_SQL,
                params![task_id as i64, comment.content, now.to_string()],
            )
            .map_err(|e| BoardError::database_error("Failed to insert comment", e))?;
        let id = self.connection.last_insert_rowid() as u64;
        self.touch_task(task_id, now)?;

        Ok(Comment {
            id,
            task_id,
            content: comment.content.clone(),
            created_at: now,
        })
    }

    /// Returns a task's subtasks in position order.
    pub fn get_subtasks(&self, task_id: u64) -> Result<Vec<Subtask>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SUBTASKS_SQL)
            .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;

        let subtasks = stmt
            .query_map(params![task_id as i64], build_subtask_from_row)
            .map_err(|e| BoardError::database_error("Failed to query subtasks", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch subtasks");
        subtasks
    }

    /// Adds a subtask at the end of the given task's checklist.
    pub fn add_subtask(&mut self, task_id: u64, subtask: &NewSubtask) -> Result<Subtask> {
        if !self.task_exists(task_id)? {
            return Err(BoardError::TaskNotFound { id: task_id });
        }

        let position: i64 = self
            .connection
            .query_row(NEXT_SUBTASK_POSITION_SQL, params![task_id as i64], |row| {
                row.get(0)
            })
            .map_err(|e| BoardError::database_error("Failed to compute subtask position", e))?;

        let now = Timestamp::now();
        self.connection
            .execute(
                INSERT_SUBTASK_SQL,
                params![task_id as i64, subtask.title, position, now.to_string()],
            )
            .map_err(|e| BoardError::database_error("Failed to insert subtask", e))?;
        let id = self.connection.last_insert_rowid() as u64;
        self.touch_task(task_id, now)?;

        Ok(Subtask {
            id,
            task_id,
            title: subtask.title.clone(),
            completed: false,
            position,
            created_at: now,
        })
    }

    /// Applies a partial update to a subtask.
    pub fn update_subtask(&mut self, id: u64, update: &UpdateSubtask) -> Result<Subtask> {
        let current = self
            .connection
            .query_row(SELECT_SUBTASK_SQL, params![id as i64], build_subtask_from_row)
            .optional()
            .map_err(|e| BoardError::database_error("Failed to query subtask", e))?
            .ok_or(BoardError::SubtaskNotFound { id })?;

        let title = update.title.as_ref().unwrap_or(&current.title);
        let completed = update.completed.unwrap_or(current.completed);

        self.connection
            .execute(UPDATE_SUBTASK_SQL, params![title, completed, id as i64])
            .map_err(|e| BoardError::database_error("Failed to update subtask", e))?;
        self.touch_task(current.task_id, Timestamp::now())?;

        Ok(Subtask {
            title: title.clone(),
            completed,
            ..current
        })
    }

    /// Deletes a subtask. Returns the parent task ID.
    pub fn delete_subtask(&mut self, id: u64) -> Result<u64> {
        let current = self
            .connection
            .query_row(SELECT_SUBTASK_SQL, params![id as i64], build_subtask_from_row)
            .optional()
            .map_err(|e| BoardError::database_error("Failed to query subtask", e))?
            .ok_or(BoardError::SubtaskNotFound { id })?;

        self.connection
            .execute(DELETE_SUBTASK_SQL, params![id as i64])
            .map_err(|e| BoardError::database_error("Failed to delete subtask", e))?;
        self.touch_task(current.task_id, Timestamp::now())?;

        Ok(current.task_id)
    }

    /// Returns a task's attachments, newest first.
    pub fn get_attachments(&self, task_id: u64) -> Result<Vec<Attachment>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ATTACHMENTS_SQL)
            .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;

        let attachments = stmt
            .query_map(params![task_id as i64], build_attachment_from_row)
            .map_err(|e| BoardError::database_error("Failed to query attachments", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch attachments");
        attachments
    }

    /// Adds an attachment to the given task.
    pub fn add_attachment(&mut self, task_id: u64, attachment: &NewAttachment) -> Result<Attachment> {
        if !self.task_exists(task_id)? {
            return Err(BoardError::TaskNotFound { id: task_id });
        }

        let now = Timestamp::now();
        self.connection
            .execute(
                INSERT_ATTACHMENT_SQL,
                params![
                    task_id as i64,
                    attachment.kind.as_str(),
                    attachment.title,
                    attachment.content,
                    attachment.mime_type,
                    now.to_string()
                ],
            )
            .map_err(|e| BoardError::database_error("Failed to insert attachment", e))?;
        let id = self.connection.last_insert_rowid() as u64;
        self.touch_task(task_id, now)?;

        Ok(Attachment {
            id,
            task_id,
            kind: attachment.kind,
            title: attachment.title.clone(),
            content: attachment.content.clone(),
            mime_type: attachment.mime_type.clone(),
            created_at: now,
        })
    }

    /// Deletes an attachment. Returns the parent task ID.
    pub fn delete_attachment(&mut self, id: u64) -> Result<u64> {
        let current = self
            .connection
            .query_row(SELECT_ATTACHMENT_SQL, params![id as i64], build_attachment_from_row)
            .optional()
            .map_err(|e| BoardError::database_error("Failed to query attachment", e))?
            .ok_or(BoardError::AttachmentNotFound { id })?;

        self.connection
            .execute(DELETE_ATTACHMENT_SQL, params![id as i64])
            .map_err(|e| BoardError::database_error("Failed to delete attachment", e))?;
        self.touch_task(current.task_id, Timestamp::now())?;

        Ok(current.task_id)
    }

    /// Returns the activity feed, newest first, with task references joined.
    pub fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<ActivityWithTask>> {
        let mut query =
            format!("SELECT {ACTIVITY_FEED_COLUMNS} FROM activities a JOIN tasks t ON t.id = a.task_id");

        let mut conditions: Vec<&'static str> = Vec::new();
        let mut bound: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(actor) = filter.actor {
            conditions.push("a.actor = ?");
            bound.push(Box::new(actor.as_str().to_string()));
        }
        if let Some(task_id) = filter.task_id {
            conditions.push("a.task_id = ?");
            bound.push(Box::new(task_id as i64));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY a.created_at DESC, a.id DESC LIMIT ?");
        bound.push(Box::new(filter.limit.min(100) as i64));

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn ToSql> = bound.iter().map(|b| &**b).collect();

        let activities = stmt.query_map(&params_refs[..], |row| {
            Ok(ActivityWithTask {
                activity: Activity {
                    id: row.get::<_, i64>(0)? as u64,
                    task_id: row.get::<_, i64>(1)? as u64,
                    kind: read_enum::<ActivityKind>(row, 2)?,
                    actor: read_enum::<Actor>(row, 3)?,
                    field: row.get(4)?,
                    old_value: row.get(5)?,
                    new_value: row.get(6)?,
                    created_at: read_timestamp(row, 7)?,
                },
                task: TaskRef {
                    id: row.get::<_, i64>(8)? as u64,
                    task_number: row.get::<_, i64>(9)? as u64,
                    title: row.get(10)?,
                    status: read_enum::<TaskStatus>(row, 11)?,
                },
            })
        })
        .map_err(|e| BoardError::database_error("Failed to query activities", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch activities");
        activities
    }

    /// Returns a task's status history, oldest first.
    pub fn get_status_history(&self, task_id: u64) -> Result<Vec<StatusHistoryEntry>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STATUS_HISTORY_SQL)
            .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;

        let history = stmt.query_map(params![task_id as i64], |row| {
            Ok(StatusHistoryEntry {
                id: row.get::<_, i64>(0)? as u64,
                task_id: row.get::<_, i64>(1)? as u64,
                status: read_enum::<TaskStatus>(row, 2)?,
                entered_at: read_timestamp(row, 3)?,
                duration_secs: row.get(4)?,
            })
        })
        .map_err(|e| BoardError::database_error("Failed to query status history", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch status history");
        history
    }
}

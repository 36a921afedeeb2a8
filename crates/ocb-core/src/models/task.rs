//! Task model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Attachment, Comment, Origin, Priority, Subtask, TaskStatus};

/// Represents a task on the board with its child records.
///
/// Serializes with camelCase field names, which is the wire format both the
/// web board and the CLI consume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (never reused)
    pub id: u64,

    /// Human-facing sequential number, e.g. the `7` in `OCB-7`
    pub task_number: u64,

    /// Title of the task
    pub title: String,

    /// Detailed multi-line description of the task
    pub description: Option<String>,

    /// Current workflow status
    #[serde(default)]
    pub status: TaskStatus,

    /// Priority of the task
    #[serde(default)]
    pub priority: Priority,

    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,

    /// Display order within the task's status column
    pub position: i64,

    /// Whether this is the task currently being worked on
    pub is_active: bool,

    /// Who created the task; immutable after creation
    #[serde(default)]
    pub origin: Origin,

    /// Estimated effort in story points
    pub story_points: Option<u32>,

    /// Manual block reason; a non-empty value marks the task blocked
    /// independently of its status
    pub blocked_reason: Option<String>,

    /// Whether the task is hidden from the active board
    pub archived: bool,

    /// Timestamp when the task was archived
    pub archived_at: Option<Timestamp>,

    /// Timestamp of the first transition into IN_PROGRESS; set once
    pub started_at: Option<Timestamp>,

    /// Timestamp of the latest transition into NEEDS_REVIEW
    pub reviewed_at: Option<Timestamp>,

    /// Timestamp of the latest transition into DONE
    pub completed_at: Option<Timestamp>,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the task was last modified (UTC)
    pub updated_at: Timestamp,

    /// Comments, oldest first
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Subtasks in position order
    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    /// Attachments, newest first
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Tasks this task depends on
    #[serde(default)]
    pub blocked_by: Vec<TaskRef>,

    /// Tasks depending on this task (derived reverse relation)
    #[serde(default)]
    pub blocking: Vec<TaskRef>,
}

impl Task {
    /// Reports whether the task is blocked: either a manual block reason is
    /// set, or at least one dependency has not reached DONE.
    pub fn is_blocked(&self) -> bool {
        if self
            .blocked_reason
            .as_ref()
            .is_some_and(|reason| !reason.trim().is_empty())
        {
            return true;
        }
        self.blocked_by
            .iter()
            .any(|dep| dep.status != TaskStatus::Done)
    }
}

/// Lightweight reference to a task used for dependency edges and activity
/// feed entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    /// Unique identifier of the referenced task
    pub id: u64,

    /// Sequential number of the referenced task
    pub task_number: u64,

    /// Title of the referenced task
    pub title: String,

    /// Status of the referenced task
    pub status: TaskStatus,
}

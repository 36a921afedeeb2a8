//! Child record models scoped to a single parent task.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Actor, ActivityKind, AttachmentKind, TaskRef, TaskStatus};

/// A free-form comment on a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier for the comment
    pub id: u64,

    /// ID of the parent task
    pub task_id: u64,

    /// Comment body
    pub content: String,

    /// Timestamp when the comment was created (UTC)
    pub created_at: Timestamp,
}

/// A checklist item belonging to a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    /// Unique identifier for the subtask
    pub id: u64,

    /// ID of the parent task
    pub task_id: u64,

    /// Title of the subtask
    pub title: String,

    /// Whether the subtask is checked off
    pub completed: bool,

    /// Order of the subtask within its task (0-indexed)
    pub position: i64,

    /// Timestamp when the subtask was created (UTC)
    pub created_at: Timestamp,
}

/// A typed attachment on a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Unique identifier for the attachment
    pub id: u64,

    /// ID of the parent task
    pub task_id: u64,

    /// Payload type of the attachment
    #[serde(rename = "type")]
    pub kind: AttachmentKind,

    /// Optional display title
    pub title: Option<String>,

    /// Attachment payload: a URL, snippet, note text, or file reference
    pub content: String,

    /// MIME type for file attachments
    pub mime_type: Option<String>,

    /// Timestamp when the attachment was created (UTC)
    pub created_at: Timestamp,
}

/// An immutable audit record of one notable change to a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique identifier for the activity entry
    pub id: u64,

    /// ID of the parent task
    pub task_id: u64,

    /// What kind of change this entry records
    #[serde(rename = "type")]
    pub kind: ActivityKind,

    /// Who made the change
    pub actor: Actor,

    /// Name of the changed field, for field-level entries
    pub field: Option<String>,

    /// Previous value of the changed field
    pub old_value: Option<String>,

    /// New value of the changed field
    pub new_value: Option<String>,

    /// Timestamp when the entry was recorded (UTC)
    pub created_at: Timestamp,
}

/// An activity entry joined with a reference to its task, as served by the
/// activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityWithTask {
    /// The audit entry itself
    #[serde(flatten)]
    pub activity: Activity,

    /// Reference to the task the entry belongs to
    pub task: TaskRef,
}

/// One row of the append-only per-status time log.
///
/// Exactly one entry per task is open (`duration_secs` null) at any time;
/// it is closed when the task leaves that status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    /// Unique identifier for the history row
    pub id: u64,

    /// ID of the parent task
    pub task_id: u64,

    /// Status the task entered
    pub status: TaskStatus,

    /// Timestamp when the status was entered (UTC)
    pub entered_at: Timestamp,

    /// Seconds spent in the status; null while the status is current
    pub duration_secs: Option<i64>,
}

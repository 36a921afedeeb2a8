//! Parameter structures for board operations.
//!
//! Shared parameter structures used across interfaces (REST handlers, CLI
//! client) without framework-specific derives. The server deserializes
//! request bodies directly into these types and the CLI serializes them as
//! request bodies, so both sides agree on the wire format by construction.
//!
//! Partial-update fields distinguish three states the way the board's PATCH
//! surface does: absent (leave unchanged), `null` (clear), and a value
//! (set). Clearable fields use `Option<Option<T>>` with the
//! [`double_option`] deserializer; plain `Option<T>` fields cannot be
//! cleared, only set.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{BoardError, Result};
use crate::models::{Actor, AttachmentKind, Origin, Priority, TaskStatus};

/// Deserializes a present-but-possibly-null field into `Some(Option<T>)`,
/// leaving absent fields at the `None` default.
pub fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new task.
///
/// Tasks always start in TODO at the bottom of the column; a status field
/// in the request body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    /// Title of the task (required, non-empty)
    pub title: String,

    /// Optional detailed description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Priority; defaults to MEDIUM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Free-form labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Estimated effort in story points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,

    /// Who is creating the task; defaults to HUMAN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,

    /// Acting party for the audit trail; defaults to human
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,
}

impl CreateTask {
    /// Validate creation parameters.
    ///
    /// # Errors
    ///
    /// * `BoardError::InvalidInput` - when the title is empty or whitespace
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(BoardError::invalid_input("title").with_reason("Title must not be empty"));
        }
        Ok(())
    }
}

/// Parameters for a partial task update.
///
/// Only present fields are applied. Status changes trigger the transition
/// policy's timestamp side effects; `blocked_by` replaces the whole
/// dependency set; `blocking` is derived and must never be written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description; null clears it
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    /// New workflow status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// New priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Replacement tag list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// New position within the task's column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    /// Whether this task is the one being actively worked on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    /// New story points; null clears them
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub story_points: Option<Option<u32>>,

    /// New block reason; null or empty clears it
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<Option<String>>,

    /// Replacement set of task IDs this task depends on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<Vec<u64>>,

    /// Reverse dependency relation; writes are always rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<Vec<u64>>,

    /// Acting party for the audit trail; defaults to human
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,
}

impl UpdateTask {
    /// Validate update parameters.
    ///
    /// # Errors
    ///
    /// * `BoardError::InvalidInput` - when a present title is empty, or the
    ///   derived `blocking` relation is written to
    pub fn validate(&self) -> Result<()> {
        if self.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BoardError::invalid_input("title").with_reason("Title must not be empty"));
        }
        if self.blocking.is_some() {
            return Err(BoardError::invalid_input("blocking")
                .with_reason("The blocking relation is derived; update blockedBy instead"));
        }
        Ok(())
    }

    /// The acting party for this update, defaulting to human.
    pub fn actor(&self) -> Actor {
        self.actor.unwrap_or_default()
    }
}

/// Parameters for adding a comment to a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// Comment body (required, non-empty)
    pub content: String,
}

impl NewComment {
    /// Validate comment parameters.
    ///
    /// # Errors
    ///
    /// * `BoardError::InvalidInput` - when the content is empty
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(
                BoardError::invalid_input("content").with_reason("Comment must not be empty")
            );
        }
        Ok(())
    }
}

/// Parameters for adding a subtask to a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubtask {
    /// Title of the subtask (required, non-empty)
    pub title: String,
}

impl NewSubtask {
    /// Validate subtask parameters.
    ///
    /// # Errors
    ///
    /// * `BoardError::InvalidInput` - when the title is empty
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(BoardError::invalid_input("title").with_reason("Title must not be empty"));
        }
        Ok(())
    }
}

/// Parameters for a partial subtask update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubtask {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New checked-off state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Parameters for adding an attachment to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttachment {
    /// Payload type of the attachment
    #[serde(rename = "type")]
    pub kind: AttachmentKind,

    /// Optional display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Attachment payload (required, non-empty)
    pub content: String,

    /// MIME type for file attachments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl NewAttachment {
    /// Validate attachment parameters.
    ///
    /// # Errors
    ///
    /// * `BoardError::InvalidInput` - when the content is empty
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(
                BoardError::invalid_input("content").with_reason("Content must not be empty")
            );
        }
        Ok(())
    }
}

/// Parameters for a metrics query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsQuery {
    /// Whether to include the per-task and per-day breakdowns
    #[serde(default)]
    pub detailed: bool,

    /// Length of the trailing completion window in days
    #[serde(default = "default_metrics_days")]
    pub days: i64,
}

fn default_metrics_days() -> i64 {
    30
}

impl Default for MetricsQuery {
    fn default() -> Self {
        Self {
            detailed: false,
            days: default_metrics_days(),
        }
    }
}

//! Status and enumeration types for tasks and their audit records.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of task workflow statuses.
///
/// "Blocked" is deliberately not a status: a task is blocked through its
/// `blocked_reason` field or unfinished dependencies, orthogonally to its
/// position in the workflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    /// Task has been created but work has not started
    #[default]
    #[serde(rename = "TODO")]
    Todo,

    /// Task is being worked on
    #[serde(rename = "IN_PROGRESS")]
    InProgress,

    /// Task work is submitted and awaiting review
    #[serde(rename = "NEEDS_REVIEW")]
    NeedsReview,

    /// Task has been completed
    #[serde(rename = "DONE")]
    Done,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" | "INPROGRESS" => Ok(TaskStatus::InProgress),
            "NEEDS_REVIEW" | "NEEDSREVIEW" => Ok(TaskStatus::NeedsReview),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl TaskStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::NeedsReview => "NEEDS_REVIEW",
            TaskStatus::Done => "DONE",
        }
    }

    /// Human-facing column label for board and CLI display.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN PROGRESS",
            TaskStatus::NeedsReview => "NEEDS REVIEW",
            TaskStatus::Done => "DONE",
        }
    }
}

/// Type-safe enumeration of task priorities.
///
/// `Critical` is accepted everywhere even though the web board only ever
/// submits the lower three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Low priority
    Low,

    /// Normal priority
    #[default]
    Medium,

    /// High priority
    High,

    /// Drop-everything priority
    Critical,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            "CRITICAL" => Ok(Priority::Critical),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl Priority {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }

    /// Urgency rank, lower is more urgent. Used to order `pick` candidates.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Compact urgency marker for one-line task rows.
    pub fn marker(&self) -> &'static str {
        match self {
            Priority::Critical => "!!!",
            Priority::High => "!!",
            Priority::Medium => "!",
            Priority::Low => "\u{b7}",
        }
    }
}

/// Who created a task. Set at creation, immutable afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Origin {
    /// Created by a person through the board UI
    #[default]
    Human,

    /// Created by the agent through the CLI or API
    Ai,
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HUMAN" => Ok(Origin::Human),
            "AI" => Ok(Origin::Ai),
            _ => Err(format!("Invalid origin: {s}")),
        }
    }
}

impl Origin {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Human => "HUMAN",
            Origin::Ai => "AI",
        }
    }
}

/// The acting party recorded on an activity entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// A person acting through the board UI
    #[default]
    Human,

    /// The agent acting through the CLI or API
    Agent,
}

impl FromStr for Actor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Actor::Human),
            "agent" => Ok(Actor::Agent),
            _ => Err(format!("Invalid actor: {s}")),
        }
    }
}

impl Actor {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Human => "human",
            Actor::Agent => "agent",
        }
    }
}

/// The payload type of an attachment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// URL pointing at an external resource
    Link,

    /// Code snippet
    Code,

    /// Free-form note
    Note,

    /// File reference
    File,
}

impl FromStr for AttachmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "link" => Ok(AttachmentKind::Link),
            "code" => Ok(AttachmentKind::Code),
            "note" => Ok(AttachmentKind::Note),
            "file" => Ok(AttachmentKind::File),
            _ => Err(format!("Invalid attachment kind: {s}")),
        }
    }
}

impl AttachmentKind {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Link => "link",
            AttachmentKind::Code => "code",
            AttachmentKind::Note => "note",
            AttachmentKind::File => "file",
        }
    }
}

/// The kind of change an activity entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Task was created
    Created,

    /// Task moved between workflow statuses
    StatusChange,

    /// Task was flagged as the one being actively worked on
    StartedWork,

    /// Task stopped being the active one
    StoppedWork,

    /// A blocked reason was set
    Blocked,

    /// The blocked reason was cleared
    Unblocked,

    /// An audited field (title, priority) changed value
    FieldUpdate,
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(ActivityKind::Created),
            "status_change" => Ok(ActivityKind::StatusChange),
            "started_work" => Ok(ActivityKind::StartedWork),
            "stopped_work" => Ok(ActivityKind::StoppedWork),
            "blocked" => Ok(ActivityKind::Blocked),
            "unblocked" => Ok(ActivityKind::Unblocked),
            "field_update" => Ok(ActivityKind::FieldUpdate),
            _ => Err(format!("Invalid activity kind: {s}")),
        }
    }
}

impl ActivityKind {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Created => "created",
            ActivityKind::StatusChange => "status_change",
            ActivityKind::StartedWork => "started_work",
            ActivityKind::StoppedWork => "stopped_work",
            ActivityKind::Blocked => "blocked",
            ActivityKind::Unblocked => "unblocked",
            ActivityKind::FieldUpdate => "field_update",
        }
    }
}

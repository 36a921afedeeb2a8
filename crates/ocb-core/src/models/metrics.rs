//! Aggregate metrics computed over the board.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Flow metrics for the board, served by the metrics endpoint.
///
/// The basic block is always present; `task_metrics`, `velocity` and
/// `period_days` are filled only for detailed queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardMetrics {
    /// Number of non-archived tasks
    pub total_tasks: usize,

    /// Number of non-archived tasks in DONE
    pub completed_tasks: usize,

    /// Number of non-archived tasks in IN_PROGRESS
    pub in_progress_tasks: usize,

    /// Number of non-archived tasks in TODO
    pub todo_tasks: usize,

    /// Story points across all non-archived tasks
    pub total_points: u64,

    /// Story points across non-archived DONE tasks
    pub completed_points: u64,

    /// Mean hours from creation to completion over the trailing window,
    /// rounded to one decimal; null when nothing completed
    pub avg_cycle_time_hours: Option<f64>,

    /// Mean hours from first start to completion over the trailing window,
    /// rounded to one decimal; null when nothing completed
    pub avg_lead_time_hours: Option<f64>,

    /// Story points completed in the last 7 days (archived included)
    pub velocity_last7_days: u64,

    /// Story points completed in the trailing window (archived included)
    pub velocity_last30_days: u64,

    /// Per-task breakdown for recently completed tasks (detailed only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_metrics: Option<Vec<TaskCycleMetrics>>,

    /// Per-day completion buckets, newest first (detailed only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec<VelocityBucket>>,

    /// Length of the trailing window in days (detailed only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_days: Option<i64>,
}

/// Per-task cycle breakdown derived from the status history log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskCycleMetrics {
    /// ID of the task
    pub task_id: u64,

    /// Sequential number of the task
    pub task_number: u64,

    /// Title of the task
    pub title: String,

    /// Story points of the task
    pub story_points: Option<u32>,

    /// Seconds from creation to completion
    pub total_cycle_time: Option<i64>,

    /// Seconds spent in TODO
    pub time_in_todo: i64,

    /// Seconds spent in IN_PROGRESS
    pub time_in_progress: i64,

    /// Seconds spent in NEEDS_REVIEW
    pub time_in_review: i64,

    /// Timestamp when the task was completed
    pub completed_at: Option<Timestamp>,
}

/// Tasks and points completed on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VelocityBucket {
    /// Day in `YYYY-MM-DD` form
    pub period: String,

    /// Number of tasks completed on that day
    pub tasks_completed: u64,

    /// Story points completed on that day
    pub points_completed: u64,
}

/// Archived tasks together with archive totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchivePage {
    /// Archived tasks, most recently archived first
    pub tasks: Vec<super::Task>,

    /// Aggregate totals over the whole archive
    pub stats: ArchiveStats,
}

/// Aggregate totals over all archived tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveStats {
    /// Number of archived tasks
    pub total_archived: u64,

    /// Story points across archived tasks
    pub total_points: u64,
}

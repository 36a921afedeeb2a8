//! Aggregate flow metrics over tasks and their status history.

use std::collections::HashMap;

use jiff::Timestamp;

use crate::{
    error::{BoardError, DatabaseResultExt, Result},
    models::{BoardMetrics, Task, TaskCycleMetrics, TaskStatus, VelocityBucket},
    params::MetricsQuery,
};

use super::task_queries::TASK_COLUMNS;

const SECONDS_PER_DAY: i64 = 86_400;
const DETAILED_TASK_LIMIT: usize = 20;

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean_hours(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(round_tenth(samples.iter().sum::<f64>() / samples.len() as f64))
    }
}

/// Calendar-day bucket key, `YYYY-MM-DD`.
fn day_key(ts: Timestamp) -> String {
    let text = ts.to_string();
    text.split('T').next().unwrap_or(&text).to_string()
}

impl super::Database {
    /// Computes board flow metrics over a trailing completion window.
    ///
    /// Counts and point totals cover the non-archived board; cycle, lead and
    /// velocity numbers cover every task completed inside the window,
    /// archived ones included. Detailed queries add a per-task breakdown
    /// from the status history log and per-day velocity buckets.
    pub fn board_metrics(&self, query: &MetricsQuery, now: Timestamp) -> Result<BoardMetrics> {
        let since_second = now.as_second() - query.days * SECONDS_PER_DAY;
        let week_second = now.as_second() - 7 * SECONDS_PER_DAY;

        let board = self.select_bare_tasks("archived = 0")?;

        let mut completed_window: Vec<Task> =
            self.select_bare_tasks("status = 'DONE' AND completed_at IS NOT NULL")?;
        completed_window
            .retain(|t| t.completed_at.is_some_and(|c| c.as_second() >= since_second));
        completed_window.sort_by_key(|t| std::cmp::Reverse(t.completed_at));

        let total_tasks = board.len();
        let completed_tasks = board
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count();
        let in_progress_tasks = board
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .count();
        let todo_tasks = board
            .iter()
            .filter(|t| t.status == TaskStatus::Todo)
            .count();
        let total_points: u64 = board.iter().filter_map(|t| t.story_points).map(u64::from).sum();
        let completed_points: u64 = board
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .filter_map(|t| t.story_points)
            .map(u64::from)
            .sum();

        // Cycle time: creation to completion
        let cycle_samples: Vec<f64> = completed_window
            .iter()
            .filter_map(|t| t.completed_at.map(|c| (c, t.created_at)))
            .map(|(completed, created)| (completed.as_second() - created.as_second()) as f64 / 3600.0)
            .collect();

        // Lead time: first start to completion
        let lead_samples: Vec<f64> = completed_window
            .iter()
            .filter_map(|t| t.completed_at.zip(t.started_at))
            .map(|(completed, started)| (completed.as_second() - started.as_second()) as f64 / 3600.0)
            .collect();

        let velocity_last7_days: u64 = completed_window
            .iter()
            .filter(|t| t.completed_at.is_some_and(|c| c.as_second() >= week_second))
            .filter_map(|t| t.story_points)
            .map(u64::from)
            .sum();
        let velocity_last30_days: u64 = completed_window
            .iter()
            .filter_map(|t| t.story_points)
            .map(u64::from)
            .sum();

        let mut metrics = BoardMetrics {
            total_tasks,
            completed_tasks,
            in_progress_tasks,
            todo_tasks,
            total_points,
            completed_points,
            avg_cycle_time_hours: mean_hours(&cycle_samples),
            avg_lead_time_hours: mean_hours(&lead_samples),
            velocity_last7_days,
            velocity_last30_days,
            task_metrics: None,
            velocity: None,
            period_days: None,
        };

        if !query.detailed {
            return Ok(metrics);
        }

        let mut task_metrics = Vec::new();
        for task in completed_window.iter().take(DETAILED_TASK_LIMIT) {
            let mut time_in_todo = 0;
            let mut time_in_progress = 0;
            let mut time_in_review = 0;
            for entry in self.get_status_history(task.id)? {
                let duration = entry.duration_secs.unwrap_or(0);
                match entry.status {
                    TaskStatus::Todo => time_in_todo += duration,
                    TaskStatus::InProgress => time_in_progress += duration,
                    TaskStatus::NeedsReview => time_in_review += duration,
                    TaskStatus::Done => {}
                }
            }

            task_metrics.push(TaskCycleMetrics {
                task_id: task.id,
                task_number: task.task_number,
                title: task.title.clone(),
                story_points: task.story_points,
                total_cycle_time: task
                    .completed_at
                    .map(|c| c.as_second() - task.created_at.as_second()),
                time_in_todo,
                time_in_progress,
                time_in_review,
                completed_at: task.completed_at,
            });
        }

        let mut buckets: HashMap<String, (u64, u64)> = HashMap::new();
        for task in &completed_window {
            let Some(completed_at) = task.completed_at else {
                continue;
            };
            let bucket = buckets.entry(day_key(completed_at)).or_insert((0, 0));
            bucket.0 += 1;
            bucket.1 += task.story_points.map(u64::from).unwrap_or(0);
        }
        let mut velocity: Vec<VelocityBucket> = buckets
            .into_iter()
            .map(|(period, (tasks_completed, points_completed))| VelocityBucket {
                period,
                tasks_completed,
                points_completed,
            })
            .collect();
        velocity.sort_by(|a, b| b.period.cmp(&a.period));

        metrics.task_metrics = Some(task_metrics);
        metrics.velocity = Some(velocity);
        metrics.period_days = Some(query.days);

        Ok(metrics)
    }

    /// Fetches bare task rows (no child collections) matching a static
    /// WHERE clause.
    fn select_bare_tasks(&self, where_clause: &str) -> Result<Vec<Task>> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE {where_clause}");
        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| BoardError::database_error("Failed to prepare query", e))?;

        let tasks = stmt
            .query_map([], Self::build_task_from_row)
            .map_err(|e| BoardError::database_error("Failed to query tasks", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch tasks");
        tasks
    }
}

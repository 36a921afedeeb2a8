//! Status-transition side effects and audit entry derivation.

use jiff::Timestamp;

use crate::models::{ActivityKind, Task, TaskStatus};
use crate::params::UpdateTask;

/// A pending audit entry produced by the transition policy, persisted
/// alongside the update that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    /// What kind of change the entry records
    pub kind: ActivityKind,

    /// Name of the changed field, for field-level entries
    pub field: Option<String>,

    /// Previous value of the changed field
    pub old_value: Option<String>,

    /// New value of the changed field
    pub new_value: Option<String>,
}

impl ActivityDraft {
    fn new(kind: ActivityKind) -> Self {
        Self {
            kind,
            field: None,
            old_value: None,
            new_value: None,
        }
    }

    fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    fn with_values(mut self, old: Option<&str>, new: Option<&str>) -> Self {
        self.old_value = old.map(String::from);
        self.new_value = new.map(String::from);
        self
    }
}

/// Derived field changes for one requested update.
///
/// `None` means "leave the column untouched"; the nested options on
/// `reviewed_at`/`completed_at` distinguish setting a timestamp from
/// clearing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionEffects {
    /// Set `started_at`; only produced on the first entry into IN_PROGRESS
    pub started_at: Option<Timestamp>,

    /// Set or clear `reviewed_at`
    pub reviewed_at: Option<Option<Timestamp>>,

    /// Set or clear `completed_at`
    pub completed_at: Option<Option<Timestamp>>,

    /// Resolved `is_active` value; entering NEEDS_REVIEW forces `false`
    /// over whatever the request asked for
    pub is_active: Option<bool>,

    /// Audit entries to append for this update
    pub activities: Vec<ActivityDraft>,
}

/// Computes the effective side effects of applying `update` to `current`.
///
/// Pure function of its inputs; the caller persists the result. Status
/// rules fire only when the requested status differs from the current one:
///
/// * any → IN_PROGRESS sets `started_at` once, never overwriting it
/// * any → NEEDS_REVIEW sets `reviewed_at` and forces the task inactive
/// * any → DONE sets `completed_at`
/// * leaving DONE clears `completed_at`; leaving NEEDS_REVIEW clears
///   `reviewed_at`
pub fn plan(current: &Task, update: &UpdateTask, now: Timestamp) -> TransitionEffects {
    let mut effects = TransitionEffects::default();

    let next_status = update.status.filter(|next| *next != current.status);

    if let Some(next) = next_status {
        effects.activities.push(
            ActivityDraft::new(ActivityKind::StatusChange)
                .with_field("status")
                .with_values(Some(current.status.as_str()), Some(next.as_str())),
        );

        if next == TaskStatus::InProgress && current.started_at.is_none() {
            effects.started_at = Some(now);
        }

        if next == TaskStatus::NeedsReview {
            effects.reviewed_at = Some(Some(now));
        } else if current.status == TaskStatus::NeedsReview {
            effects.reviewed_at = Some(None);
        }

        if next == TaskStatus::Done {
            effects.completed_at = Some(Some(now));
        } else if current.status == TaskStatus::Done {
            effects.completed_at = Some(None);
        }
    }

    // Entering review always deactivates, overriding the request.
    let resolved_active = if next_status == Some(TaskStatus::NeedsReview) {
        Some(false)
    } else {
        update.is_active
    };
    if let Some(active) = resolved_active {
        effects.is_active = Some(active);
        if active != current.is_active {
            let kind = if active {
                ActivityKind::StartedWork
            } else {
                ActivityKind::StoppedWork
            };
            effects.activities.push(ActivityDraft::new(kind));
        }
    }

    if let Some(requested_reason) = &update.blocked_reason {
        let old_reason = normalized(current.blocked_reason.as_deref());
        let new_reason = normalized(requested_reason.as_deref());
        match (old_reason, new_reason) {
            (None, Some(reason)) => effects.activities.push(
                ActivityDraft::new(ActivityKind::Blocked)
                    .with_field("blockedReason")
                    .with_values(None, Some(reason)),
            ),
            (Some(reason), None) => effects.activities.push(
                ActivityDraft::new(ActivityKind::Unblocked)
                    .with_field("blockedReason")
                    .with_values(Some(reason), None),
            ),
            _ => {}
        }
    }

    if let Some(title) = &update.title {
        if title != &current.title {
            effects.activities.push(
                ActivityDraft::new(ActivityKind::FieldUpdate)
                    .with_field("title")
                    .with_values(Some(&current.title), Some(title)),
            );
        }
    }

    if let Some(priority) = update.priority {
        if priority != current.priority {
            effects.activities.push(
                ActivityDraft::new(ActivityKind::FieldUpdate)
                    .with_field("priority")
                    .with_values(Some(current.priority.as_str()), Some(priority.as_str())),
            );
        }
    }

    effects
}

fn normalized(reason: Option<&str>) -> Option<&str> {
    reason.map(str::trim).filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Origin, Priority};

    fn make_task(status: TaskStatus) -> Task {
        let now = Timestamp::now();
        Task {
            id: 1,
            task_number: 1,
            title: "Wire up the parser".to_string(),
            description: None,
            status,
            priority: Priority::Medium,
            tags: Vec::new(),
            position: 0,
            is_active: false,
            origin: Origin::Human,
            story_points: None,
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
        }
    }

    fn status_update(status: TaskStatus) -> UpdateTask {
        UpdateTask {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_start_sets_started_at() {
        let task = make_task(TaskStatus::Todo);
        let now = Timestamp::now();

        let effects = plan(&task, &status_update(TaskStatus::InProgress), now);

        assert_eq!(effects.started_at, Some(now));
        assert_eq!(effects.completed_at, None);
        assert_eq!(effects.reviewed_at, None);
    }

    #[test]
    fn test_restart_preserves_started_at() {
        let mut task = make_task(TaskStatus::Done);
        let first_start = Timestamp::now();
        task.started_at = Some(first_start);
        task.completed_at = Some(Timestamp::now());

        let effects = plan(&task, &status_update(TaskStatus::InProgress), Timestamp::now());

        // First start time is never overwritten by re-entries
        assert_eq!(effects.started_at, None);
        // Leaving DONE clears the completion timestamp
        assert_eq!(effects.completed_at, Some(None));
    }

    #[test]
    fn test_entering_review_sets_reviewed_at_and_forces_inactive() {
        let mut task = make_task(TaskStatus::InProgress);
        task.is_active = true;
        let now = Timestamp::now();

        let update = UpdateTask {
            status: Some(TaskStatus::NeedsReview),
            is_active: Some(true),
            ..Default::default()
        };
        let effects = plan(&task, &update, now);

        assert_eq!(effects.reviewed_at, Some(Some(now)));
        assert_eq!(effects.is_active, Some(false));
        assert!(effects
            .activities
            .iter()
            .any(|a| a.kind == ActivityKind::StoppedWork));
    }

    #[test]
    fn test_leaving_review_clears_reviewed_at() {
        let mut task = make_task(TaskStatus::NeedsReview);
        task.reviewed_at = Some(Timestamp::now());
        let now = Timestamp::now();

        let effects = plan(&task, &status_update(TaskStatus::Done), now);

        assert_eq!(effects.reviewed_at, Some(None));
        assert_eq!(effects.completed_at, Some(Some(now)));
    }

    #[test]
    fn test_same_status_has_no_side_effects() {
        let task = make_task(TaskStatus::InProgress);

        let effects = plan(&task, &status_update(TaskStatus::InProgress), Timestamp::now());

        assert_eq!(effects, TransitionEffects::default());
    }

    #[test]
    fn test_status_change_emits_audit_entry() {
        let task = make_task(TaskStatus::Todo);

        let effects = plan(&task, &status_update(TaskStatus::InProgress), Timestamp::now());

        let draft = &effects.activities[0];
        assert_eq!(draft.kind, ActivityKind::StatusChange);
        assert_eq!(draft.old_value.as_deref(), Some("TODO"));
        assert_eq!(draft.new_value.as_deref(), Some("IN_PROGRESS"));
    }

    #[test]
    fn test_blocked_and_unblocked_entries() {
        let task = make_task(TaskStatus::Todo);
        let update = UpdateTask {
            blocked_reason: Some(Some("waiting on API keys".to_string())),
            ..Default::default()
        };

        let effects = plan(&task, &update, Timestamp::now());
        assert_eq!(effects.activities[0].kind, ActivityKind::Blocked);
        assert_eq!(
            effects.activities[0].new_value.as_deref(),
            Some("waiting on API keys")
        );

        let mut blocked = make_task(TaskStatus::Todo);
        blocked.blocked_reason = Some("waiting on API keys".to_string());
        let update = UpdateTask {
            blocked_reason: Some(None),
            ..Default::default()
        };

        let effects = plan(&blocked, &update, Timestamp::now());
        assert_eq!(effects.activities[0].kind, ActivityKind::Unblocked);
    }

    #[test]
    fn test_reasserting_same_block_reason_is_silent() {
        let mut task = make_task(TaskStatus::Todo);
        task.blocked_reason = Some("waiting".to_string());
        let update = UpdateTask {
            blocked_reason: Some(Some("waiting".to_string())),
            ..Default::default()
        };

        let effects = plan(&task, &update, Timestamp::now());
        assert!(effects.activities.is_empty());
    }

    #[test]
    fn test_title_and_priority_changes_are_audited() {
        let task = make_task(TaskStatus::Todo);
        let update = UpdateTask {
            title: Some("Rewrite the parser".to_string()),
            priority: Some(Priority::High),
            ..Default::default()
        };

        let effects = plan(&task, &update, Timestamp::now());

        assert_eq!(effects.activities.len(), 2);
        assert!(effects
            .activities
            .iter()
            .any(|a| a.field.as_deref() == Some("title")
                && a.old_value.as_deref() == Some("Wire up the parser")));
        assert!(effects
            .activities
            .iter()
            .any(|a| a.field.as_deref() == Some("priority")
                && a.new_value.as_deref() == Some("HIGH")));
    }

    #[test]
    fn test_activating_a_task_logs_started_work() {
        let task = make_task(TaskStatus::Todo);
        let update = UpdateTask {
            is_active: Some(true),
            ..Default::default()
        };

        let effects = plan(&task, &update, Timestamp::now());

        assert_eq!(effects.is_active, Some(true));
        assert_eq!(effects.activities[0].kind, ActivityKind::StartedWork);
    }
}

use jiff::Timestamp;

use ocb_core::params::{CreateTask, NewAttachment, NewComment, NewSubtask, UpdateTask};
use ocb_core::{
    ActivityFilter, ArchiveQuery, BoardError, Database, Priority, Task, TaskFilter, TaskStatus,
};
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn create_task(db: &mut Database, title: &str) -> Task {
    db.create_task(&CreateTask {
        title: title.to_string(),
        ..Default::default()
    })
    .expect("Failed to create task")
}

fn set_status(db: &mut Database, id: u64, status: TaskStatus) -> Task {
    db.update_task(
        id,
        &UpdateTask {
            status: Some(status),
            ..Default::default()
        },
        Timestamp::now(),
    )
    .expect("Failed to update status")
}

#[test]
fn test_database_initialization() {
    let (temp_file, _db) = create_test_db();
    assert!(temp_file.path().exists());
}

#[test]
fn test_create_task_defaults() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_task(&mut db, "First task");

    assert_eq!(task.title, "First task");
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.task_number, 1);
    assert!(!task.is_active);
    assert!(!task.archived);
    assert!(task.started_at.is_none());
    assert!(task.completed_at.is_none());
}

#[test]
fn test_task_numbers_are_sequential() {
    let (_temp_file, mut db) = create_test_db();

    let numbers: Vec<u64> = (0..4)
        .map(|i| create_task(&mut db, &format!("Task {i}")).task_number)
        .collect();

    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn test_task_numbers_are_never_reused() {
    let (_temp_file, mut db) = create_test_db();

    create_task(&mut db, "Keep");
    let second = create_task(&mut db, "Delete me");
    db.delete_task(second.id).expect("Failed to delete task");

    let third = create_task(&mut db, "After delete");
    assert_eq!(third.task_number, 3);
}

#[test]
fn test_new_tasks_land_at_bottom_of_todo() {
    let (_temp_file, mut db) = create_test_db();

    let first = create_task(&mut db, "First");
    let second = create_task(&mut db, "Second");

    assert_eq!(first.position, 0);
    assert_eq!(second.position, 1);
}

#[test]
fn test_creation_is_logged_to_activity_feed() {
    let (_temp_file, mut db) = create_test_db();

    let task = create_task(&mut db, "Audited");

    let feed = db
        .list_activities(&ActivityFilter {
            task_id: Some(task.id),
            ..Default::default()
        })
        .expect("Failed to list activities");

    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].activity.kind.as_str(), "created");
    assert_eq!(feed[0].task.task_number, task.task_number);
}

#[test]
fn test_start_sets_started_at_once() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Start me");

    let started = set_status(&mut db, task.id, TaskStatus::InProgress);
    let first_start = started.started_at.expect("started_at should be set");

    // Leave and re-enter IN_PROGRESS
    set_status(&mut db, task.id, TaskStatus::Todo);
    let restarted = set_status(&mut db, task.id, TaskStatus::InProgress);

    assert_eq!(restarted.started_at, Some(first_start));
}

#[test]
fn test_review_sets_reviewed_at_and_forces_inactive() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Review me");

    db.update_task(
        task.id,
        &UpdateTask {
            status: Some(TaskStatus::InProgress),
            is_active: Some(true),
            ..Default::default()
        },
        Timestamp::now(),
    )
    .expect("Failed to start task");

    let reviewed = db
        .update_task(
            task.id,
            &UpdateTask {
                status: Some(TaskStatus::NeedsReview),
                is_active: Some(true),
                ..Default::default()
            },
            Timestamp::now(),
        )
        .expect("Failed to move to review");

    assert!(reviewed.reviewed_at.is_some());
    assert!(!reviewed.is_active, "entering review must deactivate");
}

#[test]
fn test_full_lifecycle_timestamps() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Lifecycle");

    let started = set_status(&mut db, task.id, TaskStatus::InProgress);
    let first_start = started.started_at.expect("started_at should be set");

    let reviewed = set_status(&mut db, task.id, TaskStatus::NeedsReview);
    assert!(reviewed.reviewed_at.is_some());

    let done = set_status(&mut db, task.id, TaskStatus::Done);
    assert!(done.completed_at.is_some());
    assert!(done.reviewed_at.is_none(), "leaving review clears reviewed_at");

    let reopened = set_status(&mut db, task.id, TaskStatus::InProgress);
    assert!(reopened.completed_at.is_none(), "leaving DONE clears completed_at");
    assert_eq!(reopened.started_at, Some(first_start));
}

#[test]
fn test_recompletion_gets_a_fresh_timestamp() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Twice done");

    let done = set_status(&mut db, task.id, TaskStatus::Done);
    let first_completion = done.completed_at.expect("completed_at should be set");

    set_status(&mut db, task.id, TaskStatus::InProgress);
    let redone = set_status(&mut db, task.id, TaskStatus::Done);

    let second_completion = redone.completed_at.expect("completed_at should be set");
    assert!(second_completion > first_completion);
}

#[test]
fn test_update_nonexistent_task() {
    let (_temp_file, mut db) = create_test_db();

    let result = db.update_task(
        42,
        &UpdateTask {
            title: Some("ghost".to_string()),
            ..Default::default()
        },
        Timestamp::now(),
    );

    match result.unwrap_err() {
        BoardError::TaskNotFound { id } => assert_eq!(id, 42),
        other => panic!("Expected TaskNotFound, got {other:?}"),
    }
}

#[test]
fn test_sixth_completion_archives_the_oldest() {
    let (_temp_file, mut db) = create_test_db();

    let tasks: Vec<Task> = (1..=6)
        .map(|i| create_task(&mut db, &format!("Done {i}")))
        .collect();
    for task in &tasks {
        set_status(&mut db, task.id, TaskStatus::Done);
    }

    let archived = db
        .archive_overflow(Timestamp::now())
        .expect("Failed to run archive sweep");

    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, tasks[0].id, "oldest completion archives first");
    assert!(archived[0].archived);
    assert!(archived[0].archived_at.is_some());

    let visible_done = db
        .list_tasks(&TaskFilter {
            status: Some(TaskStatus::Done),
            ..Default::default()
        })
        .expect("Failed to list tasks");
    assert_eq!(visible_done.len(), 5);
}

#[test]
fn test_archive_sweep_is_a_noop_at_five() {
    let (_temp_file, mut db) = create_test_db();

    for i in 1..=5 {
        let task = create_task(&mut db, &format!("Done {i}"));
        set_status(&mut db, task.id, TaskStatus::Done);
    }

    let archived = db
        .archive_overflow(Timestamp::now())
        .expect("Failed to run archive sweep");
    assert!(archived.is_empty());
}

#[test]
fn test_archived_tasks_leave_the_default_listing() {
    let (_temp_file, mut db) = create_test_db();

    for i in 1..=6 {
        let task = create_task(&mut db, &format!("Done {i}"));
        set_status(&mut db, task.id, TaskStatus::Done);
    }
    db.archive_overflow(Timestamp::now())
        .expect("Failed to run archive sweep");

    let default_listing = db
        .list_tasks(&TaskFilter::default())
        .expect("Failed to list tasks");
    assert_eq!(default_listing.len(), 5);
    assert!(default_listing.iter().all(|t| !t.archived));

    let page = db
        .list_archive(&ArchiveQuery::default())
        .expect("Failed to list archive");
    assert_eq!(page.tasks.len(), 1);
    assert_eq!(page.stats.total_archived, 1);
    assert!(page.tasks[0].archived_at.is_some());
}

#[test]
fn test_archive_view_filters() {
    let (_temp_file, mut db) = create_test_db();

    for (title, priority) in [("Fix login flow", Priority::High), ("Polish docs", Priority::Low)] {
        let task = db
            .create_task(&CreateTask {
                title: title.to_string(),
                priority: Some(priority),
                tags: vec!["web".to_string()],
                ..Default::default()
            })
            .expect("Failed to create task");
        set_status(&mut db, task.id, TaskStatus::Done);
    }
    // Complete five more so the sweep pushes the first two into the archive
    for i in 0..5 {
        let filler = create_task(&mut db, &format!("Filler {i}"));
        set_status(&mut db, filler.id, TaskStatus::Done);
    }
    db.archive_overflow(Timestamp::now())
        .expect("Failed to run archive sweep");

    let page = db
        .list_archive(&ArchiveQuery {
            search: Some("login".to_string()),
            ..Default::default()
        })
        .expect("Failed to search archive");
    assert_eq!(page.tasks.len(), 1);
    assert_eq!(page.tasks[0].title, "Fix login flow");

    let page = db
        .list_archive(&ArchiveQuery {
            priority: Some(Priority::Low),
            ..Default::default()
        })
        .expect("Failed to filter archive");
    assert_eq!(page.tasks.len(), 1);
    assert_eq!(page.tasks[0].title, "Polish docs");
}

#[test]
fn test_list_filters() {
    let (_temp_file, mut db) = create_test_db();

    db.create_task(&CreateTask {
        title: "Tagged backend work".to_string(),
        priority: Some(Priority::High),
        tags: vec!["backend".to_string()],
        ..Default::default()
    })
    .expect("Failed to create task");
    db.create_task(&CreateTask {
        title: "Frontend cleanup".to_string(),
        tags: vec!["frontend".to_string()],
        ..Default::default()
    })
    .expect("Failed to create task");

    let by_tag = db
        .list_tasks(&TaskFilter {
            tag: Some("backend".to_string()),
            ..Default::default()
        })
        .expect("Failed to list by tag");
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].title, "Tagged backend work");

    let by_priority = db
        .list_tasks(&TaskFilter {
            priority: Some(Priority::High),
            ..Default::default()
        })
        .expect("Failed to list by priority");
    assert_eq!(by_priority.len(), 1);

    let by_search = db
        .list_tasks(&TaskFilter {
            search: Some("cleanup".to_string()),
            ..Default::default()
        })
        .expect("Failed to search");
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].title, "Frontend cleanup");
}

#[test]
fn test_board_ordering_walks_columns() {
    let (_temp_file, mut db) = create_test_db();

    let a = create_task(&mut db, "A");
    let b = create_task(&mut db, "B");
    let c = create_task(&mut db, "C");
    set_status(&mut db, a.id, TaskStatus::Done);
    set_status(&mut db, b.id, TaskStatus::InProgress);

    let listing = db
        .list_tasks(&TaskFilter::default())
        .expect("Failed to list tasks");
    let titles: Vec<&str> = listing.iter().map(|t| t.title.as_str()).collect();

    assert_eq!(titles, vec!["C", "B", "A"]);
    assert_eq!(listing[0].id, c.id);
}

#[test]
fn test_dependency_replacement_and_blocked_reporting() {
    let (_temp_file, mut db) = create_test_db();

    let blocker = create_task(&mut db, "Provision database");
    let dependent = create_task(&mut db, "Run migrations");

    let updated = db
        .update_task(
            dependent.id,
            &UpdateTask {
                blocked_by: Some(vec![blocker.id]),
                ..Default::default()
            },
            Timestamp::now(),
        )
        .expect("Failed to set dependencies");

    assert_eq!(updated.blocked_by.len(), 1);
    assert_eq!(updated.blocked_by[0].id, blocker.id);
    assert!(updated.is_blocked());

    // Reverse relation is derived on the other task
    let blocker_row = db
        .get_task(blocker.id)
        .expect("Failed to get task")
        .expect("Task should exist");
    assert_eq!(blocker_row.blocking.len(), 1);
    assert_eq!(blocker_row.blocking[0].id, dependent.id);

    // Completing the dependency unblocks
    set_status(&mut db, blocker.id, TaskStatus::Done);
    let dependent_row = db
        .get_task(dependent.id)
        .expect("Failed to get task")
        .expect("Task should exist");
    assert!(!dependent_row.is_blocked());

    // Full replacement with the empty set clears the edges
    let cleared = db
        .update_task(
            dependent.id,
            &UpdateTask {
                blocked_by: Some(Vec::new()),
                ..Default::default()
            },
            Timestamp::now(),
        )
        .expect("Failed to clear dependencies");
    assert!(cleared.blocked_by.is_empty());
}

#[test]
fn test_self_dependency_is_rejected() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Narcissist");

    let result = db.update_task(
        task.id,
        &UpdateTask {
            blocked_by: Some(vec![task.id]),
            ..Default::default()
        },
        Timestamp::now(),
    );

    match result.unwrap_err() {
        BoardError::InvalidInput { field, .. } => assert_eq!(field, "blockedBy"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }

    // The rejected update must not have been partially applied
    let row = db
        .get_task(task.id)
        .expect("Failed to get task")
        .expect("Task should exist");
    assert!(row.blocked_by.is_empty());
}

#[test]
fn test_block_and_unblock_are_audited() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Blockable");

    db.update_task(
        task.id,
        &UpdateTask {
            blocked_reason: Some(Some("waiting on credentials".to_string())),
            ..Default::default()
        },
        Timestamp::now(),
    )
    .expect("Failed to block");

    db.update_task(
        task.id,
        &UpdateTask {
            blocked_reason: Some(None),
            ..Default::default()
        },
        Timestamp::now(),
    )
    .expect("Failed to unblock");

    let feed = db
        .list_activities(&ActivityFilter {
            task_id: Some(task.id),
            ..Default::default()
        })
        .expect("Failed to list activities");
    let kinds: Vec<&str> = feed.iter().map(|a| a.activity.kind.as_str()).collect();

    // Newest first: unblocked, blocked, created
    assert_eq!(kinds, vec!["unblocked", "blocked", "created"]);
}

#[test]
fn test_comments_subtasks_attachments_round_trip() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Parent");

    let comment = db
        .add_comment(
            task.id,
            &NewComment {
                content: "First!".to_string(),
            },
        )
        .expect("Failed to add comment");
    assert_eq!(comment.task_id, task.id);

    let subtask = db
        .add_subtask(
            task.id,
            &NewSubtask {
                title: "Write tests".to_string(),
            },
        )
        .expect("Failed to add subtask");
    assert_eq!(subtask.position, 0);
    assert!(!subtask.completed);

    let attachment = db
        .add_attachment(
            task.id,
            &NewAttachment {
                kind: "link".parse().unwrap(),
                title: Some("Design doc".to_string()),
                content: "https://example.com/doc".to_string(),
                mime_type: None,
            },
        )
        .expect("Failed to add attachment");
    assert_eq!(attachment.task_id, task.id);

    let loaded = db
        .get_task(task.id)
        .expect("Failed to get task")
        .expect("Task should exist");
    assert_eq!(loaded.comments.len(), 1);
    assert_eq!(loaded.subtasks.len(), 1);
    assert_eq!(loaded.attachments.len(), 1);
}

#[test]
fn test_subtask_completion_toggle() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Parent");
    let subtask = db
        .add_subtask(
            task.id,
            &NewSubtask {
                title: "Check it off".to_string(),
            },
        )
        .expect("Failed to add subtask");

    let updated = db
        .update_subtask(
            subtask.id,
            &ocb_core::params::UpdateSubtask {
                completed: Some(true),
                ..Default::default()
            },
        )
        .expect("Failed to update subtask");
    assert!(updated.completed);
    assert_eq!(updated.title, "Check it off");
}

#[test]
fn test_comment_on_missing_task() {
    let (_temp_file, mut db) = create_test_db();

    let result = db.add_comment(
        99,
        &NewComment {
            content: "into the void".to_string(),
        },
    );

    match result.unwrap_err() {
        BoardError::TaskNotFound { id } => assert_eq!(id, 99),
        other => panic!("Expected TaskNotFound, got {other:?}"),
    }
}

#[test]
fn test_delete_cascades_to_children() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Doomed");

    db.add_comment(
        task.id,
        &NewComment {
            content: "gone soon".to_string(),
        },
    )
    .expect("Failed to add comment");
    db.add_subtask(
        task.id,
        &NewSubtask {
            title: "never finished".to_string(),
        },
    )
    .expect("Failed to add subtask");

    db.delete_task(task.id).expect("Failed to delete task");

    assert!(db.get_task(task.id).expect("Failed to get task").is_none());
    let feed = db
        .list_activities(&ActivityFilter {
            task_id: Some(task.id),
            ..Default::default()
        })
        .expect("Failed to list activities");
    assert!(feed.is_empty(), "activities must cascade with the task");
}

#[test]
fn test_delete_nonexistent_task() {
    let (_temp_file, mut db) = create_test_db();

    match db.delete_task(404).unwrap_err() {
        BoardError::TaskNotFound { id } => assert_eq!(id, 404),
        other => panic!("Expected TaskNotFound, got {other:?}"),
    }
}

#[test]
fn test_status_history_tracks_durations() {
    let (_temp_file, mut db) = create_test_db();
    let task = create_task(&mut db, "Tracked");

    set_status(&mut db, task.id, TaskStatus::InProgress);
    set_status(&mut db, task.id, TaskStatus::Done);

    let history = db
        .get_status_history(task.id)
        .expect("Failed to read status history");

    assert_eq!(history.len(), 3);
    assert_eq!(history[0].status, TaskStatus::Todo);
    assert!(history[0].duration_secs.is_some(), "left statuses are closed");
    assert_eq!(history[1].status, TaskStatus::InProgress);
    assert!(history[1].duration_secs.is_some());
    assert_eq!(history[2].status, TaskStatus::Done);
    assert!(history[2].duration_secs.is_none(), "current status stays open");
}

#[test]
fn test_metrics_counts_and_cycle_times() {
    let (_temp_file, mut db) = create_test_db();

    let done = db
        .create_task(&CreateTask {
            title: "Shipped".to_string(),
            story_points: Some(5),
            ..Default::default()
        })
        .expect("Failed to create task");
    set_status(&mut db, done.id, TaskStatus::InProgress);
    set_status(&mut db, done.id, TaskStatus::Done);

    let open = db
        .create_task(&CreateTask {
            title: "Open".to_string(),
            story_points: Some(2),
            ..Default::default()
        })
        .expect("Failed to create task");
    set_status(&mut db, open.id, TaskStatus::InProgress);

    let metrics = db
        .board_metrics(&ocb_core::MetricsQuery::default(), Timestamp::now())
        .expect("Failed to compute metrics");

    assert_eq!(metrics.total_tasks, 2);
    assert_eq!(metrics.completed_tasks, 1);
    assert_eq!(metrics.in_progress_tasks, 1);
    assert_eq!(metrics.todo_tasks, 0);
    assert_eq!(metrics.total_points, 7);
    assert_eq!(metrics.completed_points, 5);
    assert_eq!(metrics.velocity_last7_days, 5);
    assert_eq!(metrics.velocity_last30_days, 5);
    assert!(metrics.avg_cycle_time_hours.is_some());
    assert!(metrics.avg_lead_time_hours.is_some());
    assert!(metrics.task_metrics.is_none(), "basic query has no breakdown");
}

#[test]
fn test_detailed_metrics_include_breakdowns() {
    let (_temp_file, mut db) = create_test_db();

    let task = db
        .create_task(&CreateTask {
            title: "Analyzed".to_string(),
            story_points: Some(3),
            ..Default::default()
        })
        .expect("Failed to create task");
    set_status(&mut db, task.id, TaskStatus::InProgress);
    set_status(&mut db, task.id, TaskStatus::Done);

    let metrics = db
        .board_metrics(
            &ocb_core::MetricsQuery {
                detailed: true,
                days: 30,
            },
            Timestamp::now(),
        )
        .expect("Failed to compute metrics");

    let task_metrics = metrics.task_metrics.expect("detailed breakdown expected");
    assert_eq!(task_metrics.len(), 1);
    assert_eq!(task_metrics[0].task_number, task.task_number);
    assert!(task_metrics[0].total_cycle_time.is_some());

    let velocity = metrics.velocity.expect("velocity buckets expected");
    assert_eq!(velocity.len(), 1);
    assert_eq!(velocity[0].tasks_completed, 1);
    assert_eq!(velocity[0].points_completed, 3);
    assert_eq!(metrics.period_days, Some(30));
}

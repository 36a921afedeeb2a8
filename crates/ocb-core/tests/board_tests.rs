mod common;

use common::create_test_board;
use ocb_core::params::{CreateTask, NewComment, UpdateTask};
use ocb_core::{BoardError, BoardEvent, Task, TaskFilter, TaskStatus};

async fn create_task(board: &ocb_core::Board, title: &str) -> Task {
    board
        .create_task(&CreateTask {
            title: title.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create task")
}

async fn set_status(board: &ocb_core::Board, id: u64, status: TaskStatus) -> Task {
    board
        .update_task(
            id,
            &UpdateTask {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update status")
        .task
}

#[tokio::test]
async fn test_create_and_list() {
    let (_temp_dir, board) = create_test_board().await;

    create_task(&board, "One").await;
    create_task(&board, "Two").await;

    let tasks = board
        .list_tasks(TaskFilter::default())
        .await
        .expect("Failed to list tasks");
    assert_eq!(tasks.len(), 2);
}

#[tokio::test]
async fn test_create_rejects_empty_title() {
    let (_temp_dir, board) = create_test_board().await;

    let result = board
        .create_task(&CreateTask {
            title: "   ".to_string(),
            ..Default::default()
        })
        .await;

    assert!(matches!(
        result.unwrap_err(),
        BoardError::InvalidInput { .. }
    ));
}

#[tokio::test]
async fn test_update_rejects_blocking_writes() {
    let (_temp_dir, board) = create_test_board().await;
    let task = create_task(&board, "Guarded").await;

    let result = board
        .update_task(
            task.id,
            &UpdateTask {
                blocking: Some(vec![1]),
                ..Default::default()
            },
        )
        .await;

    match result.unwrap_err() {
        BoardError::InvalidInput { field, .. } => assert_eq!(field, "blocking"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[tokio::test]
async fn test_mutations_publish_events() {
    let (_temp_dir, board) = create_test_board().await;
    let mut rx = board.events().subscribe();

    let task = create_task(&board, "Watched").await;
    match rx.recv().await.expect("Missing created event") {
        BoardEvent::Created(created) => assert_eq!(created.id, task.id),
        other => panic!("Expected task:created, got {other:?}"),
    }

    set_status(&board, task.id, TaskStatus::InProgress).await;
    match rx.recv().await.expect("Missing updated event") {
        BoardEvent::Updated(updated) => {
            assert_eq!(updated.id, task.id);
            assert_eq!(updated.status, TaskStatus::InProgress);
        }
        other => panic!("Expected task:updated, got {other:?}"),
    }

    board
        .delete_task(task.id)
        .await
        .expect("Failed to delete task");
    match rx.recv().await.expect("Missing deleted event") {
        BoardEvent::Deleted { id } => assert_eq!(id, task.id),
        other => panic!("Expected task:deleted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_comment_publishes_task_update() {
    let (_temp_dir, board) = create_test_board().await;
    let task = create_task(&board, "Commented").await;

    let mut rx = board.events().subscribe();
    board
        .add_comment(
            task.id,
            &NewComment {
                content: "looks good".to_string(),
            },
        )
        .await
        .expect("Failed to add comment");

    match rx.recv().await.expect("Missing updated event") {
        BoardEvent::Updated(updated) => {
            assert_eq!(updated.id, task.id);
            assert_eq!(updated.comments.len(), 1);
        }
        other => panic!("Expected task:updated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sixth_completion_triggers_archive_sweep() {
    let (_temp_dir, board) = create_test_board().await;

    let mut tasks = Vec::new();
    for i in 1..=6 {
        tasks.push(create_task(&board, &format!("Done {i}")).await);
    }

    // Complete the first five; the column stays at the limit
    for task in &tasks[..5] {
        let outcome = board
            .update_task(
                task.id,
                &UpdateTask {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to complete task");
        assert!(outcome.archived.is_empty());
    }

    // The sixth completion pushes the oldest one out
    let outcome = board
        .update_task(
            tasks[5].id,
            &UpdateTask {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to complete task");

    assert_eq!(outcome.archived.len(), 1);
    assert_eq!(outcome.archived[0].id, tasks[0].id);
    assert!(outcome.archived[0].archived);

    let visible = board
        .list_tasks(TaskFilter::default())
        .await
        .expect("Failed to list tasks");
    assert_eq!(visible.len(), 5);
}

#[tokio::test]
async fn test_archive_sweep_publishes_one_event_per_archival() {
    let (_temp_dir, board) = create_test_board().await;

    let mut tasks = Vec::new();
    for i in 1..=6 {
        tasks.push(create_task(&board, &format!("Done {i}")).await);
    }
    for task in &tasks[..5] {
        set_status(&board, task.id, TaskStatus::Done).await;
    }

    let mut rx = board.events().subscribe();
    set_status(&board, tasks[5].id, TaskStatus::Done).await;

    // First the update for the completed task, then one for the archival
    match rx.recv().await.expect("Missing update event") {
        BoardEvent::Updated(updated) => assert_eq!(updated.id, tasks[5].id),
        other => panic!("Expected task:updated, got {other:?}"),
    }
    match rx.recv().await.expect("Missing archival event") {
        BoardEvent::Updated(archived) => {
            assert_eq!(archived.id, tasks[0].id);
            assert!(archived.archived);
        }
        other => panic!("Expected task:updated, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_missing_task() {
    let (_temp_dir, board) = create_test_board().await;

    let result = board.delete_task(12345).await;
    assert!(matches!(
        result.unwrap_err(),
        BoardError::TaskNotFound { id: 12345 }
    ));
}

#[tokio::test]
async fn test_publishing_without_subscribers_does_not_fail() {
    let (_temp_dir, board) = create_test_board().await;

    // No subscriber anywhere; mutations must still succeed
    let task = create_task(&board, "Lonely").await;
    set_status(&board, task.id, TaskStatus::Done).await;
}

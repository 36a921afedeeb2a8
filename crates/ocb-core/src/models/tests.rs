use jiff::Timestamp;

use super::*;

fn sample_task() -> Task {
    let now = Timestamp::now();
    Task {
        id: 3,
        task_number: 7,
        title: "Add retry to the sync loop".to_string(),
        description: Some("See the flaky run from Tuesday".to_string()),
        status: TaskStatus::InProgress,
        priority: Priority::High,
        tags: vec!["backend".to_string(), "sync".to_string()],
        position: 2,
        is_active: true,
        origin: Origin::Ai,
        story_points: Some(3),
        blocked_reason: None,
        archived: false,
        archived_at: None,
        started_at: Some(now),
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

#[test]
fn test_task_serializes_to_camel_case_wire_format() {
    let task = sample_task();

    let value = serde_json::to_value(&task).expect("Failed to serialize task");

    assert_eq!(value["taskNumber"], 7);
    assert_eq!(value["status"], "IN_PROGRESS");
    assert_eq!(value["priority"], "HIGH");
    assert_eq!(value["origin"], "AI");
    assert_eq!(value["isActive"], true);
    assert_eq!(value["storyPoints"], 3);
    assert!(value["completedAt"].is_null());
}

#[test]
fn test_status_round_trips_through_strings() {
    for status in [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::NeedsReview,
        TaskStatus::Done,
    ] {
        assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
    }
    assert!("BLOCKED".parse::<TaskStatus>().is_err());
}

#[test]
fn test_priority_rank_orders_by_urgency() {
    assert!(Priority::Critical.rank() < Priority::High.rank());
    assert!(Priority::High.rank() < Priority::Medium.rank());
    assert!(Priority::Medium.rank() < Priority::Low.rank());
}

#[test]
fn test_blocked_reason_marks_task_blocked() {
    let mut task = sample_task();
    assert!(!task.is_blocked());

    task.blocked_reason = Some("waiting on credentials".to_string());
    assert!(task.is_blocked());

    // Whitespace-only reasons do not count
    task.blocked_reason = Some("   ".to_string());
    assert!(!task.is_blocked());
}

#[test]
fn test_unfinished_dependency_marks_task_blocked() {
    let mut task = sample_task();
    task.blocked_by.push(TaskRef {
        id: 9,
        task_number: 9,
        title: "Provision the database".to_string(),
        status: TaskStatus::InProgress,
    });
    assert!(task.is_blocked());

    // A completed dependency no longer blocks
    task.blocked_by[0].status = TaskStatus::Done;
    assert!(!task.is_blocked());
}

#[test]
fn test_activity_kind_wire_spelling() {
    let kind = ActivityKind::StatusChange;
    let json = serde_json::to_string(&kind).unwrap();
    assert_eq!(json, "\"status_change\"");
}

#[test]
fn test_attachment_kind_serializes_as_type() {
    let attachment = Attachment {
        id: 1,
        task_id: 3,
        kind: AttachmentKind::Link,
        title: None,
        content: "https://example.com/design".to_string(),
        mime_type: None,
        created_at: Timestamp::now(),
    };

    let value = serde_json::to_value(&attachment).unwrap();
    assert_eq!(value["type"], "link");
    assert_eq!(value["mimeType"], serde_json::Value::Null);
}

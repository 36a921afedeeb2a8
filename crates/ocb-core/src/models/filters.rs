//! Filter types for querying tasks and activity entries.

use super::{Actor, Priority, TaskStatus};

/// Filter options for querying tasks.
#[derive(Debug, Clone)]
pub struct TaskFilter {
    /// Filter by archived flag. `None` matches both archived and active
    /// tasks; the default matches active tasks only.
    pub archived: Option<bool>,

    /// Filter by workflow status
    pub status: Option<TaskStatus>,

    /// Filter by priority
    pub priority: Option<Priority>,

    /// Filter by tag membership
    pub tag: Option<String>,

    /// Case-insensitive free-text search over title and description
    pub search: Option<String>,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            archived: Some(false),
            status: None,
            priority: None,
            tag: None,
            search: None,
        }
    }
}

impl TaskFilter {
    /// Filter matching every task regardless of archived state.
    pub fn include_archived() -> Self {
        Self {
            archived: None,
            ..Default::default()
        }
    }

    /// Filter for the archive view: archived tasks only, with the archive
    /// panel's search and facet options applied.
    pub fn archived_only(query: &ArchiveQuery) -> Self {
        Self {
            archived: Some(true),
            status: None,
            priority: query.priority,
            tag: query.tag.clone(),
            search: query.search.clone(),
        }
    }
}

/// Query options for the archive view.
#[derive(Debug, Clone, Default)]
pub struct ArchiveQuery {
    /// Case-insensitive search over title and description
    pub search: Option<String>,

    /// Filter by priority
    pub priority: Option<Priority>,

    /// Filter by tag membership
    pub tag: Option<String>,
}

/// Filter options for the activity feed.
#[derive(Debug, Clone)]
pub struct ActivityFilter {
    /// Maximum number of entries to return; clamped to 100
    pub limit: usize,

    /// Only entries recorded by this actor
    pub actor: Option<Actor>,

    /// Only entries belonging to this task
    pub task_id: Option<u64>,
}

impl Default for ActivityFilter {
    fn default() -> Self {
        Self {
            limit: 50,
            actor: None,
            task_id: None,
        }
    }
}

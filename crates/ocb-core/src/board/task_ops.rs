//! Task operations: CRUD, the transition pipeline and the archive sweep.

use jiff::Timestamp;
use log::info;

use super::Board;
use crate::{
    error::{BoardError, Result},
    events::BoardEvent,
    models::{Task, TaskFilter, TaskStatus},
    params::{CreateTask, UpdateTask},
};

/// Result of a task update: the updated task plus whatever the archive
/// sweep put away as a consequence.
#[derive(Debug, Clone)]
pub struct TaskUpdateOutcome {
    /// The task after the update
    pub task: Task,

    /// Tasks archived by the Done-column sweep this update triggered,
    /// oldest completion first
    pub archived: Vec<Task>,
}

impl Board {
    /// Creates a new task in TODO and announces it to subscribers.
    pub async fn create_task(&self, params: &CreateTask) -> Result<Task> {
        params.validate()?;

        let create = params.clone();
        let task = self.with_db(move |mut db| db.create_task(&create)).await?;

        self.events().publish(BoardEvent::Created(task.clone()));
        Ok(task)
    }

    /// Retrieves a task by its ID with all child collections loaded.
    pub async fn get_task(&self, id: u64) -> Result<Option<Task>> {
        self.with_db(move |db| db.get_task(id)).await
    }

    /// Lists tasks matching the filter in board order.
    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        self.with_db(move |db| db.list_tasks(&filter)).await
    }

    /// Applies a partial update to a task.
    ///
    /// The transition policy derives timestamp side effects and audit
    /// entries; when the resulting status is DONE the archive sweep runs in
    /// the same request, keeping at most five completed tasks visible. One
    /// `task:updated` event is published for the task and one more for each
    /// task the sweep archived.
    pub async fn update_task(&self, id: u64, params: &UpdateTask) -> Result<TaskUpdateOutcome> {
        params.validate()?;

        let update = params.clone();
        let outcome = self
            .with_db(move |mut db| {
                let task = db.update_task(id, &update, Timestamp::now())?;
                let archived = if task.status == TaskStatus::Done {
                    db.archive_overflow(Timestamp::now())?
                } else {
                    Vec::new()
                };
                Ok(TaskUpdateOutcome { task, archived })
            })
            .await?;

        self.events()
            .publish(BoardEvent::Updated(outcome.task.clone()));
        for archived in &outcome.archived {
            info!(
                "auto-archived OCB-{} ({})",
                archived.task_number, archived.title
            );
            self.events().publish(BoardEvent::Updated(archived.clone()));
        }

        Ok(outcome)
    }

    /// Permanently deletes a task and its child records, announcing the
    /// deletion to subscribers.
    pub async fn delete_task(&self, id: u64) -> Result<()> {
        self.with_db(move |mut db| db.delete_task(id)).await?;
        self.events().publish(BoardEvent::Deleted { id });
        Ok(())
    }

    /// Retrieves a task or fails with `TaskNotFound`.
    pub async fn require_task(&self, id: u64) -> Result<Task> {
        self.get_task(id)
            .await?
            .ok_or(BoardError::TaskNotFound { id })
    }
}

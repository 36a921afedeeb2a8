//! Comment, subtask and attachment operations.
//!
//! Every mutation here re-reads the parent task and publishes it as a
//! `task:updated` event, so live boards see child changes without a
//! dedicated event type per record.

use super::Board;
use crate::{
    error::{BoardError, Result},
    events::BoardEvent,
    models::{Attachment, Comment, Subtask},
    params::{NewAttachment, NewComment, NewSubtask, UpdateSubtask},
};

impl Board {
    /// Returns a task's comments, oldest first.
    pub async fn get_comments(&self, task_id: u64) -> Result<Vec<Comment>> {
        self.with_db(move |db| db.get_comments(task_id)).await
    }

    /// Adds a comment to a task.
    pub async fn add_comment(&self, task_id: u64, params: &NewComment) -> Result<Comment> {
        params.validate()?;

        let new_comment = params.clone();
        let (comment, task) = self
            .with_db(move |mut db| {
                let comment = db.add_comment(task_id, &new_comment)?;
                let task = db
                    .get_task(task_id)?
                    .ok_or(BoardError::TaskNotFound { id: task_id })?;
                Ok((comment, task))
            })
            .await?;

        self.events().publish(BoardEvent::Updated(task));
        Ok(comment)
    }

    /// Adds a subtask at the end of a task's checklist.
    pub async fn add_subtask(&self, task_id: u64, params: &NewSubtask) -> Result<Subtask> {
        params.validate()?;

        let new_subtask = params.clone();
        let (subtask, task) = self
            .with_db(move |mut db| {
                let subtask = db.add_subtask(task_id, &new_subtask)?;
                let task = db
                    .get_task(task_id)?
                    .ok_or(BoardError::TaskNotFound { id: task_id })?;
                Ok((subtask, task))
            })
            .await?;

        self.events().publish(BoardEvent::Updated(task));
        Ok(subtask)
    }

    /// Applies a partial update to a subtask.
    pub async fn update_subtask(&self, id: u64, params: &UpdateSubtask) -> Result<Subtask> {
        let update = params.clone();
        let (subtask, task) = self
            .with_db(move |mut db| {
                let subtask = db.update_subtask(id, &update)?;
                let task = db
                    .get_task(subtask.task_id)?
                    .ok_or(BoardError::TaskNotFound {
                        id: subtask.task_id,
                    })?;
                Ok((subtask, task))
            })
            .await?;

        self.events().publish(BoardEvent::Updated(task));
        Ok(subtask)
    }

    /// Deletes a subtask.
    pub async fn delete_subtask(&self, id: u64) -> Result<()> {
        let task = self
            .with_db(move |mut db| {
                let task_id = db.delete_subtask(id)?;
                db.get_task(task_id)?
                    .ok_or(BoardError::TaskNotFound { id: task_id })
            })
            .await?;

        self.events().publish(BoardEvent::Updated(task));
        Ok(())
    }

    /// Returns a task's attachments, newest first.
    pub async fn get_attachments(&self, task_id: u64) -> Result<Vec<Attachment>> {
        self.with_db(move |db| db.get_attachments(task_id)).await
    }

    /// Adds an attachment to a task.
    pub async fn add_attachment(&self, task_id: u64, params: &NewAttachment) -> Result<Attachment> {
        params.validate()?;

        let new_attachment = params.clone();
        let (attachment, task) = self
            .with_db(move |mut db| {
                let attachment = db.add_attachment(task_id, &new_attachment)?;
                let task = db
                    .get_task(task_id)?
                    .ok_or(BoardError::TaskNotFound { id: task_id })?;
                Ok((attachment, task))
            })
            .await?;

        self.events().publish(BoardEvent::Updated(task));
        Ok(attachment)
    }

    /// Deletes an attachment.
    pub async fn delete_attachment(&self, id: u64) -> Result<()> {
        let task = self
            .with_db(move |mut db| {
                let task_id = db.delete_attachment(id)?;
                db.get_task(task_id)?
                    .ok_or(BoardError::TaskNotFound { id: task_id })
            })
            .await?;

        self.events().publish(BoardEvent::Updated(task));
        Ok(())
    }
}

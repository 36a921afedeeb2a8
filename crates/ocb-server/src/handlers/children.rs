//! Comment, subtask and attachment handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use ocb_core::{
    params::{NewAttachment, NewComment, NewSubtask, UpdateSubtask},
    Attachment, Board, Comment, Subtask,
};

use crate::error::{ApiError, ApiResult};

/// `GET /api/tasks/{id}/comments` - comments, oldest first.
pub async fn list_comments(
    State(board): State<Arc<Board>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(board.get_comments(id).await?))
}

/// `POST /api/tasks/{id}/comments` - add a comment.
pub async fn create_comment(
    State(board): State<Arc<Board>>,
    Path(id): Path<u64>,
    Json(params): Json<NewComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = board.add_comment(id, &params).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `POST /api/tasks/{id}/subtasks` - append to the checklist.
pub async fn create_subtask(
    State(board): State<Arc<Board>>,
    Path(id): Path<u64>,
    Json(params): Json<NewSubtask>,
) -> ApiResult<(StatusCode, Json<Subtask>)> {
    let subtask = board.add_subtask(id, &params).await?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

/// `PATCH /api/tasks/{id}/subtasks/{subtaskId}` - retitle or toggle.
pub async fn update_subtask(
    State(board): State<Arc<Board>>,
    Path((_task_id, subtask_id)): Path<(u64, u64)>,
    Json(params): Json<UpdateSubtask>,
) -> ApiResult<Json<Subtask>> {
    Ok(Json(board.update_subtask(subtask_id, &params).await?))
}

/// `DELETE /api/tasks/{id}/subtasks/{subtaskId}` - remove a checklist item.
pub async fn delete_subtask(
    State(board): State<Arc<Board>>,
    Path((_task_id, subtask_id)): Path<(u64, u64)>,
) -> ApiResult<Json<Value>> {
    board.delete_subtask(subtask_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// `GET /api/tasks/{id}/attachments` - attachments, newest first.
pub async fn list_attachments(
    State(board): State<Arc<Board>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Vec<Attachment>>> {
    Ok(Json(board.get_attachments(id).await?))
}

/// `POST /api/tasks/{id}/attachments` - add an attachment.
pub async fn create_attachment(
    State(board): State<Arc<Board>>,
    Path(id): Path<u64>,
    Json(params): Json<NewAttachment>,
) -> ApiResult<(StatusCode, Json<Attachment>)> {
    let attachment = board.add_attachment(id, &params).await?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

/// Query parameters for attachment deletion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAttachmentParams {
    /// ID of the attachment to remove
    pub attachment_id: Option<u64>,
}

/// `DELETE /api/tasks/{id}/attachments?attachmentId=` - remove an attachment.
pub async fn delete_attachment(
    State(board): State<Arc<Board>>,
    Path(_task_id): Path<u64>,
    Query(params): Query<DeleteAttachmentParams>,
) -> ApiResult<Json<Value>> {
    let Some(attachment_id) = params.attachment_id else {
        return Err(ApiError::invalid("attachmentId", "attachmentId required"));
    };
    board.delete_attachment(attachment_id).await?;
    Ok(Json(json!({ "success": true })))
}

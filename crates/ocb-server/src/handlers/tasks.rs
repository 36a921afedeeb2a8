//! Task collection and item handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use ocb_core::{
    params::{CreateTask, UpdateTask},
    Board, Task, TaskFilter,
};

use crate::error::ApiResult;

/// Query parameters for the task listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksParams {
    /// Include archived tasks alongside the active board
    #[serde(default)]
    pub include_archived: bool,
}

/// `GET /api/tasks` - the board, ordered column by column.
pub async fn list_tasks(
    State(board): State<Arc<Board>>,
    Query(params): Query<ListTasksParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = if params.include_archived {
        TaskFilter::include_archived()
    } else {
        TaskFilter::default()
    };
    Ok(Json(board.list_tasks(filter).await?))
}

/// `POST /api/tasks` - create a task in TODO.
pub async fn create_task(
    State(board): State<Arc<Board>>,
    Json(params): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = board.create_task(&params).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/tasks/{id}` - a single task with its child records.
pub async fn get_task(
    State(board): State<Arc<Board>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Task>> {
    Ok(Json(board.require_task(id).await?))
}

/// `PATCH /api/tasks/{id}` - partial update with transition side effects.
///
/// The response carries the updated task; tasks put away by the archive
/// sweep announce themselves over the WebSocket channel.
pub async fn update_task(
    State(board): State<Arc<Board>>,
    Path(id): Path<u64>,
    Json(params): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let outcome = board.update_task(id, &params).await?;
    Ok(Json(outcome.task))
}

/// `DELETE /api/tasks/{id}` - permanent removal, cascading to children.
pub async fn delete_task(
    State(board): State<Arc<Board>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    board.delete_task(id).await?;
    Ok(Json(json!({ "success": true })))
}

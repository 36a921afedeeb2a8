//! Read-only view handlers: archive, metrics, activity feed.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use ocb_core::{
    params::MetricsQuery, ActivityFilter, ActivityWithTask, ArchivePage, ArchiveQuery, Board,
    BoardMetrics,
};

use crate::error::{ApiError, ApiResult};

/// Query parameters for the archive view.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveParams {
    /// Free-text search over title and description
    pub search: Option<String>,

    /// Priority facet; `ALL` disables the filter
    pub priority: Option<String>,

    /// Tag facet; `ALL` disables the filter
    pub tag: Option<String>,
}

/// `GET /api/archive` - archived tasks plus archive totals.
pub async fn archive(
    State(board): State<Arc<Board>>,
    Query(params): Query<ArchiveParams>,
) -> ApiResult<Json<ArchivePage>> {
    let priority = match params.priority.as_deref() {
        None | Some("ALL") => None,
        Some(value) => Some(
            value
                .parse()
                .map_err(|_| ApiError::invalid("priority", &format!("Invalid priority: {value}")))?,
        ),
    };
    let tag = params.tag.filter(|t| t != "ALL");
    let search = params.search.filter(|s| !s.is_empty());

    let page = board
        .archive_view(ArchiveQuery {
            search,
            priority,
            tag,
        })
        .await?;
    Ok(Json(page))
}

/// `GET /api/metrics` - board flow metrics.
pub async fn metrics(
    State(board): State<Arc<Board>>,
    Query(params): Query<MetricsQuery>,
) -> ApiResult<Json<BoardMetrics>> {
    Ok(Json(board.metrics(params).await?))
}

/// Query parameters for the activity feed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityParams {
    /// Maximum number of entries; clamped to 100
    pub limit: Option<usize>,

    /// Only entries by this actor (`human` or `agent`)
    pub actor: Option<String>,

    /// Only entries for this task
    pub task_id: Option<u64>,
}

/// `GET /api/activities` - the audit feed, newest first.
pub async fn activities(
    State(board): State<Arc<Board>>,
    Query(params): Query<ActivityParams>,
) -> ApiResult<Json<Vec<ActivityWithTask>>> {
    let actor = match params.actor.as_deref() {
        None => None,
        Some(value) => Some(
            value
                .parse()
                .map_err(|_| ApiError::invalid("actor", &format!("Invalid actor: {value}")))?,
        ),
    };

    let filter = ActivityFilter {
        limit: params.limit.unwrap_or(50),
        actor,
        task_id: params.task_id,
    };
    Ok(Json(board.list_activities(filter).await?))
}

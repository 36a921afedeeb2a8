//! Route configuration for the board API.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | /api/tasks | List the board |
//! | POST | /api/tasks | Create a task |
//! | GET | /api/tasks/{id} | Get one task |
//! | PATCH | /api/tasks/{id} | Partial update with transition effects |
//! | DELETE | /api/tasks/{id} | Delete a task and its children |
//! | GET/POST | /api/tasks/{id}/comments | Comments |
//! | POST | /api/tasks/{id}/subtasks | Add a subtask |
//! | PATCH/DELETE | /api/tasks/{id}/subtasks/{subtaskId} | Update/remove a subtask |
//! | GET/POST/DELETE | /api/tasks/{id}/attachments | Attachments |
//! | GET | /api/archive | Archived tasks and totals |
//! | GET | /api/metrics | Flow metrics |
//! | GET | /api/activities | Audit feed |
//! | GET | /ws | WebSocket push channel |
//! | GET | /health | Health check |

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use ocb_core::Board;

use crate::{handlers, ws};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// `GET /health` - health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Creates the axum router with all API routes.
pub fn create_router(board: Arc<Board>) -> Router {
    Router::new()
        // Task routes
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::tasks::get_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        // Child record routes
        .route(
            "/api/tasks/{id}/comments",
            get(handlers::children::list_comments).post(handlers::children::create_comment),
        )
        .route(
            "/api/tasks/{id}/subtasks",
            post(handlers::children::create_subtask),
        )
        .route(
            "/api/tasks/{id}/subtasks/{subtask_id}",
            patch(handlers::children::update_subtask).delete(handlers::children::delete_subtask),
        )
        .route(
            "/api/tasks/{id}/attachments",
            get(handlers::children::list_attachments)
                .post(handlers::children::create_attachment)
                .delete(handlers::children::delete_attachment),
        )
        // View routes
        .route("/api/archive", get(handlers::views::archive))
        .route("/api/metrics", get(handlers::views::metrics))
        .route("/api/activities", get(handlers::views::activities))
        // Real-time channel
        .route("/ws", get(ws::ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Add state
        .with_state(board)
}

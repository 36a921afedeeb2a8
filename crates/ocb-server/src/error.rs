//! HTTP error mapping.
//!
//! Converts [`BoardError`] values into the API's error responses: a JSON
//! body of `{"error": message}` with 400 for validation failures, 404 for
//! missing resources, and 500 for everything else. Internal failures are
//! logged and never leak their details to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use ocb_core::BoardError;

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper turning a [`BoardError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(BoardError);

impl From<BoardError> for ApiError {
    fn from(error: BoardError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BoardError::TaskNotFound { .. }
            | BoardError::SubtaskNotFound { .. }
            | BoardError::AttachmentNotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            BoardError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            other => {
                log::error!("request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl ApiError {
    /// Shorthand for a 400 validation failure on one field.
    pub fn invalid(field: &str, reason: &str) -> Self {
        Self(BoardError::invalid_input(field).with_reason(reason))
    }
}

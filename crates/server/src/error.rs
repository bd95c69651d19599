// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::tasks::{StoreError, TaskId};

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task not yet completed: {0}")]
    NotReady(TaskId),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Invalid API key")]
    Unauthorized,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::TaskNotFound(id.to_string()),
            // Illegal transitions never originate from a request path; if one
            // surfaces here it is a gateway bug, not client error.
            StoreError::IllegalTransition { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::TaskNotFound(id) => {
                tracing::warn!(task_id = %id, "Task not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("Task not found", format!("Task ID: {}", id)),
                )
            }
            ApiError::NotReady(id) => {
                tracing::debug!(task_id = %id, "Result requested before terminal state");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details(
                        "Task not yet completed",
                        format!("Task ID: {}", id),
                    ),
                )
            }
            ApiError::Validation(msg) => {
                tracing::warn!(message = %msg, "Invalid submission");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::with_details("Invalid request", msg.clone()),
                )
            }
            ApiError::Unauthorized => {
                tracing::warn!("Rejected request with missing or invalid API key");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Invalid API key"),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

//! HTTP-facing errors.
//!
//! # Design
//! `ApiError` is a thin wrapper so `TodoError` can become a response without
//! the core crate depending on axum. Internal failures are logged in full and
//! returned to the client as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use todo_core::{StoreError, TodoError};

/// Body of every error response: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError(TodoError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(TodoError::invalid(message))
    }

    pub fn into_inner(self) -> TodoError {
        self.0
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            TodoError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound => StatusCode::NOT_FOUND,
            TodoError::InternalFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self.0 {
            TodoError::InternalFailure(err) => {
                tracing::error!(error = %err, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Failures that stop the server from starting or keep it from running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(TodoError::NotFound).status(), StatusCode::NOT_FOUND);
        let internal = ApiError::from(TodoError::from(StoreError::Schema("gone".to_string())));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_failure_hides_store_detail() {
        let err = ApiError::from(TodoError::from(StoreError::Schema(
            "disk I/O error at /var/lib/todo.db".to_string(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
        assert!(!String::from_utf8_lossy(&bytes).contains("todo.db"));
    }

    #[test]
    fn error_body_shape() {
        let json = serde_json::to_value(ErrorBody {
            error: "Todo not found".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"error": "Todo not found"}));
    }
}

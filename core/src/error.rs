//! Error types for the todo service and its record store.
//!
//! # Design
//! `TodoError` is the taxonomy callers map to HTTP statuses: malformed or
//! disallowed input, a missing id, or anything the store could not do.
//! Store failures are kept in their own type so the in-memory and SQLite
//! stores share one error surface.

use thiserror::Error;

/// Failures raised by a `TodoStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("schema setup failed: {0}")]
    Schema(String),
}

/// Errors returned by `TodoService` operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The request was malformed or carried disallowed input.
    #[error("{0}")]
    InvalidArgument(String),

    /// No todo exists with the requested id.
    #[error("Todo not found")]
    NotFound,

    /// The store was unavailable or failed unexpectedly.
    #[error("internal failure: {0}")]
    InternalFailure(#[from] StoreError),
}

impl TodoError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TodoError::InvalidArgument(message.into())
    }
}

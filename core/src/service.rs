//! The todo operations, independent of any HTTP framework.
//!
//! # Design
//! `TodoService` owns nothing but a store handle, so it is cheap to clone
//! into every request. Inputs arrive untyped (query strings, `serde_json::Value`
//! bodies) and are validated here before the store is called.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TodoError;
use crate::store::TodoStore;
use crate::types::Todo;
use crate::validate;

/// Payload returned by the health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Raw list query parameters. Only presence and text are known at this point.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub completed: Option<String>,
    pub window: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TodoService<S> {
    store: S,
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn health(&self) -> Health {
        Health { status: "ok" }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Todo>, TodoError> {
        let filter = validate::list_filter(
            query.completed.as_deref(),
            query.window.as_deref(),
            Utc::now().naive_utc(),
        )?;
        let todos = self.store.find_all(&filter).await?;
        tracing::debug!(?filter, count = todos.len(), "listed todos");
        Ok(todos)
    }

    pub async fn get(&self, id: i64) -> Result<Todo, TodoError> {
        self.store.find_by_id(id).await?.ok_or(TodoError::NotFound)
    }

    pub async fn create(&self, body: &Value) -> Result<Todo, TodoError> {
        let new_todo = validate::new_todo(body)?;
        let todo = self.store.insert(new_todo).await?;
        tracing::info!(id = todo.id, "created todo");
        Ok(todo)
    }

    /// Apply a partial update. A missing id is reported as `NotFound` even
    /// when the body is also invalid.
    pub async fn update(&self, id: i64, body: &Value) -> Result<Todo, TodoError> {
        let patch = match validate::todo_patch(body) {
            Ok(patch) => patch,
            Err(err) => return Err(self.reject_update(id, err).await),
        };
        let todo = self
            .store
            .update(id, &patch)
            .await?
            .ok_or(TodoError::NotFound)?;
        tracing::info!(id, "updated todo");
        Ok(todo)
    }

    /// Pick the error for an update whose body could not be used: `NotFound`
    /// if the id is missing, otherwise `err`.
    pub async fn reject_update(&self, id: i64, err: TodoError) -> TodoError {
        match self.store.find_by_id(id).await {
            Ok(Some(_)) => err,
            Ok(None) => TodoError::NotFound,
            Err(store_err) => store_err.into(),
        }
    }

    /// Hard-delete a todo. Deleting a missing id is not an error and yields `None`.
    pub async fn delete(&self, id: i64) -> Result<Option<Todo>, TodoError> {
        let deleted = self.store.delete(id).await?;
        match &deleted {
            Some(_) => tracing::info!(id, "deleted todo"),
            None => tracing::debug!(id, "delete of missing todo ignored"),
        }
        Ok(deleted)
    }
}

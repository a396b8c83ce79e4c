//! Domain types for the todo collection.
//!
//! # Design
//! `Todo` is the persisted record and doubles as the wire representation:
//! its serde output is exactly the JSON object the API returns. `NewTodo` and
//! `TodoPatch` are validated inputs produced by [`crate::validate`]; they never
//! carry store-assigned fields.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single todo item as stored and returned by the API.
///
/// Timestamps carry no timezone and serialize as ISO-8601
/// (`2023-02-27T00:00:00`). Absent optionals serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub deadline_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated input for creating a todo. The store assigns `id` and both
/// timestamps on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub deadline_at: Option<NaiveDateTime>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
            deadline_at: None,
        }
    }
}

/// Validated partial update. The outer `Option` records whether the field was
/// present in the request; for nullable fields the inner `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub deadline_at: Option<Option<NaiveDateTime>>,
}

impl TodoPatch {
    /// Apply the patch to `todo` in place. `updated_at` is left to the caller.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(deadline_at) = self.deadline_at {
            todo.deadline_at = deadline_at;
        }
    }
}

/// Conjunctive predicate for listing todos. `None` fields do not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    /// Keep only todos with a deadline at or before this instant. Todos
    /// without a deadline never match.
    pub deadline_before: Option<NaiveDateTime>,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(completed) = self.completed {
            if todo.completed != completed {
                return false;
            }
        }
        if let Some(cutoff) = self.deadline_before {
            return todo.deadline_at.is_some_and(|deadline| deadline <= cutoff);
        }
        true
    }
}

//! Domain core for the todo service.
//!
//! # Overview
//! Validates requests, builds list filters, and runs CRUD operations against
//! a pluggable record store. Nothing here knows about HTTP; the server crate
//! maps `TodoError` to status codes and payloads.
//!
//! # Design
//! - `TodoService` is the single entry point for the operations and holds
//!   only a store handle.
//! - `TodoStore` is the persistence seam, with a SQLite implementation for
//!   deployment and an in-memory one for tests and demos.
//! - Validation lives in pure functions so it runs before any write.

pub mod error;
pub mod service;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{StoreError, TodoError};
pub use service::{Health, ListQuery, TodoService};
pub use store::{MemoryStore, SqliteStore, TodoStore};
pub use types::{NewTodo, Todo, TodoFilter, TodoPatch};

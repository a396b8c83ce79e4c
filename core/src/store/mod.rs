//! Record store abstraction.
//!
//! # Design
//! Each method is one self-contained unit of work that commits on its own.
//! `update` and `delete` take an id rather than a previously fetched `Todo`
//! so implementations can do the read-modify-write atomically; callers never
//! hold a record across two store calls.

use std::future::Future;

use crate::error::StoreError;
use crate::types::{NewTodo, Todo, TodoFilter, TodoPatch};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence for todo records.
pub trait TodoStore: Clone + Send + Sync + 'static {
    /// Every todo matching `filter`, in ascending id order.
    fn find_all(
        &self,
        filter: &TodoFilter,
    ) -> impl Future<Output = Result<Vec<Todo>, StoreError>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Todo>, StoreError>> + Send;

    /// Persist `todo`, assigning `id`, `created_at` and `updated_at`.
    fn insert(&self, todo: NewTodo) -> impl Future<Output = Result<Todo, StoreError>> + Send;

    /// Apply `patch` and refresh `updated_at`. Returns `None` if `id` does not exist.
    fn update(
        &self,
        id: i64,
        patch: &TodoPatch,
    ) -> impl Future<Output = Result<Option<Todo>, StoreError>> + Send;

    /// Remove the todo and return it as it was. Returns `None` if `id` does not exist.
    fn delete(&self, id: i64) -> impl Future<Output = Result<Option<Todo>, StoreError>> + Send;

    /// Release the underlying connection handle.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

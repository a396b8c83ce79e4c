use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::error::StoreError;
use crate::types::{NewTodo, Todo, TodoFilter, TodoPatch};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Todo>,
}

/// Process-local store backed by a map behind an async `RwLock`.
///
/// Ids come from a counter that only moves forward, so a deleted id is never
/// handed out again. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoStore for MemoryStore {
    async fn find_all(&self, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now().naive_utc();
        let todo = Todo {
            id: table.last_id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            deadline_at: todo.deadline_at,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: i64, patch: &TodoPatch) -> Result<Option<Todo>, StoreError> {
        let mut table = self.table.write().await;
        let Some(todo) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(todo);
        todo.updated_at = Utc::now().naive_utc().max(todo.created_at);
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(self.table.write().await.rows.remove(&id))
    }

    async fn close(&self) {}
}

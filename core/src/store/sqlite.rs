use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};

use super::TodoStore;
use crate::error::StoreError;
use crate::types::{NewTodo, Todo, TodoFilter, TodoPatch};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL,
    description TEXT,
    completed   BOOLEAN NOT NULL DEFAULT 0,
    deadline_at TEXT,
    created_at  TEXT    NOT NULL,
    updated_at  TEXT    NOT NULL
)";

/// SQLite-backed store over a `sqlx` connection pool.
///
/// Timestamps are stored as text in one fixed format, so the window filter
/// can compare them directly in SQL. `AUTOINCREMENT` keeps ids from being
/// reused after a delete.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and apply the schema.
    ///
    /// In-memory URLs get a single connection that is never recycled, since
    /// the database lives only as long as that connection.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Schema(e.to_string()))?;
        tracing::debug!("todos schema ready");
        Ok(Self { pool })
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl TodoStore for SqliteStore {
    async fn find_all(&self, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, title, description, completed, deadline_at, created_at, updated_at \
             FROM todos WHERE 1 = 1",
        );
        if let Some(completed) = filter.completed {
            query.push(" AND completed = ").push_bind(completed);
        }
        if let Some(cutoff) = filter.deadline_before {
            query
                .push(" AND deadline_at IS NOT NULL AND deadline_at <= ")
                .push_bind(cutoff);
        }
        query.push(" ORDER BY id");

        let todos = query.build_query_as::<Todo>().fetch_all(&self.pool).await?;
        Ok(todos)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, completed, deadline_at, created_at, updated_at \
             FROM todos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let now = Utc::now().naive_utc();
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (title, description, completed, deadline_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING id, title, description, completed, deadline_at, created_at, updated_at",
        )
        .bind(todo.title)
        .bind(todo.description)
        .bind(todo.completed)
        .bind(todo.deadline_at)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(todo)
    }

    // One statement, so concurrent patches to the same row serialize on
    // SQLite's write lock instead of overwriting each other.
    async fn update(&self, id: i64, patch: &TodoPatch) -> Result<Option<Todo>, StoreError> {
        let now = Utc::now().naive_utc();
        let todo = sqlx::query_as::<_, Todo>(
            "UPDATE todos SET \
                 title = COALESCE(?, title), \
                 description = CASE WHEN ? THEN ? ELSE description END, \
                 completed = COALESCE(?, completed), \
                 deadline_at = CASE WHEN ? THEN ? ELSE deadline_at END, \
                 updated_at = MAX(?, created_at) \
             WHERE id = ? \
             RETURNING id, title, description, completed, deadline_at, created_at, updated_at",
        )
        .bind(patch.title.clone())
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .bind(patch.completed)
        .bind(patch.deadline_at.is_some())
        .bind(patch.deadline_at.flatten())
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(
            "DELETE FROM todos WHERE id = ? \
             RETURNING id, title, description, completed, deadline_at, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("sqlite pool closed");
    }
}

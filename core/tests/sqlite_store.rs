//! `SqliteStore` against an in-memory database.
//!
//! Exercises the SQL paths the in-memory store does not cover: the filter
//! query, the single-statement patch, and `DELETE ... RETURNING`.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Utc};
use todo_core::{NewTodo, SqliteStore, TodoFilter, TodoPatch, TodoStore};

async fn store() -> SqliteStore {
    SqliteStore::connect("sqlite::memory:").await.unwrap()
}

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 2, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn with_deadline(title: &str, deadline: Option<NaiveDateTime>) -> NewTodo {
    NewTodo {
        deadline_at: deadline,
        ..NewTodo::new(title)
    }
}

#[tokio::test]
async fn insert_assigns_id_and_timestamps() {
    let store = store().await;
    let todo = store
        .insert(NewTodo {
            title: "Watch lecture".to_string(),
            description: Some("week 1".to_string()),
            completed: true,
            deadline_at: Some(day(27)),
        })
        .await
        .unwrap();

    assert!(todo.id > 0);
    assert_eq!(todo.title, "Watch lecture");
    assert_eq!(todo.description.as_deref(), Some("week 1"));
    assert!(todo.completed);
    assert_eq!(todo.deadline_at, Some(day(27)));
    assert_eq!(todo.created_at, todo.updated_at);

    let fetched = store.find_by_id(todo.id).await.unwrap();
    assert_eq!(fetched, Some(todo));
}

#[tokio::test]
async fn ids_are_unique_and_not_reused() {
    let store = store().await;
    let a = store.insert(NewTodo::new("a")).await.unwrap();
    let b = store.insert(NewTodo::new("b")).await.unwrap();
    assert_ne!(a.id, b.id);

    store.delete(b.id).await.unwrap();
    let c = store.insert(NewTodo::new("c")).await.unwrap();
    assert!(c.id > b.id);
}

#[tokio::test]
async fn find_all_filters_on_deadline_and_completed() {
    let store = store().await;
    store.insert(with_deadline("early", Some(day(21)))).await.unwrap();
    store.insert(with_deadline("edge", Some(day(25)))).await.unwrap();
    store.insert(with_deadline("late", Some(day(27)))).await.unwrap();
    store.insert(with_deadline("none", None)).await.unwrap();
    let done = store.insert(with_deadline("done", Some(day(22)))).await.unwrap();
    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    store.update(done.id, &patch).await.unwrap();

    let titles = |todos: Vec<todo_core::Todo>| -> Vec<String> {
        todos.into_iter().map(|todo| todo.title).collect()
    };

    let all = store.find_all(&TodoFilter::default()).await.unwrap();
    assert_eq!(titles(all), ["early", "edge", "late", "none", "done"]);

    let window = TodoFilter {
        completed: None,
        deadline_before: Some(day(25)),
    };
    let within = store.find_all(&window).await.unwrap();
    assert_eq!(titles(within), ["early", "edge", "done"]);

    let completed = TodoFilter {
        completed: Some(true),
        ..window
    };
    assert_eq!(titles(store.find_all(&completed).await.unwrap()), ["done"]);

    let open = TodoFilter {
        completed: Some(false),
        deadline_before: None,
    };
    assert_eq!(
        titles(store.find_all(&open).await.unwrap()),
        ["early", "edge", "late", "none"]
    );
}

#[tokio::test]
async fn window_comparison_respects_sub_second_precision() {
    let store = store().await;
    let cutoff = day(25);
    store
        .insert(with_deadline("after", Some(cutoff + TimeDelta::milliseconds(250))))
        .await
        .unwrap();
    store.insert(with_deadline("at", Some(cutoff))).await.unwrap();

    let filter = TodoFilter {
        completed: None,
        deadline_before: Some(cutoff),
    };
    let found = store.find_all(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "at");
}

#[tokio::test]
async fn update_only_changes_present_fields() {
    let store = store().await;
    let created = store
        .insert(NewTodo {
            title: "Walk dog".to_string(),
            description: Some("around the block".to_string()),
            completed: false,
            deadline_at: Some(day(27)),
        })
        .await
        .unwrap();

    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let updated = store.update(created.id, &patch).await.unwrap().unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.deadline_at, created.deadline_at);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_can_clear_nullable_fields() {
    let store = store().await;
    let created = store
        .insert(NewTodo {
            description: Some("text".to_string()),
            deadline_at: Some(day(27)),
            ..NewTodo::new("x")
        })
        .await
        .unwrap();

    let patch = TodoPatch {
        title: Some("renamed".to_string()),
        description: Some(None),
        deadline_at: Some(None),
        completed: None,
    };
    let updated = store.update(created.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.title, "renamed");
    assert!(updated.description.is_none());
    assert!(updated.deadline_at.is_none());
}

#[tokio::test]
async fn update_and_delete_report_missing_ids() {
    let store = store().await;
    assert!(store.update(99, &TodoPatch::default()).await.unwrap().is_none());
    assert!(store.delete(99).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_returns_removed_row() {
    let store = store().await;
    let created = store.insert(NewTodo::new("gone")).await.unwrap();
    let deleted = store.delete(created.id).await.unwrap();
    assert_eq!(deleted, Some(created.clone()));
    assert!(store.find_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn timestamps_are_recent_utc() {
    let store = store().await;
    let before = Utc::now().naive_utc();
    let todo = store.insert(NewTodo::new("now")).await.unwrap();
    assert!(todo.created_at >= before - TimeDelta::seconds(1));
    assert!(todo.created_at <= Utc::now().naive_utc());
}

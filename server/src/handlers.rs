use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use todo_core::{Health, Todo, TodoService, TodoStore};

use crate::error::{ApiError, ErrorBody};
use crate::extract::{JsonBody, ListParams, TodoId};

pub async fn health<S: TodoStore>(State(service): State<TodoService<S>>) -> Json<Health> {
    Json(service.health())
}

pub async fn list_todos<S: TodoStore>(
    State(service): State<TodoService<S>>,
    ListParams(query): ListParams,
) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(service.list(&query).await?))
}

pub async fn get_todo<S: TodoStore>(
    State(service): State<TodoService<S>>,
    TodoId(id): TodoId,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(service.get(id).await?))
}

pub async fn create_todo<S: TodoStore>(
    State(service): State<TodoService<S>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = service.create(&body).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

// The body is extracted fallibly so a missing id still answers 404 when the
// body is not JSON either.
pub async fn update_todo<S: TodoStore>(
    State(service): State<TodoService<S>>,
    TodoId(id): TodoId,
    body: Result<JsonBody, ApiError>,
) -> Result<Json<Todo>, ApiError> {
    let body = match body {
        Ok(JsonBody(body)) => body,
        Err(rejection) => return Err(service.reject_update(id, rejection.into_inner()).await.into()),
    };
    Ok(Json(service.update(id, &body).await?))
}

/// Responds with the deleted todo, or `{}` when there was nothing to delete.
pub async fn delete_todo<S: TodoStore>(
    State(service): State<TodoService<S>>,
    TodoId(id): TodoId,
) -> Result<Response, ApiError> {
    let response = match service.delete(id).await? {
        Some(todo) => Json(todo).into_response(),
        None => Json(json!({})).into_response(),
    };
    Ok(response)
}

pub async fn fallback() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
        }),
    )
}

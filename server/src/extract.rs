//! Request extractors that reject with `ApiError` instead of axum's
//! plain-text rejections, so every failure carries the JSON error payload.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts, HeaderMap},
};
use serde_json::Value;
use todo_core::{ListQuery, TodoError};

use crate::error::ApiError;

/// Integer todo id from the `{id}` path segment. A segment that is not an
/// integer names no todo, so it is reported as not found.
#[derive(Debug, Clone, Copy)]
pub struct TodoId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for TodoId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::from(TodoError::NotFound))?;
        raw.parse()
            .map(TodoId)
            .map_err(|_| ApiError::from(TodoError::NotFound))
    }
}

/// List filters from the query string. A query that cannot be decoded, such
/// as one repeating a key, is a bad request.
#[derive(Debug, Clone)]
pub struct ListParams(pub ListQuery);

impl<S: Send + Sync> FromRequestParts<S> for ListParams {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ListQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(ListParams(query))
    }
}

/// A JSON request body, kept untyped so field-level validation can report
/// unknown keys and missing fields itself.
///
/// Requires a JSON content type (`application/json` or `application/*+json`).
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Err(ApiError::bad_request("Request must be JSON"));
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request("Request must be JSON"))?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|_| ApiError::bad_request("Request must be JSON"))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

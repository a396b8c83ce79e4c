//! Request validation: turns untyped JSON bodies and query strings into
//! `NewTodo`, `TodoPatch` and `TodoFilter` values.
//!
//! Every check here is pure and runs before the store is touched, so a
//! rejected request never leaves a partial write behind.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde_json::{Map, Value};

use crate::error::TodoError;
use crate::types::{NewTodo, TodoFilter, TodoPatch};

/// Keys a create or update body may carry.
pub const PERMITTED_FIELDS: [&str; 4] = ["title", "description", "completed", "deadline_at"];

/// Query values for `completed` that select incomplete todos. Any other
/// value, including an empty one, selects completed todos.
const FALSE_TOKENS: [&str; 4] = ["false", "0", "no", "off"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Return the keys of `body` that are not in [`PERMITTED_FIELDS`], in body order.
pub fn check_fields(body: &Map<String, Value>) -> Result<(), Vec<String>> {
    let invalid: Vec<String> = body
        .keys()
        .filter(|key| !PERMITTED_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(invalid)
    }
}

/// Validate a create body. `title` is required; everything else defaults.
pub fn new_todo(body: &Value) -> Result<NewTodo, TodoError> {
    let fields = permitted_object(body)?;
    let title = match fields.get("title") {
        Some(value) => title(value)?,
        None => return Err(TodoError::invalid("Title is required")),
    };
    Ok(NewTodo {
        title,
        description: fields.get("description").map(description).transpose()?.flatten(),
        completed: fields.get("completed").map(completed).transpose()?.unwrap_or(false),
        deadline_at: fields.get("deadline_at").map(deadline).transpose()?.flatten(),
    })
}

/// Validate an update body. Any subset of the permitted fields is allowed,
/// including none.
pub fn todo_patch(body: &Value) -> Result<TodoPatch, TodoError> {
    let fields = permitted_object(body)?;
    Ok(TodoPatch {
        title: fields.get("title").map(title).transpose()?,
        description: fields.get("description").map(description).transpose()?,
        completed: fields.get("completed").map(completed).transpose()?,
        deadline_at: fields.get("deadline_at").map(deadline).transpose()?,
    })
}

/// Build the list predicate from the raw `completed` and `window` query
/// values. `now` is the reference instant for the window cutoff.
pub fn list_filter(
    completed: Option<&str>,
    window: Option<&str>,
    now: NaiveDateTime,
) -> Result<TodoFilter, TodoError> {
    let completed = completed.map(|raw| {
        let raw = raw.trim().to_ascii_lowercase();
        !FALSE_TOKENS.contains(&raw.as_str())
    });

    let deadline_before = match window {
        Some(raw) => {
            let days: i64 = raw.trim().parse().map_err(|_| {
                TodoError::invalid(format!("Invalid window '{raw}': expected a whole number of days"))
            })?;
            let cutoff = TimeDelta::try_days(days)
                .and_then(|delta| now.checked_add_signed(delta))
                .ok_or_else(|| TodoError::invalid(format!("Invalid window '{raw}': out of range")))?;
            Some(cutoff)
        }
        None => None,
    };

    Ok(TodoFilter {
        completed,
        deadline_before,
    })
}

/// Parse an ISO-8601 timestamp. Offsets are normalized to UTC and dropped;
/// a bare date means midnight.
pub fn parse_deadline(raw: &str) -> Result<NaiveDateTime, TodoError> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| TodoError::invalid(format!("Invalid deadline_at '{raw}': expected an ISO-8601 timestamp")))
}

fn permitted_object(body: &Value) -> Result<&Map<String, Value>, TodoError> {
    let fields = body
        .as_object()
        .ok_or_else(|| TodoError::invalid("Request body must be a JSON object"))?;
    check_fields(fields).map_err(|invalid| {
        TodoError::invalid(format!("Invalid fields in request: {}", invalid.join(", ")))
    })?;
    Ok(fields)
}

fn title(value: &Value) -> Result<String, TodoError> {
    match value.as_str() {
        Some(title) if !title.trim().is_empty() => Ok(title.to_string()),
        _ => Err(TodoError::invalid("title must be a non-empty string")),
    }
}

fn description(value: &Value) -> Result<Option<String>, TodoError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(TodoError::invalid("description must be a string or null")),
    }
}

fn completed(value: &Value) -> Result<bool, TodoError> {
    value
        .as_bool()
        .ok_or_else(|| TodoError::invalid("completed must be a boolean"))
}

fn deadline(value: &Value) -> Result<Option<NaiveDateTime>, TodoError> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => parse_deadline(raw).map(Some),
        _ => Err(TodoError::invalid("deadline_at must be an ISO-8601 string or null")),
    }
}

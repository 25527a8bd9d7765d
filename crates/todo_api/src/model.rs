//! Wire model for todo items.

use serde::{Deserialize, Serialize};

use crate::error::TodoApiError;

/// A single todo item.
///
/// The backend writes `Completed`/`Body` with capital letters; both spellings decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Backend-assigned id (24-character hex object id).
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Whether the item is done.
    #[serde(default, alias = "Completed")]
    pub completed: bool,
    /// Item text.
    #[serde(default, alias = "Body")]
    pub body: String,
}

/// Request payload for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTodo {
    /// Item text.
    pub body: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Trims `body` and rejects it when nothing is left.
///
/// # Errors
///
/// Returns [`TodoApiError::EmptyBody`] for blank input.
pub fn normalize_body(body: &str) -> Result<String, TodoApiError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(TodoApiError::EmptyBody);
    }
    Ok(body.to_string())
}

/// Decodes a list response. The backend sends `null` for an empty collection.
///
/// # Errors
///
/// Returns [`TodoApiError::Decode`] for malformed JSON.
pub fn decode_todo_list(raw: &str) -> Result<Vec<Todo>, TodoApiError> {
    let todos: Option<Vec<Todo>> =
        serde_json::from_str(raw).map_err(|e| TodoApiError::Decode(e.to_string()))?;
    Ok(todos.unwrap_or_default())
}

/// Decodes a single-item response.
///
/// # Errors
///
/// Returns [`TodoApiError::Decode`] for malformed JSON.
pub fn decode_todo(raw: &str) -> Result<Todo, TodoApiError> {
    serde_json::from_str(raw).map_err(|e| TodoApiError::Decode(e.to_string()))
}

/// Extracts the `error` field of a backend error body.
pub fn decode_error_message(raw: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(raw)
        .ok()
        .map(|body| body.error)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_backend_capitalized_fields() {
        let raw = r#"[{"_id":"65f0c0ffee","Completed":true,"Body":"water plants"},
                      {"_id":"65f0c0ffef","completed":false,"body":"call mum"}]"#;
        assert_eq!(
            decode_todo_list(raw).expect("decode"),
            vec![
                Todo {
                    id: "65f0c0ffee".to_string(),
                    completed: true,
                    body: "water plants".to_string(),
                },
                Todo {
                    id: "65f0c0ffef".to_string(),
                    completed: false,
                    body: "call mum".to_string(),
                },
            ]
        );
    }

    #[test]
    fn null_list_is_empty() {
        assert_eq!(decode_todo_list("null").expect("decode"), Vec::new());
        assert!(matches!(
            decode_todo_list("{"),
            Err(TodoApiError::Decode(_))
        ));
    }

    #[test]
    fn new_todo_serializes_lowercase_body() {
        let raw = serde_json::to_string(&NewTodo {
            body: "buy milk".to_string(),
        })
        .expect("serialize");
        assert_eq!(raw, r#"{"body":"buy milk"}"#);
    }

    #[test]
    fn error_bodies_expose_message() {
        assert_eq!(
            decode_error_message(r#"{"error":"Todo body is required"}"#).as_deref(),
            Some("Todo body is required")
        );
        assert_eq!(decode_error_message("<html>"), None);
    }

    #[test]
    fn blank_bodies_are_rejected() {
        assert_eq!(normalize_body("  tidy desk \n"), Ok("tidy desk".to_string()));
        assert_eq!(normalize_body("   "), Err(TodoApiError::EmptyBody));
    }
}

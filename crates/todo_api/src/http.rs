//! `fetch`-backed [`TodoService`] talking to the REST backend.

use crate::{
    error::TodoApiError,
    model::{decode_error_message, decode_todo, decode_todo_list, normalize_body, NewTodo, Todo},
    service::{TodoFuture, TodoService},
    transport::{self, RawResponse},
};

/// Same-origin API prefix served next to the static client bundle.
pub const DEFAULT_API_BASE_URL: &str = "/api";

/// Location of the todo backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoApiConfig {
    /// URL prefix up to and excluding `/todos`.
    pub base_url: String,
}

impl Default for TodoApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl TodoApiConfig {
    /// Collection URL.
    pub fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url.trim_end_matches('/'))
    }

    /// Item URL for `id`.
    pub fn todo_url(&self, id: &str) -> String {
        format!("{}/{}", self.todos_url(), id)
    }
}

/// Maps a raw response to its body, turning non-2xx statuses into errors.
fn expect_success(response: RawResponse) -> Result<String, TodoApiError> {
    if (200..300).contains(&response.status) {
        return Ok(response.body);
    }
    let message = decode_error_message(&response.body)
        .unwrap_or_else(|| format!("unexpected status {}", response.status));
    if response.status == 404 {
        return Err(TodoApiError::NotFound(message));
    }
    Err(TodoApiError::Http {
        status: response.status,
        message,
    })
}

/// Browser adapter issuing `fetch` requests against [`TodoApiConfig`].
#[derive(Debug, Clone, Default)]
pub struct HttpTodoService {
    config: TodoApiConfig,
}

impl HttpTodoService {
    /// Creates an adapter for `config`.
    pub fn new(config: TodoApiConfig) -> Self {
        Self { config }
    }

    /// Returns the backend location.
    pub fn config(&self) -> &TodoApiConfig {
        &self.config
    }
}

impl TodoService for HttpTodoService {
    fn list_todos(&self) -> TodoFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            let response = transport::send("GET", &self.config.todos_url(), None).await?;
            decode_todo_list(&expect_success(response)?)
        })
    }

    fn create_todo<'a>(&'a self, body: &'a str) -> TodoFuture<'a, Todo> {
        Box::pin(async move {
            let payload = NewTodo {
                body: normalize_body(body)?,
            };
            let raw = serde_json::to_string(&payload)
                .map_err(|e| TodoApiError::Decode(e.to_string()))?;
            let response = transport::send("POST", &self.config.todos_url(), Some(&raw)).await?;
            decode_todo(&expect_success(response)?)
        })
    }

    fn complete_todo<'a>(&'a self, id: &'a str) -> TodoFuture<'a, Todo> {
        Box::pin(async move {
            let response = transport::send("PATCH", &self.config.todo_url(id), None).await?;
            decode_todo(&expect_success(response)?)
        })
    }

    fn delete_todo<'a>(&'a self, id: &'a str) -> TodoFuture<'a, ()> {
        Box::pin(async move {
            let response = transport::send("DELETE", &self.config.todo_url(id), None).await?;
            expect_success(response).map(|_| ())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let config = TodoApiConfig {
            base_url: "http://localhost:5000/api/".to_string(),
        };
        assert_eq!(config.todos_url(), "http://localhost:5000/api/todos");
        assert_eq!(config.todo_url("abc"), "http://localhost:5000/api/todos/abc");
        assert_eq!(TodoApiConfig::default().todos_url(), "/api/todos");
    }

    #[test]
    fn error_statuses_carry_backend_message() {
        let response = RawResponse {
            status: 400,
            body: r#"{"error":"Invalid id"}"#.to_string(),
        };
        assert_eq!(
            expect_success(response),
            Err(TodoApiError::Http {
                status: 400,
                message: "Invalid id".to_string(),
            })
        );

        let response = RawResponse {
            status: 404,
            body: r#"{"error":"Todo not found"}"#.to_string(),
        };
        assert_eq!(
            expect_success(response),
            Err(TodoApiError::NotFound("Todo not found".to_string()))
        );

        let response = RawResponse {
            status: 502,
            body: "<html>".to_string(),
        };
        assert_eq!(
            expect_success(response),
            Err(TodoApiError::Http {
                status: 502,
                message: "unexpected status 502".to_string(),
            })
        );
    }

    #[test]
    fn created_status_is_success() {
        let response = RawResponse {
            status: 201,
            body: "{}".to_string(),
        };
        assert_eq!(expect_success(response), Ok("{}".to_string()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn http_service_validates_before_transport_and_reports_native_fallback() {
        let service = HttpTodoService::default();
        assert_eq!(
            block_on(service.create_todo("   ")),
            Err(TodoApiError::EmptyBody)
        );
        assert!(matches!(
            block_on(service.list_todos()),
            Err(TodoApiError::Transport(_))
        ));
    }
}

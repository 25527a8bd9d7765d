//! Typed client contracts for the todo REST backend.
//!
//! The backend exposes `GET/POST /api/todos` and `PATCH/DELETE /api/todos/:id`. This crate
//! owns the wire model, the object-safe [`TodoService`] trait, an in-memory adapter for tests,
//! and the browser `fetch` adapter.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod error;
pub mod http;
mod model;
mod service;
mod transport;

pub use error::TodoApiError;
pub use http::{HttpTodoService, TodoApiConfig, DEFAULT_API_BASE_URL};
pub use model::{
    decode_error_message, decode_todo, decode_todo_list, normalize_body, NewTodo, Todo,
};
pub use service::{MemoryTodoService, TodoFuture, TodoService};

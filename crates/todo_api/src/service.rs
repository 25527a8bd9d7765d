//! Todo service contract and in-memory adapter.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use crate::{
    error::TodoApiError,
    model::{normalize_body, Todo},
};

/// Object-safe boxed future used by [`TodoService`] methods.
pub type TodoFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TodoApiError>> + 'a>>;

/// Backend operations on the todo collection.
pub trait TodoService {
    /// Returns every todo in backend order.
    fn list_todos(&self) -> TodoFuture<'_, Vec<Todo>>;

    /// Creates an open todo with `body` and returns it with its assigned id.
    fn create_todo<'a>(&'a self, body: &'a str) -> TodoFuture<'a, Todo>;

    /// Marks the todo `id` as completed and returns the updated item.
    fn complete_todo<'a>(&'a self, id: &'a str) -> TodoFuture<'a, Todo>;

    /// Deletes the todo `id`.
    fn delete_todo<'a>(&'a self, id: &'a str) -> TodoFuture<'a, ()>;
}

#[derive(Debug, Default)]
struct MemoryTodoState {
    todos: Vec<Todo>,
    next_id: u64,
    requests: usize,
}

/// In-memory todo collection for tests and offline previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryTodoService {
    inner: Rc<RefCell<MemoryTodoState>>,
}

impl MemoryTodoService {
    /// Creates a service pre-populated with `todos`.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let service = Self::default();
        service.inner.borrow_mut().todos = todos;
        service
    }

    /// Number of operations served so far.
    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests
    }

    fn record_request(&self) {
        self.inner.borrow_mut().requests += 1;
    }
}

impl TodoService for MemoryTodoService {
    fn list_todos(&self) -> TodoFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            self.record_request();
            Ok(self.inner.borrow().todos.clone())
        })
    }

    fn create_todo<'a>(&'a self, body: &'a str) -> TodoFuture<'a, Todo> {
        Box::pin(async move {
            self.record_request();
            let body = normalize_body(body)?;
            let mut state = self.inner.borrow_mut();
            state.next_id += 1;
            let todo = Todo {
                id: format!("{:024x}", state.next_id),
                completed: false,
                body,
            };
            state.todos.push(todo.clone());
            Ok(todo)
        })
    }

    fn complete_todo<'a>(&'a self, id: &'a str) -> TodoFuture<'a, Todo> {
        Box::pin(async move {
            self.record_request();
            let mut state = self.inner.borrow_mut();
            let todo = state
                .todos
                .iter_mut()
                .find(|todo| todo.id == id)
                .ok_or_else(|| TodoApiError::NotFound(id.to_string()))?;
            todo.completed = true;
            Ok(todo.clone())
        })
    }

    fn delete_todo<'a>(&'a self, id: &'a str) -> TodoFuture<'a, ()> {
        Box::pin(async move {
            self.record_request();
            let mut state = self.inner.borrow_mut();
            let before = state.todos.len();
            state.todos.retain(|todo| todo.id != id);
            if state.todos.len() == before {
                return Err(TodoApiError::NotFound(id.to_string()));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_service_create_complete_delete() {
        let service = MemoryTodoService::default();
        let service_obj: &dyn TodoService = &service;

        let created = block_on(service_obj.create_todo("  walk the dog ")).expect("create");
        assert_eq!(created.body, "walk the dog");
        assert_eq!(created.id.len(), 24);
        assert!(!created.completed);

        let done = block_on(service_obj.complete_todo(&created.id)).expect("complete");
        assert!(done.completed);
        assert_eq!(block_on(service_obj.list_todos()).expect("list"), vec![done]);

        block_on(service_obj.delete_todo(&created.id)).expect("delete");
        assert_eq!(block_on(service_obj.list_todos()).expect("list"), Vec::new());
        assert_eq!(service.request_count(), 5);
    }

    #[test]
    fn memory_service_rejects_blank_and_unknown() {
        let service = MemoryTodoService::with_todos(vec![Todo {
            id: "a".to_string(),
            completed: false,
            body: "keep".to_string(),
        }]);

        assert_eq!(block_on(service.create_todo(" ")), Err(TodoApiError::EmptyBody));
        assert_eq!(
            block_on(service.complete_todo("missing")),
            Err(TodoApiError::NotFound("missing".to_string()))
        );
        assert_eq!(
            block_on(service.delete_todo("missing")),
            Err(TodoApiError::NotFound("missing".to_string()))
        );
        assert_eq!(block_on(service.list_todos()).expect("list").len(), 1);
    }
}

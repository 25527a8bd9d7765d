//! Daily Tasks application root.
//!
//! [`App`] takes no props. It reads the query cache and theme from the providers installed by
//! the page entry point and the [`TodoService`] from context, falling back to the HTTP adapter.

mod components;

use std::rc::Rc;

use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use query_client::QueryKey;
use todo_api::{HttpTodoService, Todo, TodoService};

pub use components::{Navbar, TodoForm, TodoItem, TodoList};

/// Query key under which the todo collection is cached.
pub fn todos_query_key() -> QueryKey {
    QueryKey::from("todos")
}

/// Context entry holding the todo backend adapter.
#[derive(Clone)]
pub struct TodoServiceContext(pub Rc<dyn TodoService>);

/// Installs `service` for every descendant of the current reactive owner.
pub fn provide_todo_service(service: Rc<dyn TodoService>) {
    provide_context(TodoServiceContext(service));
}

/// Returns the todo adapter installed by [`provide_todo_service`].
///
/// # Panics
///
/// Panics if called outside [`App`] and no service was provided.
pub fn use_todo_service() -> Rc<dyn TodoService> {
    use_context::<TodoServiceContext>()
        .expect("TodoServiceContext not provided")
        .0
}

/// Display status of a todo item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    /// Still open.
    InProgress,
    /// Completed.
    Done,
}

impl TodoStatus {
    /// Status for an item's `completed` flag.
    pub fn of(todo: &Todo) -> Self {
        if todo.completed {
            Self::Done
        } else {
            Self::InProgress
        }
    }

    /// Badge text.
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// CSS modifier suffix.
    pub fn modifier(self) -> &'static str {
        match self {
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

/// What the todo list should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// No data yet and no failure reported.
    Loading,
    /// Loaded with nothing to show.
    Empty,
    /// The first load failed; only the error message is shown.
    Failed,
    /// Loaded items.
    Items(Vec<Todo>),
}

/// Chooses the list rendering from query state. Cached data stays visible during refetches
/// and after later failures.
pub fn list_view(failed: bool, data: Option<Vec<Todo>>) -> ListView {
    match data {
        Some(todos) if !todos.is_empty() => ListView::Items(todos),
        Some(_) => ListView::Empty,
        None if failed => ListView::Failed,
        None => ListView::Loading,
    }
}

/// Top-level application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    if use_context::<TodoServiceContext>().is_none() {
        provide_todo_service(Rc::new(HttpTodoService::default()));
    }

    view! {
        <Title text="Daily Tasks" />
        <div class="todo-app">
            <Navbar />
            <main class="todo-app__content">
                <TodoForm />
                <TodoList />
            </main>
        </div>
    }
}

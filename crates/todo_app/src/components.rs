use app_theme::{use_color_mode, use_theme, ColorMode};
use leptos::*;
use query_client::{create_mutation, create_query};
use todo_api::Todo;

use crate::{list_view, todos_query_key, use_todo_service, ListView, TodoStatus};

/// Title bar with the color-mode toggle.
#[component]
pub fn Navbar() -> impl IntoView {
    let color_mode = use_color_mode();
    let accent = use_theme().resolve_color("blue.400");

    view! {
        <header class="todo-navbar">
            <span class="todo-navbar__brand" style=format!("color: {accent}")>"Daily Tasks"</span>
            <button
                type="button"
                class="todo-navbar__mode"
                aria-label="Toggle color mode"
                on:click=move |_| color_mode.update(|mode| *mode = mode.toggle())
            >
                {move || match color_mode.get() {
                    ColorMode::Dark => "☀",
                    ColorMode::Light => "☾",
                }}
            </button>
        </header>
    }
}

/// Single-line form that creates a todo.
#[component]
pub fn TodoForm() -> impl IntoView {
    let service = use_todo_service();
    let draft = create_rw_signal(String::new());
    let create = create_mutation(
        move |body: String| {
            let service = service.clone();
            async move {
                service
                    .create_todo(&body)
                    .await
                    .map_err(|err| err.to_string())
            }
        },
        todos_query_key(),
    );

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let body = draft.get_untracked();
        if body.trim().is_empty() {
            return;
        }
        create.mutate(body);
        draft.set(String::new());
    };

    view! {
        <form class="todo-form" on:submit=on_submit>
            <input
                type="text"
                class="todo-form__input"
                placeholder="Add a task"
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
            />
            <button type="submit" class="todo-form__submit" disabled=move || create.pending()>
                {move || if create.pending() { "…" } else { "+" }}
            </button>
        </form>
        {move || create.error().map(|err| view! { <p class="todo-form__error">{err}</p> })}
    }
}

/// Cached todo collection with loading and empty states.
#[component]
pub fn TodoList() -> impl IntoView {
    let service = use_todo_service();
    let todos = create_query(todos_query_key(), move || {
        let service = service.clone();
        async move { service.list_todos().await.map_err(|err| err.to_string()) }
    });

    view! {
        <section class="todo-list">
            <h2 class="todo-list__title">"Today's Tasks"</h2>
            {move || todos.error().map(|err| view! { <p class="todo-list__error">{err}</p> })}
            {move || match list_view(todos.error().is_some(), todos.data()) {
                ListView::Loading => view! {
                    <div class="todo-list__spinner" aria-busy="true">"Loading…"</div>
                }
                .into_view(),
                ListView::Failed => ().into_view(),
                ListView::Empty => view! {
                    <p class="todo-list__empty">"All tasks completed!"</p>
                }
                .into_view(),
                ListView::Items(items) => view! {
                    <ul class="todo-list__items">
                        <For
                            each=move || items.clone()
                            key=|todo: &Todo| (todo.id.clone(), todo.completed)
                            children=|todo: Todo| view! { <TodoItem todo=todo /> }
                        />
                    </ul>
                }
                .into_view(),
            }}
        </section>
    }
}

/// One todo row with its status badge and actions.
#[component]
pub fn TodoItem(todo: Todo) -> impl IntoView {
    let service = use_todo_service();
    let complete = {
        let service = service.clone();
        create_mutation(
            move |id: String| {
                let service = service.clone();
                async move {
                    service
                        .complete_todo(&id)
                        .await
                        .map_err(|err| err.to_string())
                }
            },
            todos_query_key(),
        )
    };
    let remove = create_mutation(
        move |id: String| {
            let service = service.clone();
            async move { service.delete_todo(&id).await.map_err(|err| err.to_string()) }
        },
        todos_query_key(),
    );

    let status = TodoStatus::of(&todo);
    let completed = todo.completed;
    let complete_id = todo.id.clone();
    let remove_id = todo.id.clone();
    let row_class = if completed {
        "todo-item todo-item--done"
    } else {
        "todo-item"
    };

    view! {
        <li class=row_class>
            <span class="todo-item__body">{todo.body}</span>
            <span class=format!("todo-item__badge todo-item__badge--{}", status.modifier())>
                {status.label()}
            </span>
            <button
                type="button"
                class="todo-item__complete"
                title="Mark as done"
                disabled=move || completed || complete.pending()
                on:click=move |_| {
                    if !completed {
                        complete.mutate(complete_id.clone());
                    }
                }
            >
                "✓"
            </button>
            <button
                type="button"
                class="todo-item__delete"
                title="Delete"
                disabled=move || remove.pending()
                on:click=move |_| remove.mutate(remove_id.clone())
            >
                "✕"
            </button>
        </li>
    }
}

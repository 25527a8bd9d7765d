use app_theme::ThemeProvider;
use leptos::*;
use query_client::QueryClientProvider;
use todo_app::App;

use crate::boot::AppContext;

/// Query cache provider around theme provider around `children`.
#[component]
pub fn ProviderStack(context: AppContext, children: Children) -> impl IntoView {
    let AppContext {
        query_client,
        theme,
    } = context;

    view! {
        <QueryClientProvider client=query_client>
            <ThemeProvider theme=theme>
                {children()}
            </ThemeProvider>
        </QueryClientProvider>
    }
}

/// Provider stack around the application root.
#[component]
pub fn SiteRoot(context: AppContext) -> impl IntoView {
    view! {
        <ProviderStack context=context>
            <App />
        </ProviderStack>
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use app_theme::{use_theme, Theme, DEFAULT_THEME};
    use query_client::{use_query_client, QueryClient};

    use super::*;

    type Seen = Rc<RefCell<Vec<(QueryClient, &'static Theme)>>>;

    #[component]
    fn ContextRecorder(seen: Seen) -> impl IntoView {
        seen.borrow_mut().push((use_query_client(), use_theme()));
        "recorded"
    }

    #[test]
    fn innermost_child_sees_the_client_and_theme_it_was_given() {
        let runtime = create_runtime();
        let client = QueryClient::new();
        let context = AppContext {
            query_client: client.clone(),
            theme: app_theme::theme(),
        };
        let seen: Seen = Rc::default();
        let sink = seen.clone();

        let _view = view! {
            <ProviderStack context=context>
                <ContextRecorder seen=sink />
            </ProviderStack>
        }
        .into_view();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let (seen_client, seen_theme) = &seen[0];
        assert!(seen_client.ptr_eq(&client));
        assert!(std::ptr::eq(*seen_theme, &DEFAULT_THEME));
        runtime.dispose();
    }
}

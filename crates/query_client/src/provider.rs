//! Leptos context wiring for the shared [`QueryClient`].

use leptos::*;

use crate::client::QueryClient;

/// Makes `client` available to every descendant through [`use_query_client`].
#[component]
pub fn QueryClientProvider(
    /// Cache handle constructed once by the page entry point.
    client: QueryClient,
    children: Children,
) -> impl IntoView {
    provide_context(client);

    children().into_view()
}

/// Returns the [`QueryClient`] provided by the nearest [`QueryClientProvider`].
///
/// # Panics
///
/// Panics if called outside [`QueryClientProvider`].
pub fn use_query_client() -> QueryClient {
    use_context::<QueryClient>().expect("QueryClient not provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_read_the_provided_client() {
        let runtime = create_runtime();
        let client = QueryClient::new();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(None));
        let sink = seen.clone();
        let record = move || {
            *sink.borrow_mut() = Some(use_query_client());
            "child"
        };

        let _view = view! { <QueryClientProvider client=client.clone()>{record()}</QueryClientProvider> };

        let seen = seen.borrow_mut().take().expect("children rendered");
        assert!(seen.ptr_eq(&client));
        runtime.dispose();
    }
}

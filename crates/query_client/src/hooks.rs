//! Reactive query and mutation handles for components under a [`crate::QueryClientProvider`].

use std::{future::Future, rc::Rc};

use leptos::*;

use crate::{
    client::{FetchStatus, QueryClient, QueryEvent},
    key::QueryKey,
    provider::use_query_client,
};

/// Reactive view of one cached query, kept in sync with the [`QueryClient`].
pub struct QueryHandle<T: 'static> {
    data: RwSignal<Option<T>>,
    error: RwSignal<Option<String>>,
    fetching: RwSignal<bool>,
    refetch: Callback<()>,
}

impl<T: 'static> Clone for QueryHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for QueryHandle<T> {}

impl<T: Clone + 'static> QueryHandle<T> {
    /// Latest cached data. Tracked.
    pub fn data(&self) -> Option<T> {
        self.data.get()
    }

    /// Error text of the last failed fetch. Tracked.
    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    /// Whether a fetch is in flight. Tracked.
    pub fn is_fetching(&self) -> bool {
        self.fetching.get()
    }

    /// Starts a fetch regardless of freshness rules for stale data.
    pub fn refetch(&self) {
        self.refetch.call(());
    }
}

/// Observes `key`, fetching it on creation and again whenever it is invalidated.
///
/// The subscription is released when the owning reactive scope is disposed.
pub fn create_query<T, F, Fut>(key: QueryKey, fetcher: F) -> QueryHandle<T>
where
    T: Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let client = use_query_client();
    let data = create_rw_signal(client.get_query_data::<T>(&key));
    let error = create_rw_signal(None::<String>);
    let fetching = create_rw_signal(false);
    let fetcher = Rc::new(fetcher);

    let refetch = {
        let client = client.downgrade();
        let key = key.clone();
        Callback::new(move |()| {
            let Some(client) = client.upgrade() else {
                return;
            };
            let key = key.clone();
            let fetcher = fetcher.clone();
            spawn_local(async move {
                if let Err(err) = client.fetch_query(&key, || fetcher()).await {
                    logging::warn!("{err}");
                }
            });
        })
    };

    let subscription = {
        let weak = client.downgrade();
        client.subscribe(&key, move |event| {
            let Some(client) = weak.upgrade() else {
                return;
            };
            match event {
                QueryEvent::Updated(key) => sync_handle(&client, key, data, error, fetching),
                QueryEvent::Invalidated(_) => refetch.call(()),
                QueryEvent::Removed(_) => {
                    let _ = data.try_set(None);
                    let _ = error.try_set(None);
                    let _ = fetching.try_set(false);
                }
            }
        })
    };

    {
        let client = client.downgrade();
        on_cleanup(move || {
            if let Some(client) = client.upgrade() {
                client.unsubscribe(subscription);
            }
        });
    }

    refetch.call(());

    QueryHandle {
        data,
        error,
        fetching,
        refetch,
    }
}

fn sync_handle<T: Clone + 'static>(
    client: &QueryClient,
    key: &QueryKey,
    data: RwSignal<Option<T>>,
    error: RwSignal<Option<String>>,
    fetching: RwSignal<bool>,
) {
    let Some(state) = client.query_state(key) else {
        return;
    };
    let _ = fetching.try_set(state.fetch_status == FetchStatus::Fetching);
    if state.fetch_status == FetchStatus::Idle {
        let _ = error.try_set(state.error);
    }
    if let Some(value) = client.get_query_data::<T>(key) {
        let _ = data.try_set(Some(value));
    }
}

/// Reactive state of a write operation that refreshes cached queries on success.
pub struct MutationHandle<I: 'static> {
    pending: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    mutate: Callback<I>,
}

impl<I: 'static> Clone for MutationHandle<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: 'static> Copy for MutationHandle<I> {}

impl<I: 'static> MutationHandle<I> {
    /// Whether a mutation is running. Tracked.
    pub fn pending(&self) -> bool {
        self.pending.get()
    }

    /// Error text of the last failed mutation. Tracked.
    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    /// Runs the mutation with `input`.
    pub fn mutate(&self, input: I) {
        self.mutate.call(input);
    }
}

/// Wraps `action` so that each successful run invalidates every query under `invalidates`.
pub fn create_mutation<I, T, F, Fut>(action: F, invalidates: QueryKey) -> MutationHandle<I>
where
    I: 'static,
    T: 'static,
    F: Fn(I) -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let client = use_query_client().downgrade();
    let pending = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);

    let mutate = Callback::new(move |input: I| {
        let pending_run = action(input);
        let client = client.clone();
        let invalidates = invalidates.clone();
        pending.set(true);
        error.set(None);
        spawn_local(async move {
            match pending_run.await {
                Ok(_) => {
                    if let Some(client) = client.upgrade() {
                        client.invalidate_queries(&invalidates);
                    }
                }
                Err(err) => {
                    logging::warn!("mutation for {invalidates} failed: {err}");
                    let _ = error.try_set(Some(err));
                }
            }
            let _ = pending.try_set(false);
        });
    });

    MutationHandle {
        pending,
        error,
        mutate,
    }
}

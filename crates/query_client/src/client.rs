//! Query cache storage, fetch orchestration, and subscriber notification.

use std::{
    any::Any,
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashMap},
    fmt,
    future::Future,
    rc::{Rc, Weak},
};

use futures::channel::oneshot;

use crate::{config::QueryClientConfig, delay::sleep_ms, key::QueryKey, time::unix_time_ms_now};

thread_local! {
    static NEXT_CLIENT_ID: Cell<u64> = const { Cell::new(1) };
}

/// Lifecycle of the data held by a query entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No data has been stored yet.
    Pending,
    /// The last fetch (or a direct write) produced data.
    Success,
    /// The last fetch failed after exhausting retries.
    Error,
}

/// Whether a fetch is currently running for a query entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// No fetch in flight.
    Idle,
    /// A fetch (or one of its retries) is in flight.
    Fetching,
}

/// Change notification delivered to subscribers of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
    /// Data, status, or fetch status changed.
    Updated(QueryKey),
    /// The entry was marked stale; active observers should refetch.
    Invalidated(QueryKey),
    /// The entry was dropped from the cache.
    Removed(QueryKey),
}

impl QueryEvent {
    /// Returns the key the event refers to.
    pub fn key(&self) -> &QueryKey {
        match self {
            Self::Updated(key) | Self::Invalidated(key) | Self::Removed(key) => key,
        }
    }
}

/// Read-only view of a query entry's bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStateSnapshot {
    /// Data lifecycle status.
    pub status: QueryStatus,
    /// Whether a fetch is running.
    pub fetch_status: FetchStatus,
    /// Message of the last failed fetch, cleared on success.
    pub error: Option<String>,
    /// When data was last stored.
    pub data_updated_at_ms: Option<u64>,
    /// Failures seen by the current or last fetch.
    pub failure_count: u32,
    /// Whether the entry was explicitly invalidated since its last successful fetch.
    pub invalidated: bool,
    /// Number of live subscriptions on the key.
    pub observers: usize,
}

/// Fetch failure reported once retries are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Every attempt returned an error; `message` is the last one.
    #[error("query {key} failed after {attempts} attempt(s): {message}")]
    Failed {
        /// Key of the failed query.
        key: QueryKey,
        /// Error text returned by the final attempt.
        message: String,
        /// Total attempts made, including the first.
        attempts: u32,
    },
}

/// Handle returned by [`QueryClient::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&QueryEvent)>;

struct Subscription {
    key: QueryKey,
    listener: Listener,
}

// The fetch currently allowed to write into an entry. Later callers wait on it unless the entry
// was invalidated after it started, in which case a new fetch takes over its waiters.
struct InFlight {
    token: u64,
    invalidated: bool,
    waiters: Vec<oneshot::Sender<()>>,
}

struct QueryEntry {
    data: Option<Rc<dyn Any>>,
    status: QueryStatus,
    in_flight: Option<InFlight>,
    error: Option<String>,
    data_updated_at_ms: Option<u64>,
    failure_count: u32,
    invalidated: bool,
    observers: usize,
    inactive_since_ms: Option<u64>,
}

impl QueryEntry {
    fn new(now_ms: u64) -> Self {
        Self {
            data: None,
            status: QueryStatus::Pending,
            in_flight: None,
            error: None,
            data_updated_at_ms: None,
            failure_count: 0,
            invalidated: false,
            observers: 0,
            inactive_since_ms: Some(now_ms),
        }
    }

    fn fetch_status(&self) -> FetchStatus {
        if self.in_flight.is_some() {
            FetchStatus::Fetching
        } else {
            FetchStatus::Idle
        }
    }

    fn owns_fetch(&self, token: u64) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.token == token)
    }

    fn snapshot(&self) -> QueryStateSnapshot {
        QueryStateSnapshot {
            status: self.status,
            fetch_status: self.fetch_status(),
            error: self.error.clone(),
            data_updated_at_ms: self.data_updated_at_ms,
            failure_count: self.failure_count,
            invalidated: self.invalidated,
            observers: self.observers,
        }
    }

    fn store<T: 'static>(&mut self, data: T, now_ms: u64) {
        self.data = Some(Rc::new(data));
        self.status = QueryStatus::Success;
        self.error = None;
        self.data_updated_at_ms = Some(now_ms);
        self.failure_count = 0;
        self.invalidated = false;
    }
}

struct ClientInner {
    id: u64,
    config: QueryClientConfig,
    queries: RefCell<HashMap<QueryKey, QueryEntry>>,
    subscriptions: RefCell<BTreeMap<SubscriptionId, Subscription>>,
    next_subscription: Cell<u64>,
    next_fetch: Cell<u64>,
    in_flight: Cell<usize>,
}

/// Shared, single-threaded query cache.
///
/// Cloning is cheap and yields another handle to the same cache. Construction only allocates:
/// no fetch is started and no timer is scheduled until a caller asks for data.
#[derive(Clone)]
pub struct QueryClient {
    inner: Rc<ClientInner>,
}

/// Non-owning handle to a [`QueryClient`], used by subscribers to avoid reference cycles.
#[derive(Clone)]
pub struct WeakQueryClient {
    inner: Weak<ClientInner>,
}

impl WeakQueryClient {
    /// Returns the client if it is still alive.
    pub fn upgrade(&self) -> Option<QueryClient> {
        self.inner.upgrade().map(|inner| QueryClient { inner })
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("id", &self.inner.id)
            .field("config", &self.inner.config)
            .field("queries", &self.inner.queries.borrow().len())
            .field("subscriptions", &self.inner.subscriptions.borrow().len())
            .finish()
    }
}

impl QueryClient {
    /// Creates an empty cache with [`QueryClientConfig::default`].
    pub fn new() -> Self {
        Self::with_config(QueryClientConfig::default())
    }

    /// Creates an empty cache with explicit tuning.
    pub fn with_config(config: QueryClientConfig) -> Self {
        let id = NEXT_CLIENT_ID.with(|next| {
            let id = next.get();
            next.set(id.wrapping_add(1));
            id
        });
        Self {
            inner: Rc::new(ClientInner {
                id,
                config,
                queries: RefCell::new(HashMap::new()),
                subscriptions: RefCell::new(BTreeMap::new()),
                next_subscription: Cell::new(1),
                next_fetch: Cell::new(1),
                in_flight: Cell::new(0),
            }),
        }
    }

    /// Returns the per-thread unique id assigned at construction.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Returns whether both handles point at the same cache.
    pub fn ptr_eq(&self, other: &QueryClient) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a non-owning handle.
    pub fn downgrade(&self) -> WeakQueryClient {
        WeakQueryClient {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Returns the client's tuning.
    pub fn config(&self) -> QueryClientConfig {
        self.inner.config
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.queries.borrow().len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.inner.queries.borrow().is_empty()
    }

    /// Number of fetches currently in flight.
    pub fn is_fetching(&self) -> usize {
        self.inner.in_flight.get()
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    /// Returns the cached data for `key` if present and of type `T`.
    pub fn get_query_data<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.inner
            .queries
            .borrow()
            .get(key)
            .and_then(|entry| entry.data.as_ref())
            .and_then(|data| data.downcast_ref::<T>())
            .cloned()
    }

    /// Stores `data` under `key` as a successful, fresh result and notifies subscribers.
    pub fn set_query_data<T: 'static>(&self, key: &QueryKey, data: T) {
        let now = unix_time_ms_now();
        self.inner
            .queries
            .borrow_mut()
            .entry(key.clone())
            .or_insert_with(|| QueryEntry::new(now))
            .store(data, now);
        self.notify(QueryEvent::Updated(key.clone()));
    }

    /// Returns a snapshot of the bookkeeping for `key`.
    pub fn query_state(&self, key: &QueryKey) -> Option<QueryStateSnapshot> {
        self.inner.queries.borrow().get(key).map(QueryEntry::snapshot)
    }

    /// Returns cached data when it is still fresh, otherwise runs `fetcher` and caches the result.
    ///
    /// A call made while another fetch of `key` is running waits for that fetch and shares its
    /// outcome instead of calling `fetcher`. If the key was invalidated after the running fetch
    /// started, a new fetch replaces it and the older response is not stored.
    ///
    /// Failed attempts are retried up to [`QueryClientConfig::retry`] times with exponential
    /// back-off. Subscribers of `key` are notified when the fetch starts, after each failure,
    /// and when it settles.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Failed`] when every attempt fails.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: &QueryKey,
        fetcher: F,
    ) -> Result<T, QueryError>
    where
        T: Clone + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, String>>,
    {
        let now = unix_time_ms_now();
        self.collect_garbage_at(now);
        if let Some(data) = self.fresh_data_at::<T>(key, now) {
            return Ok(data);
        }

        if let Some(settled) = self.join_fetch(key) {
            // A dropped sender means the entry was removed mid-flight; fetch anew below.
            let _ = settled.await;
            if let Some(result) = self.settled_result::<T>(key) {
                return result;
            }
        }

        let token = self.begin_fetch(key, unix_time_ms_now());
        let config = self.config();
        let mut failures = 0u32;
        loop {
            match fetcher().await {
                Ok(data) => {
                    self.finish_success(key, token, data.clone());
                    return Ok(data);
                }
                Err(message) => {
                    failures += 1;
                    if failures > config.retry {
                        self.finish_error(key, token, &message, failures);
                        return Err(QueryError::Failed {
                            key: key.clone(),
                            message,
                            attempts: failures,
                        });
                    }
                    self.record_failure(key, token, failures);
                    sleep_ms(config.retry_delay_ms(failures - 1)).await;
                }
            }
        }
    }

    /// Marks every entry under `prefix` stale and asks its observers to refetch.
    ///
    /// Returns the number of entries invalidated.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let keys: Vec<QueryKey> = {
            let mut queries = self.inner.queries.borrow_mut();
            queries
                .iter_mut()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, entry)| {
                    entry.invalidated = true;
                    if let Some(in_flight) = entry.in_flight.as_mut() {
                        in_flight.invalidated = true;
                    }
                    key.clone()
                })
                .collect()
        };
        for key in &keys {
            self.notify(QueryEvent::Invalidated(key.clone()));
        }
        keys.len()
    }

    /// Drops every entry under `prefix`. Returns the number removed.
    pub fn remove_queries(&self, prefix: &QueryKey) -> usize {
        let keys: Vec<QueryKey> = {
            let mut queries = self.inner.queries.borrow_mut();
            let keys: Vec<QueryKey> = queries
                .keys()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect();
            for key in &keys {
                queries.remove(key);
            }
            keys
        };
        for key in &keys {
            self.notify(QueryEvent::Removed(key.clone()));
        }
        keys.len()
    }

    /// Drops every entry.
    pub fn clear(&self) -> usize {
        self.remove_queries(&QueryKey::default())
    }

    /// Registers `listener` for events on `key` and counts it as an observer.
    pub fn subscribe(
        &self,
        key: &QueryKey,
        listener: impl Fn(&QueryEvent) + 'static,
    ) -> SubscriptionId {
        let raw = self.inner.next_subscription.get();
        self.inner.next_subscription.set(raw + 1);
        let id = SubscriptionId(raw);

        let now = unix_time_ms_now();
        {
            let mut queries = self.inner.queries.borrow_mut();
            let entry = queries
                .entry(key.clone())
                .or_insert_with(|| QueryEntry::new(now));
            entry.observers += 1;
            entry.inactive_since_ms = None;
        }
        self.inner.subscriptions.borrow_mut().insert(
            id,
            Subscription {
                key: key.clone(),
                listener: Rc::new(listener),
            },
        );
        id
    }

    /// Removes a subscription. Entries left without observers start their garbage-collection
    /// countdown. Returns `false` for unknown ids.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.unsubscribe_at(id, unix_time_ms_now())
    }

    pub(crate) fn unsubscribe_at(&self, id: SubscriptionId, now_ms: u64) -> bool {
        let Some(subscription) = self.inner.subscriptions.borrow_mut().remove(&id) else {
            return false;
        };
        if let Some(entry) = self.inner.queries.borrow_mut().get_mut(&subscription.key) {
            entry.observers = entry.observers.saturating_sub(1);
            if entry.observers == 0 {
                entry.inactive_since_ms = Some(now_ms);
            }
        }
        true
    }

    /// Drops inactive entries whose garbage-collection window has elapsed.
    ///
    /// Runs lazily at the start of every [`QueryClient::fetch_query`]; callers may also invoke it
    /// directly. Returns the number of entries dropped.
    pub fn collect_garbage(&self) -> usize {
        self.collect_garbage_at(unix_time_ms_now())
    }

    pub(crate) fn collect_garbage_at(&self, now_ms: u64) -> usize {
        let gc_time = self.inner.config.gc_time_ms;
        let mut queries = self.inner.queries.borrow_mut();
        let before = queries.len();
        queries.retain(|_, entry| {
            let expired = entry.observers == 0
                && entry.in_flight.is_none()
                && entry
                    .inactive_since_ms
                    .is_some_and(|since| now_ms.saturating_sub(since) >= gc_time);
            !expired
        });
        before - queries.len()
    }

    pub(crate) fn fresh_data_at<T: Clone + 'static>(
        &self,
        key: &QueryKey,
        now_ms: u64,
    ) -> Option<T> {
        let queries = self.inner.queries.borrow();
        let entry = queries.get(key)?;
        if entry.status != QueryStatus::Success || entry.invalidated {
            return None;
        }
        let updated_at = entry.data_updated_at_ms?;
        if self.inner.config.is_stale(updated_at, now_ms) {
            return None;
        }
        entry.data.as_ref()?.downcast_ref::<T>().cloned()
    }

    fn join_fetch(&self, key: &QueryKey) -> Option<oneshot::Receiver<()>> {
        let mut queries = self.inner.queries.borrow_mut();
        let in_flight = queries.get_mut(key)?.in_flight.as_mut()?;
        if in_flight.invalidated {
            return None;
        }
        let (sender, receiver) = oneshot::channel();
        in_flight.waiters.push(sender);
        Some(receiver)
    }

    fn settled_result<T: Clone + 'static>(&self, key: &QueryKey) -> Option<Result<T, QueryError>> {
        let queries = self.inner.queries.borrow();
        let entry = queries.get(key)?;
        if entry.in_flight.is_some() {
            return None;
        }
        if let Some(message) = &entry.error {
            return Some(Err(QueryError::Failed {
                key: key.clone(),
                message: message.clone(),
                attempts: entry.failure_count,
            }));
        }
        entry
            .data
            .as_ref()?
            .downcast_ref::<T>()
            .cloned()
            .map(Ok)
    }

    fn begin_fetch(&self, key: &QueryKey, now_ms: u64) -> u64 {
        let token = self.inner.next_fetch.get();
        self.inner.next_fetch.set(token + 1);
        {
            let mut queries = self.inner.queries.borrow_mut();
            let entry = queries
                .entry(key.clone())
                .or_insert_with(|| QueryEntry::new(now_ms));
            let waiters = entry
                .in_flight
                .take()
                .map(|superseded| superseded.waiters)
                .unwrap_or_default();
            entry.in_flight = Some(InFlight {
                token,
                invalidated: false,
                waiters,
            });
            entry.failure_count = 0;
        }
        self.inner.in_flight.set(self.inner.in_flight.get() + 1);
        self.notify(QueryEvent::Updated(key.clone()));
        token
    }

    fn record_failure(&self, key: &QueryKey, token: u64, failures: u32) {
        {
            let mut queries = self.inner.queries.borrow_mut();
            match queries.get_mut(key) {
                Some(entry) if entry.owns_fetch(token) => entry.failure_count = failures,
                _ => return,
            }
        }
        self.notify(QueryEvent::Updated(key.clone()));
    }

    fn finish_success<T: 'static>(&self, key: &QueryKey, token: u64, data: T) {
        let now = unix_time_ms_now();
        self.settle(key, token, |entry| entry.store(data, now));
    }

    fn finish_error(&self, key: &QueryKey, token: u64, message: &str, failures: u32) {
        self.settle(key, token, |entry| {
            entry.status = if entry.data.is_some() {
                QueryStatus::Success
            } else {
                QueryStatus::Error
            };
            entry.error = Some(message.to_string());
            entry.failure_count = failures;
        });
    }

    // Applies a fetch outcome only while that fetch still owns the entry; results of superseded
    // or removed fetches are returned to their caller but never stored.
    fn settle(&self, key: &QueryKey, token: u64, apply: impl FnOnce(&mut QueryEntry)) {
        self.end_fetch();
        let waiters = {
            let mut queries = self.inner.queries.borrow_mut();
            let Some(entry) = queries.get_mut(key).filter(|entry| entry.owns_fetch(token)) else {
                return;
            };
            apply(entry);
            entry
                .in_flight
                .take()
                .map(|in_flight| in_flight.waiters)
                .unwrap_or_default()
        };
        for waiter in waiters {
            let _ = waiter.send(());
        }
        self.notify(QueryEvent::Updated(key.clone()));
    }

    fn end_fetch(&self) {
        self.inner
            .in_flight
            .set(self.inner.in_flight.get().saturating_sub(1));
    }

    // Listeners run after every borrow is released so they may call back into the client.
    fn notify(&self, event: QueryEvent) {
        let listeners: Vec<Listener> = self
            .inner
            .subscriptions
            .borrow()
            .values()
            .filter(|subscription| &subscription.key == event.key())
            .map(|subscription| subscription.listener.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

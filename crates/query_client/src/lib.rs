//! In-memory query cache shared by the browser client's component tree.
//!
//! [`QueryClient`] stores the results of asynchronous fetches keyed by [`QueryKey`], tracks
//! staleness and observers, retries failed fetches, and notifies subscribers when entries change.
//! The reactive layer in [`hooks`] and [`provider`] binds the cache to Leptos components; the
//! cache itself has no dependency on a reactive runtime.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod client;
mod config;
mod delay;
pub mod hooks;
mod key;
pub mod provider;
mod time;

pub use client::{
    FetchStatus, QueryClient, QueryError, QueryEvent, QueryStateSnapshot, QueryStatus,
    SubscriptionId, WeakQueryClient,
};
pub use config::QueryClientConfig;
pub use hooks::{create_mutation, create_query, MutationHandle, QueryHandle};
pub use key::QueryKey;
pub use provider::{use_query_client, QueryClientProvider};
pub use time::unix_time_ms_now;

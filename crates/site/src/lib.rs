//! Browser entry point for the Daily Tasks client.
//!
//! Startup is linear: find `#root`, create one [`query_client::QueryClient`], wrap
//! [`todo_app::App`] in the query-cache and theme providers, render once.

mod boot;
mod mount;
mod web_app;

pub use boot::{resolve_mount_point, start, start_with, AppContext, BootError, ProviderTree};
#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub use mount::BrowserMountHost;
pub use mount::{MountHost, MOUNT_ELEMENT_ID};
pub use web_app::{ProviderStack, SiteRoot};

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    if let Err(err) = start(&BrowserMountHost) {
        leptos::logging::error!("Daily Tasks failed to start: {err}");
    }
}

//! HTTP transport routed to target-specific implementations.

use crate::error::TodoApiError;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

/// Status and body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

pub(crate) async fn send(
    method: &str,
    url: &str,
    json_body: Option<&str>,
) -> Result<RawResponse, TodoApiError> {
    imp::send(method, url, json_body).await
}

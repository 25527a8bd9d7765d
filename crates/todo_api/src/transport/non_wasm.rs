use super::*;

pub(super) async fn send(
    _method: &str,
    _url: &str,
    _json_body: Option<&str>,
) -> Result<RawResponse, TodoApiError> {
    Err(TodoApiError::Transport(
        "browser fetch is only available when compiled for wasm32".to_string(),
    ))
}

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::*;

fn js_error(err: JsValue) -> TodoApiError {
    if let Some(text) = err.as_string() {
        return TodoApiError::Transport(text);
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return TodoApiError::Transport(text);
        }
    }
    TodoApiError::Transport(format!("{err:?}"))
}

pub(super) async fn send(
    method: &str,
    url: &str,
    json_body: Option<&str>,
) -> Result<RawResponse, TodoApiError> {
    let window =
        web_sys::window().ok_or_else(|| TodoApiError::Transport("window unavailable".into()))?;

    let init = RequestInit::new();
    init.set_method(method);
    if let Some(body) = json_body {
        init.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(url, &init).map_err(js_error)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(js_error)?;
    if json_body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;
    }

    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = value.dyn_into().map_err(js_error)?;
    let status = response.status();
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;

    Ok(RawResponse {
        status,
        body: text.as_string().unwrap_or_default(),
    })
}

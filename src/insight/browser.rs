// Browser-side insight plumbing: `fetch` transport and host-supplied JS callbacks.
// wasm32 only.

use async_trait::async_trait;
use js_sys::{Function, Promise};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use super::{HttpResponse, HttpTransport, InsightSource};
use crate::error::InsightError;
use crate::types::InsightRequest;

fn js_error(context: &str, err: JsValue) -> InsightError {
    InsightError::Transport(format!("{context}: {err:?}"))
}

/// POSTs through `window.fetch`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: String,
    ) -> Result<HttpResponse, InsightError> {
        let request_headers = Headers::new().map_err(|e| js_error("headers", e))?;
        for (name, value) in headers {
            request_headers
                .set(name, value)
                .map_err(|e| js_error("header", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_headers(&request_headers);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| js_error("request", e))?;

        let window = web_sys::window()
            .ok_or_else(|| InsightError::Transport("no window".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("fetch", e))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| InsightError::Transport("response is not a Response".to_string()))?;

        let text = JsFuture::from(resp.text().map_err(|e| js_error("text promise", e))?)
            .await
            .map_err(|e| js_error("text", e))?;

        Ok(HttpResponse {
            status: resp.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

/// Delegates to a page-supplied `(shapeName, area, perimeter) => string | Promise<string>`.
pub struct JsCallbackSource {
    callback: Function,
}

impl JsCallbackSource {
    pub fn new(callback: Function) -> Self {
        JsCallbackSource { callback }
    }
}

#[async_trait(?Send)]
impl InsightSource for JsCallbackSource {
    async fn fetch(&self, request: &InsightRequest) -> Result<String, InsightError> {
        let returned = self
            .callback
            .call3(
                &JsValue::NULL,
                &JsValue::from_str(request.shape.name()),
                &JsValue::from_f64(request.area),
                &JsValue::from_f64(request.perimeter),
            )
            .map_err(|e| InsightError::Callback(format!("{e:?}")))?;

        let resolved = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|e| InsightError::Callback(format!("{e:?}")))?;

        resolved
            .as_string()
            .ok_or_else(|| InsightError::Callback("callback did not return a string".to_string()))
    }
}

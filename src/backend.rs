//! Transport to the DLC manager backend.
//!
//! [`Backend`] is the seam between the SDK and the network: it sends one
//! [`ApiRequest`] and returns the parsed JSON body. [`HttpBackend`] is the
//! real implementation on top of a blocking `reqwest` client.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use serde_json::Value;

use crate::error::{DlcError, Result};
use crate::request::{ApiRequest, Method};

pub trait Backend: Send {
    /// Send a request and return the decoded JSON body.
    ///
    /// Transport failures and non-2xx statuses are errors. A body with
    /// `"success": false` is returned as-is; see [`ensure_success`].
    fn send(&self, request: &ApiRequest) -> Result<Value>;
}

/// `reqwest`-backed transport with no-cache headers on every request.
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Backend for HttpBackend {
    fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = request.url(&self.base_url)?;
        tracing::debug!(method = ?request.method(), %url, "backend request");
        let builder = match request.method() {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let builder = match request.body() {
            Some(body) => builder.json(body),
            None => builder,
        };
        let resp = builder.send()?.error_for_status()?;
        let value: Value = resp.json()?;
        Ok(value)
    }
}

/// Turn an application-level failure (`"success": false`) into an error.
///
/// The message is taken from `error`, then `message`, then a generic text.
/// Bodies without a `success` field are accepted.
pub fn ensure_success(body: Value) -> Result<Value> {
    let failed = body
        .get("success")
        .and_then(Value::as_bool)
        .map(|ok| !ok)
        .unwrap_or(false);
    if failed {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .or_else(|| body.get("message").and_then(Value::as_str))
            .unwrap_or("Unknown server error")
            .to_string();
        return Err(DlcError::Api(message));
    }
    Ok(body)
}

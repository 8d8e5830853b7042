//! Request builder for the DLC manager backend API.
//!
//! Query values are percent-encoded when the request is resolved against a
//! base URL. Slashes are stripped from app ids so a request never leaves its
//! endpoint. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use steam_dlc_sdk::ApiRequest;
//! let (method, path, body) = ApiRequest::get("/api/dlc/games")
//!     .query("refresh", "true")
//!     .build();
//! assert_eq!(path, "/api/dlc/games?refresh=true");
//! assert!(body.is_none());
//! # let _ = method;
//! ```

use serde_json::Value;

use crate::error::{DlcError, Result};

/// HTTP verbs used by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// Describes one call against the backend: verb, path, query string and
/// optional JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    /// Create a request for the given verb and absolute API path.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::Post, path)
    }

    /// `GET /api/dlc/{appid}/{action}`.
    pub fn game_get(appid: &str, action: &str) -> Self {
        Self::get(&game_path(appid, action))
    }

    /// `POST /api/dlc/{appid}/{action}`.
    pub fn game_post(appid: &str, action: &str) -> Self {
        Self::post(&game_path(appid, action))
    }

    /// Append a query parameter. Parameters keep insertion order.
    pub fn query(&mut self, key: &str, value: &str) -> &mut Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when `cond` holds.
    pub fn query_if(&mut self, cond: bool, key: &str, value: &str) -> &mut Self {
        if cond {
            self.query(key, value);
        }
        self
    }

    /// Append `nocache=<epoch millis>` so intermediaries never serve a stale copy.
    pub fn no_cache(&mut self) -> &mut Self {
        let millis = chrono::Utc::now().timestamp_millis();
        self.query("nocache", &millis.to_string())
    }

    /// Attach a JSON body.
    pub fn json(&mut self, body: Value) -> &mut Self {
        self.body = Some(body);
        self
    }

    /// Attach `{"dlc_ids": [...]}`. An empty list means "all" for uninstall.
    pub fn dlc_ids(&mut self, ids: &[String]) -> &mut Self {
        self.json(serde_json::json!({ "dlc_ids": ids }))
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Look up the first query parameter with the given key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Resolve the request against a backend base URL such as
    /// `http://127.0.0.1:5000`.
    pub fn url(&self, base: &str) -> Result<reqwest::Url> {
        let invalid = |e: &dyn std::fmt::Display| {
            DlcError::InvalidArgument(format!("Invalid URL {}{}: {}", base, self.path, e))
        };
        let mut url = reqwest::Url::parse(base).map_err(|e| invalid(&e))?;
        url = url.join(&self.path).map_err(|e| invalid(&e))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }

    /// Build the final `(method, path_and_query, body)` triple.
    pub fn build(&self) -> (Method, String, Option<Value>) {
        let target = match self.url("http://localhost") {
            Ok(url) => match url.query() {
                Some(q) => format!("{}?{}", url.path(), q),
                None => url.path().to_string(),
            },
            Err(_) => self.path.clone(),
        };
        (self.method, target, self.body.clone())
    }
}

fn game_path(appid: &str, action: &str) -> String {
    let appid: String = appid.chars().filter(|c| *c != '/').collect();
    format!("/api/dlc/{}/{}", appid.trim(), action)
}

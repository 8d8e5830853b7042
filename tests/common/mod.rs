//! Shared test fixtures for the DLC manager SDK integration tests.
//!
//! Provides `FakeBackend`, an in-memory [`Backend`] that answers canned JSON
//! bodies per `(method, path)` and records every request, and `manager()`
//! which builds a [`DlcManager`] on top of it with a temporary snapshot
//! directory and no batch delay.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use steam_dlc_sdk::{ApiRequest, Backend, DlcError, DlcManager, Method, Result};

enum Reply {
    Json(Value),
    Down(String),
}

#[derive(Default)]
struct FakeState {
    routes: HashMap<(Method, String), VecDeque<Reply>>,
    requests: Vec<ApiRequest>,
}

/// Canned-response backend. Clones share the same routes and request log.
///
/// Several replies registered for one route are served in order; the last
/// one keeps being served once the others are used up.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply for `method path`.
    pub fn on(&self, method: Method, path: &str, body: Value) -> &Self {
        self.push(method, path, Reply::Json(body));
        self
    }

    /// Queue a transport failure for `method path`.
    pub fn down(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, Reply::Down(message.to_string()));
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Requests sent to `path`, ignoring the query string.
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path() == path)
            .collect()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.inner
            .lock()
            .unwrap()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }
}

impl Backend for FakeBackend {
    fn send(&self, request: &ApiRequest) -> Result<Value> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request.clone());
        let key = (request.method(), request.path().to_string());
        let queue = state
            .routes
            .get_mut(&key)
            .ok_or_else(|| DlcError::NotFound(format!("no route for {}", request.path())))?;
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            None
        };
        let reply = match &reply {
            Some(r) => r,
            None => queue.front().ok_or_else(|| DlcError::NotFound("empty route".into()))?,
        };
        match reply {
            Reply::Json(v) => Ok(v.clone()),
            Reply::Down(msg) => Err(DlcError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                msg.clone(),
            ))),
        }
    }
}

/// Build a manager over `backend` with a temporary snapshot directory.
///
/// Returns `(DlcManager, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test.
pub fn manager(backend: &FakeBackend) -> (DlcManager, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let manager = DlcManager::builder()
        .backend(backend.clone())
        .cache_dir(tmp_dir.path())
        .batch_delay(Duration::ZERO)
        .build()
        .unwrap();
    (manager, tmp_dir)
}

// -- Sample payloads ----------------------------------------------------------

pub fn games_body() -> Value {
    json!({
        "success": true,
        "games": [
            {
                "appid": "100",
                "name": "Space Colony",
                "install_path": "C:/Steam/steamapps/common/Space Colony",
                "has_fix": false,
                "fix_status": "none",
                "has_dlc": true,
                "installed_dlc_count": 1
            },
            {
                "appid": 200,
                "name": "Harbor Town",
                "install_path": "D:/Games/Harbor Town",
                "has_fix": true,
                "fix_status": "applied",
                "has_dlc": false,
                "installed_dlc_count": 0
            }
        ],
        "from_cache": false
    })
}

/// Four raw entries for game 100: two valid, one excluded, one malformed.
pub fn dlc_list_body() -> Value {
    json!({
        "success": true,
        "dlcs": [
            {"id": "101", "name": "Chapter 2", "short_description": "More story", "final_formatted": "$4.99"},
            {"id": "102", "name": "Arena Mode", "price": "$2.99", "discount_percent": 25},
            {"id": "103", "name": "Space Colony Soundtrack"},
            {"appid": "x1", "name": "Broken"}
        ],
        "installed_dlc_ids": ["101", "103", "999"]
    })
}

/// Same list after DLC 102 got installed.
pub fn dlc_list_after_install_body() -> Value {
    let mut body = dlc_list_body();
    body["installed_dlc_ids"] = json!(["101", "102"]);
    body
}

pub fn empty_dlc_list_body() -> Value {
    json!({"success": true, "dlcs": [], "installed_dlc_ids": []})
}

/// Backend with games and DLC lists registered for both games.
pub fn seeded_backend() -> FakeBackend {
    let backend = FakeBackend::new();
    backend
        .on(Method::Get, "/api/dlc/games", games_body())
        .on(Method::Get, "/api/dlc/100/list", dlc_list_body())
        .on(Method::Get, "/api/dlc/200/list", empty_dlc_list_body());
    backend
}

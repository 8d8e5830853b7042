//! Backend connection with owned application state.
//!
//! Bundles the transport, the [`AppState`] the query interfaces mutate and
//! the [`CacheManager`] that persists it. Query interfaces borrow a
//! `&Connection`; state lives behind a `RefCell` so they can stay `&self`.

use std::cell::{Ref, RefCell, RefMut};
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::{ensure_success, Backend};
use crate::cache::{CacheManager, Freshness};
use crate::error::Result;
use crate::notice::Notice;
use crate::request::ApiRequest;
use crate::state::AppState;

pub struct Connection {
    backend: Box<dyn Backend>,
    state: RefCell<AppState>,
    /// Persists the client snapshot between sessions.
    pub cache: CacheManager,
    batch_delay: Duration,
}

impl Connection {
    pub fn new(backend: Box<dyn Backend>, cache: CacheManager, batch_delay: Duration) -> Self {
        Self {
            backend,
            state: RefCell::new(AppState::new()),
            cache,
            batch_delay,
        }
    }

    /// Send a request and return the body as-is, `success: false` included.
    pub fn send(&self, request: &ApiRequest) -> Result<Value> {
        self.backend.send(request)
    }

    /// Send a request and reject `"success": false` bodies.
    pub fn call(&self, request: &ApiRequest) -> Result<Value> {
        let body = self.send(request)?;
        ensure_success(body)
    }

    /// Like [`call`](Self::call), then deserialize the body into `T`.
    pub fn call_as<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let body = self.call(request)?;
        Ok(serde_json::from_value(body)?)
    }

    pub fn state(&self) -> Ref<'_, AppState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, AppState> {
        self.state.borrow_mut()
    }

    pub fn notify(&self, notice: Notice) {
        self.state.borrow_mut().notify(notice);
    }

    pub fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    /// Persist the current state. Failures are logged, not returned: a
    /// missing snapshot only costs the next session its restore.
    pub fn save_snapshot(&self) {
        let state = self.state.borrow();
        if let Err(e) = self.cache.save(&state) {
            tracing::warn!(error = %e, "failed to save snapshot");
        }
    }

    /// Restore state from the snapshot when it is recent enough.
    ///
    /// Returns the snapshot's [`Freshness`]; callers should force a game
    /// reload when `auto_refresh` is set.
    pub fn restore_snapshot(&self) -> Result<Freshness> {
        let Some(snapshot) = self.cache.load()? else {
            return Ok(Freshness::default());
        };
        let freshness = snapshot.freshness(Utc::now());
        if freshness.restore {
            let mut state = self.state.borrow_mut();
            snapshot.apply(&mut state);
            state.notify(Notice::info("Data restored from local cache"));
        }
        Ok(freshness)
    }

    /// Apply whatever snapshot exists, regardless of age. Used after a failed
    /// game load. Returns whether a snapshot was applied.
    pub fn fallback_to_snapshot(&self) -> Result<bool> {
        match self.cache.load()? {
            Some(snapshot) => {
                snapshot.apply(&mut self.state.borrow_mut());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the snapshot file and reset the in-memory state.
    pub fn clear_local(&self) -> Result<()> {
        self.cache.clear()?;
        self.state.borrow_mut().reset();
        Ok(())
    }
}

//! Steam DLC manager SDK for Rust.
//!
//! Client side of the Steam game/DLC management dashboard: talks to the DLC
//! manager backend over HTTP, reconciles the DLC lists it returns into clean,
//! de-duplicated records, tracks which DLCs the user queued for installation
//! or removal, and keeps a local snapshot of that state between sessions.
//!
//! # Quick start
//!
//! ```no_run
//! use steam_dlc_sdk::DlcManager;
//!
//! let manager = DlcManager::builder()
//!     .base_url("http://127.0.0.1:5000")
//!     .build()
//!     .unwrap();
//!
//! // Load games, then the DLCs of the first one
//! let games = manager.games().load(false).unwrap();
//! let dlcs = manager.dlcs().list(&games[0].appid).unwrap();
//!
//! // Queue a DLC and install it
//! manager.dlcs().toggle_install(&games[0].appid, &dlcs.validated_dlcs[0].id);
//! manager.dlcs().install_selected(&games[0].appid).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod backend;
pub mod batch;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod notice;
pub mod progress;
pub mod queries;
pub mod reconcile;
pub mod request;
pub mod selection;
pub mod state;

#[cfg(feature = "async")]
pub use async_client::AsyncDlcManager;
pub use backend::{Backend, HttpBackend};
pub use batch::{BatchReport, BatchRunner};
pub use cache::{CacheManager, Freshness, Snapshot};
pub use connection::Connection;
pub use error::{DlcError, Result};
pub use notice::{Notice, OperationLog, Severity};
pub use reconcile::{reconcile, reconcile_response};
pub use request::{ApiRequest, Method};
pub use selection::SelectionState;
pub use state::{AppState, Stats};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use models::Game;

// ---------------------------------------------------------------------------
// DlcManagerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`DlcManager`] instance.
///
/// Use [`DlcManager::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DlcManagerBuilder::build) to create the manager.
pub struct DlcManagerBuilder {
    base_url: String,
    cache_dir: Option<PathBuf>,
    persist: bool,
    timeout: Duration,
    batch_delay: Duration,
    backend: Option<Box<dyn Backend>>,
}

impl Default for DlcManagerBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            cache_dir: None,
            persist: true,
            timeout: config::DEFAULT_TIMEOUT,
            batch_delay: config::BATCH_DELAY,
            backend: None,
        }
    }
}

impl DlcManagerBuilder {
    /// Set the backend base URL. Defaults to `http://127.0.0.1:5000`.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Set a custom directory for the local snapshot.
    ///
    /// If not set, the platform cache directory is used (e.g.
    /// `~/.cache/steam-dlc-sdk` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable the local snapshot. Defaults to `true`.
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the pause between games in batch operations. Defaults to 500 ms.
    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Use a custom transport instead of HTTP. `base_url` and `timeout`
    /// are ignored.
    pub fn backend<B: Backend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Build the manager. Does not contact the backend.
    pub fn build(self) -> Result<DlcManager> {
        let backend = match self.backend {
            Some(b) => b,
            None => Box::new(HttpBackend::new(&self.base_url, self.timeout)?),
        };
        let cache = CacheManager::new(self.cache_dir, self.persist)?;
        let conn = Connection::new(backend, cache, self.batch_delay);
        Ok(DlcManager {
            conn,
            base_url: self.base_url,
        })
    }
}

// ---------------------------------------------------------------------------
// DlcManager
// ---------------------------------------------------------------------------

/// The main entry point for the SDK.
///
/// Wraps a [`Connection`] (which owns the transport, the application state
/// and the snapshot cache) and exposes domain-specific query interfaces as
/// lightweight borrowing wrappers.
///
/// Created via [`DlcManager::builder()`].
pub struct DlcManager {
    conn: Connection,
    base_url: String,
}

impl DlcManager {
    /// Create a new builder for configuring the manager.
    pub fn builder() -> DlcManagerBuilder {
        DlcManagerBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the game query interface.
    pub fn games(&self) -> queries::GameQuery<'_> {
        queries::GameQuery::new(&self.conn)
    }

    /// Access the DLC query interface.
    ///
    /// Listing, selection, installation, removal and validation of the DLCs
    /// of one game.
    pub fn dlcs(&self) -> queries::DlcQuery<'_> {
        queries::DlcQuery::new(&self.conn)
    }

    /// Access backend status and cache maintenance.
    pub fn maintenance(&self) -> queries::MaintenanceQuery<'_> {
        queries::MaintenanceQuery::new(&self.conn)
    }

    /// Access the sequential multi-game batch runner.
    pub fn batch(&self) -> BatchRunner<'_> {
        BatchRunner::new(&self.conn)
    }

    // -- Session -----------------------------------------------------------

    /// Restore the local snapshot if it is recent enough, then load games.
    ///
    /// A snapshot older than the auto-refresh window forces the backend to
    /// rescan.
    pub fn start(&self) -> Result<Vec<Game>> {
        let freshness = match self.conn.restore_snapshot() {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot restore failed, clearing it");
                self.conn.clear_local()?;
                Freshness::default()
            }
        };
        if freshness.auto_refresh {
            tracing::info!("snapshot is old, forcing a game refresh");
        }
        self.games().load(freshness.auto_refresh)
    }

    /// Snapshot of the current dashboard counters.
    pub fn stats(&self) -> Stats {
        self.conn.state().stats.clone()
    }

    /// Current selection sets.
    pub fn selection(&self) -> SelectionState {
        self.conn.state().selection.clone()
    }

    /// Most recent notice, if any.
    pub fn last_notice(&self) -> Option<Notice> {
        self.conn.state().log.latest().cloned()
    }

    /// All recorded notices, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.conn.state().log.iter().cloned().collect()
    }

    /// Persist the current state now.
    pub fn save(&self) {
        self.conn.save_snapshot();
    }

    /// Consume the manager, saving the snapshot first.
    pub fn close(self) {
        self.conn.save_snapshot();
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for DlcManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.conn.state();
        write!(
            f,
            "DlcManager(base_url={}, cache_dir={}, games={}, selected={}, to_remove={}, persist={})",
            self.base_url,
            self.conn.cache.cache_dir.display(),
            state.games.len(),
            state.selection.total_to_install(),
            state.selection.total_to_remove(),
            self.conn.cache.enabled
        )
    }
}

//! Async wrapper around [`DlcManager`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all manager operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client waits on the backend.
//!
//! # Example
//!
//! ```no_run
//! use steam_dlc_sdk::AsyncDlcManager;
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = AsyncDlcManager::builder().build().await.unwrap();
//!
//!     // Run any sync manager method via closure
//!     let games = manager.run(|m| m.games().load(false)).await.unwrap();
//!
//!     // Convenience method for a DLC list
//!     let dlcs = manager.list_dlcs(&games[0].appid).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::Backend;
use crate::batch::BatchReport;
use crate::config;
use crate::error::{DlcError, Result};
use crate::models::{Game, InstallOutcome, ReconciledDlcs, UninstallOutcome};
use crate::DlcManager;

// ---------------------------------------------------------------------------
// AsyncDlcManagerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncDlcManager`] instance.
pub struct AsyncDlcManagerBuilder {
    base_url: String,
    cache_dir: Option<PathBuf>,
    persist: bool,
    timeout: Duration,
    batch_delay: Duration,
    backend: Option<Box<dyn Backend>>,
}

impl Default for AsyncDlcManagerBuilder {
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

impl AsyncDlcManagerBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn backend<B: Backend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Build the async manager.
    ///
    /// Client construction runs on the blocking thread pool since the
    /// blocking `reqwest` client must not be created inside the runtime.
    pub async fn build(self) -> Result<AsyncDlcManager> {
        tokio::task::spawn_blocking(move || {
            let mut builder = DlcManager::builder()
                .base_url(&self.base_url)
                .persist(self.persist)
                .timeout(self.timeout)
                .batch_delay(self.batch_delay);
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(backend) = self.backend {
                builder.backend = Some(backend);
            }
            let manager = builder.build()?;
            Ok(AsyncDlcManager {
                inner: Arc::new(Mutex::new(manager)),
            })
        })
        .await
        .map_err(|e| DlcError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncDlcManager
// ---------------------------------------------------------------------------

/// Async wrapper around [`DlcManager`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`DlcManager`] is
/// protected by a [`Mutex`] since it uses `RefCell` internally, so calls
/// are serialized.
pub struct AsyncDlcManager {
    inner: Arc<Mutex<DlcManager>>,
}

impl AsyncDlcManager {
    /// Create a new builder for configuring the async manager.
    pub fn builder() -> AsyncDlcManagerBuilder {
        AsyncDlcManagerBuilder::default()
    }

    /// Run a sync manager operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&DlcManager) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let manager = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = manager
                .lock()
                .map_err(|_| DlcError::InvalidArgument("manager lock poisoned".into()))?;
            f(&*guard)
        })
        .await
        .map_err(|e| DlcError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Restore the snapshot and load games.
    pub async fn start(&self) -> Result<Vec<Game>> {
        self.run(|m| m.start()).await
    }

    pub async fn load_games(&self, force_refresh: bool) -> Result<Vec<Game>> {
        self.run(move |m| m.games().load(force_refresh)).await
    }

    pub async fn list_dlcs(&self, appid: &str) -> Result<ReconciledDlcs> {
        let appid = appid.to_string();
        self.run(move |m| m.dlcs().list(&appid)).await
    }

    pub async fn install_selected(&self, appid: &str) -> Result<InstallOutcome> {
        let appid = appid.to_string();
        self.run(move |m| m.dlcs().install_selected(&appid)).await
    }

    pub async fn uninstall_selected(&self, appid: &str) -> Result<UninstallOutcome> {
        let appid = appid.to_string();
        self.run(move |m| m.dlcs().uninstall_selected(&appid)).await
    }

    pub async fn refresh_all(&self) -> Result<BatchReport> {
        self.run(|m| m.batch().refresh_all()).await
    }

    /// Save the snapshot and release the manager.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let manager = self
                .inner
                .lock()
                .map_err(|_| DlcError::InvalidArgument("manager lock poisoned".into()))?;
            manager.save();
            Ok(())
        })
        .await
        .map_err(|e| DlcError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

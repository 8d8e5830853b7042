//! Local snapshot of client state.
//!
//! Persists the game list, the selection sets, the validated flag and the
//! dashboard stats as one JSON document in the cache directory, so a restart
//! can restore the previous session. Snapshots younger than one hour are
//! restored; snapshots older than thirty minutes ask for a fresh game load.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::Result;
use crate::models::Game;
use crate::selection::SelectionState;
use crate::state::{AppState, Stats};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemCache {
    pub last_update: Option<DateTime<Utc>>,
    pub version: String,
    pub validated: bool,
}

impl Default for SystemCache {
    fn default() -> Self {
        Self {
            last_update: None,
            version: config::SNAPSHOT_VERSION.to_string(),
            validated: false,
        }
    }
}

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub games_data: Vec<Game>,
    #[serde(default)]
    pub selected_dlcs: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub selected_to_remove: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub system_cache: SystemCache,
    #[serde(default)]
    pub stats: Stats,
}

impl Snapshot {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            games_data: state.games.clone(),
            selected_dlcs: state.selection.install_map().clone(),
            selected_to_remove: state.selection.remove_map().clone(),
            system_cache: SystemCache {
                last_update: None,
                version: config::SNAPSHOT_VERSION.to_string(),
                validated: state.validated,
            },
            stats: state.stats.clone(),
        }
    }

    /// Copy the snapshot into `state`. Reconciled DLC lists are not part of
    /// the snapshot and are left as they are.
    pub fn apply(&self, state: &mut AppState) {
        state.games = self.games_data.clone();
        state.selection =
            SelectionState::from_maps(self.selected_dlcs.clone(), self.selected_to_remove.clone());
        state.stats = self.stats.clone();
        state.validated = self.system_cache.validated;
    }

    /// Classify the snapshot age at `now`.
    pub fn freshness(&self, now: DateTime<Utc>) -> Freshness {
        let Some(last) = self.system_cache.last_update else {
            return Freshness::default();
        };
        let age = (now - last).to_std().unwrap_or_default();
        Freshness {
            restore: age < config::RESTORE_WINDOW,
            auto_refresh: age > config::AUTO_REFRESH_AFTER,
        }
    }
}

/// What to do with a snapshot on startup. Both flags may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Freshness {
    pub restore: bool,
    pub auto_refresh: bool,
}

/// Reads and writes the snapshot file.
pub struct CacheManager {
    /// Directory holding the snapshot file.
    pub cache_dir: PathBuf,
    /// If false, `save` and `load` do nothing.
    pub enabled: bool,
}

impl CacheManager {
    /// Create a cache manager rooted at `cache_dir`, or the platform default.
    ///
    /// Creates the directory when persistence is enabled.
    pub fn new(cache_dir: Option<PathBuf>, enabled: bool) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        if enabled {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self {
            cache_dir: dir,
            enabled,
        })
    }

    /// A cache manager that never touches the filesystem.
    pub fn disabled() -> Self {
        Self {
            cache_dir: config::default_cache_dir(),
            enabled: false,
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(config::SNAPSHOT_FILE)
    }

    /// Write the current state, stamping `last_update`. Returns the stamp.
    ///
    /// Writes to a temp file in the same directory and renames it, so a
    /// crash never leaves a truncated snapshot behind.
    pub fn save(&self, state: &AppState) -> Result<Option<DateTime<Utc>>> {
        if !self.enabled {
            return Ok(None);
        }
        let now = Utc::now();
        let mut snapshot = Snapshot::from_state(state);
        snapshot.system_cache.last_update = Some(now);

        fs::create_dir_all(&self.cache_dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir)?;
        serde_json::to_writer(&mut tmp, &snapshot)?;
        tmp.flush()?;
        tmp.persist(self.snapshot_path()).map_err(|e| e.error)?;
        tracing::debug!(path = %self.snapshot_path().display(), "snapshot saved");
        Ok(Some(now))
    }

    /// Load the snapshot, if any.
    ///
    /// A corrupt snapshot is deleted and treated as absent.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        if !self.enabled {
            return Ok(None);
        }
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str::<Snapshot>(&contents) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "corrupt snapshot, removing"
                );
                let _ = fs::remove_file(&path);
                Ok(None)
            }
        }
    }

    /// Remove the snapshot file. Does nothing when persistence is disabled.
    pub fn clear(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.snapshot_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

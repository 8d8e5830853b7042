//! Application state owned by a [`Connection`](crate::connection::Connection).
//!
//! Holds the game list, the last reconciled DLC list per game, the selection
//! sets, aggregate stats and the operations log. Query interfaces mutate it;
//! nothing else does.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Game, ReconciledDlcs};
use crate::notice::{Notice, OperationLog};
use crate::selection::SelectionState;

/// Dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_games: usize,
    pub games_with_dlc: usize,
    pub available_dlcs: usize,
    pub installed_dlcs: usize,
    pub valid_dlcs: usize,
    pub invalid_dlcs: usize,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub games: Vec<Game>,
    pub dlcs: BTreeMap<String, ReconciledDlcs>,
    pub selection: SelectionState,
    pub stats: Stats,
    /// Whether every game passed a validation run since the last game load.
    pub validated: bool,
    pub log: OperationLog,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn game(&self, appid: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.appid == appid)
    }

    pub fn game_mut(&mut self, appid: &str) -> Option<&mut Game> {
        self.games.iter_mut().find(|g| g.appid == appid)
    }

    pub fn game_ids(&self) -> Vec<String> {
        self.games.iter().map(|g| g.appid.clone()).collect()
    }

    /// Replace the game list. Reconciled lists of games that disappeared are
    /// dropped; selections are kept since they are keyed by game id.
    pub fn set_games(&mut self, games: Vec<Game>) {
        self.dlcs
            .retain(|appid, _| games.iter().any(|g| &g.appid == appid));
        self.games = games;
        self.validated = false;
        self.recompute_stats();
    }

    /// Store a fresh reconciliation result for `appid`.
    pub fn set_dlcs(&mut self, appid: &str, reconciled: ReconciledDlcs) {
        tracing::debug!(
            appid,
            valid = reconciled.total_valid,
            invalid = reconciled.invalid_count,
            installed = reconciled.installed_count,
            "reconciled DLC list"
        );
        self.dlcs.insert(appid.to_string(), reconciled);
        self.recompute_stats();
    }

    pub fn notify(&mut self, notice: Notice) {
        self.log.push(notice);
    }

    /// Recompute [`Stats`] from the game list and the reconciled DLC lists.
    ///
    /// Games whose DLC list has not been fetched contribute only to the game
    /// counters.
    pub fn recompute_stats(&mut self) {
        let mut stats = Stats {
            total_games: self.games.len(),
            games_with_dlc: self.games.iter().filter(|g| g.has_dlc).count(),
            ..Stats::default()
        };
        for reconciled in self.dlcs.values() {
            stats.available_dlcs += reconciled.total_valid;
            stats.installed_dlcs += reconciled.installed_count;
            stats.invalid_dlcs += reconciled.invalid_count;
        }
        stats.valid_dlcs = stats.available_dlcs;
        self.stats = stats;
    }

    /// Drop everything except the log.
    pub fn reset(&mut self) {
        self.games.clear();
        self.dlcs.clear();
        self.selection.clear_all();
        self.stats = Stats::default();
        self.validated = false;
    }
}

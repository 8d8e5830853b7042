//! Multi-game batch runner.
//!
//! Runs one backend call per game, strictly one after another, with a fixed
//! pause between games so the backend is never flooded. A game that fails is
//! recorded in the [`BatchReport`] and the batch moves on.

use std::thread;

use crate::connection::Connection;
use crate::error::{DlcError, Result};
use crate::notice::{Notice, Severity};
use crate::progress::batch_percent;
use crate::queries::DlcQuery;
use crate::state::Stats;

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Games processed without error.
    pub succeeded: usize,
    /// Games that failed.
    pub failed: usize,
    /// DLCs installed or removed, for install/removal batches.
    pub affected: u32,
    /// `(appid, message)` for every failed game.
    pub errors: Vec<(String, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Success if nothing failed, warning if something succeeded, error otherwise.
    pub fn severity(&self) -> Severity {
        if self.failed == 0 {
            Severity::Success
        } else if self.succeeded > 0 {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    fn record<T>(&mut self, appid: &str, result: &Result<T>) {
        match result {
            Ok(_) => self.succeeded += 1,
            Err(e) => {
                self.failed += 1;
                self.errors.push((appid.to_string(), e.to_string()));
            }
        }
    }
}

/// Runs batch operations over the games stored in a [`Connection`].
pub struct BatchRunner<'a> {
    conn: &'a Connection,
}

impl<'a> BatchRunner<'a> {
    /// Create a new `BatchRunner` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Refresh the DLC list of every stored game.
    pub fn refresh_all(&self) -> Result<BatchReport> {
        let games = self.require_games("No games to refresh")?;
        let dlcs = DlcQuery::new(self.conn);
        let mut report = BatchReport::default();

        for (i, appid) in games.iter().enumerate() {
            self.pause(i);
            let result = dlcs.refresh(appid);
            report.record(appid, &result);
        }

        self.finish(&report, format!("{} games refreshed", report.succeeded));
        Ok(report)
    }

    /// Install the selected DLCs of every game that has a selection.
    pub fn install_all_selected(&self) -> Result<BatchReport> {
        let pending = self.conn.state().selection.pending_installs();
        if pending.is_empty() {
            return Err(self.empty("No DLC selected for installation"));
        }
        let dlcs = DlcQuery::new(self.conn);
        let mut report = BatchReport::default();

        for (i, (appid, _)) in pending.iter().enumerate() {
            self.pause(i);
            let result = dlcs.install_selected(appid);
            if let Ok(outcome) = &result {
                report.affected += outcome.installed;
            }
            report.record(appid, &result);
        }

        self.finish(&report, format!("{} DLC(s) installed", report.affected));
        Ok(report)
    }

    /// Remove the selected DLCs of every game that has a removal selection.
    pub fn uninstall_all_selected(&self) -> Result<BatchReport> {
        let pending = self.conn.state().selection.pending_removals();
        if pending.is_empty() {
            return Err(self.empty("No DLC selected for removal"));
        }
        let dlcs = DlcQuery::new(self.conn);
        let mut report = BatchReport::default();

        for (i, (appid, _)) in pending.iter().enumerate() {
            self.pause(i);
            let result = dlcs.uninstall_selected(appid);
            if let Ok(outcome) = &result {
                report.affected += outcome.removed;
            }
            report.record(appid, &result);
        }

        self.finish(&report, format!("{} DLC(s) removed", report.affected));
        Ok(report)
    }

    /// Validate every stored game.
    pub fn validate_all(&self) -> Result<BatchReport> {
        self.validate_all_with(|_, _| {})
    }

    /// Validate every stored game, calling `progress(percent, appid)` after
    /// each one.
    pub fn validate_all_with<F>(&self, mut progress: F) -> Result<BatchReport>
    where
        F: FnMut(u8, &str),
    {
        let games = self.require_games("No games to validate")?;
        let dlcs = DlcQuery::new(self.conn);
        let mut report = BatchReport::default();

        for (i, appid) in games.iter().enumerate() {
            self.pause(i);
            let result = dlcs.validate(appid);
            report.record(appid, &result);
            progress(batch_percent(i + 1, games.len()), appid);
        }

        self.conn.state_mut().validated = report.failed == 0;
        self.finish(
            &report,
            format!("{} of {} games validated", report.succeeded, report.total()),
        );
        Ok(report)
    }

    /// Fetch every game's DLC list and recompute the dashboard stats.
    ///
    /// Games whose list cannot be fetched keep their previous list, if any.
    pub fn collect_stats(&self) -> Result<Stats> {
        let games = self.conn.state().game_ids();
        let dlcs = DlcQuery::new(self.conn);
        for appid in &games {
            if let Err(e) = dlcs.list(appid) {
                tracing::warn!(appid = %appid, error = %e, "stats collection failed");
            }
        }
        let stats = {
            let mut state = self.conn.state_mut();
            state.recompute_stats();
            state.stats.clone()
        };
        self.conn.save_snapshot();
        tracing::info!(
            available = stats.available_dlcs,
            installed = stats.installed_dlcs,
            invalid = stats.invalid_dlcs,
            "stats updated"
        );
        Ok(stats)
    }

    // -- Helpers -------------------------------------------------------------

    fn require_games(&self, message: &str) -> Result<Vec<String>> {
        let games = self.conn.state().game_ids();
        if games.is_empty() {
            return Err(self.empty(message));
        }
        Ok(games)
    }

    fn empty(&self, message: &str) -> DlcError {
        self.conn.notify(Notice::error(message));
        DlcError::InvalidArgument(message.to_string())
    }

    /// Sleep before every iteration but the first.
    fn pause(&self, index: usize) {
        let delay = self.conn.batch_delay();
        if index > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    fn finish(&self, report: &BatchReport, summary: String) {
        let message = if report.failed == 0 {
            summary
        } else {
            format!("{}, {} error(s)", summary, report.failed)
        };
        for (appid, err) in &report.errors {
            tracing::error!(appid = %appid, error = %err, "batch item failed");
        }
        self.conn.notify(Notice::new(report.severity(), message));
        self.conn.save_snapshot();
    }
}

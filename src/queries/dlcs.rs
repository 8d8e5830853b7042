//! Per-game DLC queries: listing, selection, install and removal.
//!
//! Every list fetched from the backend goes through
//! [`reconcile_response`](crate::reconcile::reconcile_response) before it is
//! stored. Install and removal only clear a game's selection after the
//! backend confirmed success; a failed call leaves the selection untouched.

use serde::de::DeserializeOwned;

use crate::connection::Connection;
use crate::error::{DlcError, Result};
use crate::models::{
    DlcRecord, GameSummary, InstallOutcome, ReconciledDlcs, UninstallOutcome, ValidationReport,
};
use crate::notice::Notice;
use crate::reconcile::{reconcile_response, sorted_for_display};
use crate::request::ApiRequest;

// ---------------------------------------------------------------------------
// DlcQuery
// ---------------------------------------------------------------------------

/// Query interface for the DLCs of installed games.
pub struct DlcQuery<'a> {
    conn: &'a Connection,
}

impl<'a> DlcQuery<'a> {
    /// Create a new `DlcQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // -- Listing -------------------------------------------------------------

    /// Fetch and reconcile the DLC list of `appid`.
    pub fn list(&self, appid: &str) -> Result<ReconciledDlcs> {
        let request = ApiRequest::game_get(appid, "list");
        self.fetch(appid, &request)
            .map_err(|e| self.fail(format!("Failed to load DLCs for {}", appid), e))
    }

    /// Like [`list`](Self::list) but asks the backend to bypass its cache.
    pub fn refresh(&self, appid: &str) -> Result<ReconciledDlcs> {
        let mut request = ApiRequest::game_get(appid, "list");
        request.query("refresh", "true").no_cache();
        let reconciled = self
            .fetch(appid, &request)
            .map_err(|e| self.fail(format!("Failed to refresh DLCs for {}", appid), e))?;
        self.conn
            .notify(Notice::success(format!("DLCs refreshed for game {}", appid)));
        Ok(reconciled)
    }

    /// The last reconciled list stored for `appid`, if any.
    pub fn cached(&self, appid: &str) -> Option<ReconciledDlcs> {
        self.conn.state().dlcs.get(appid).cloned()
    }

    /// Stored validated DLCs in display order: installed first, then by name.
    pub fn sorted(&self, appid: &str) -> Vec<DlcRecord> {
        self.conn
            .state()
            .dlcs
            .get(appid)
            .map(sorted_for_display)
            .unwrap_or_default()
    }

    /// Look up one stored DLC record.
    pub fn info(&self, appid: &str, dlc_id: &str) -> Result<DlcRecord> {
        self.conn
            .state()
            .dlcs
            .get(appid)
            .and_then(|r| r.get(dlc_id))
            .cloned()
            .ok_or_else(|| DlcError::NotFound(format!("DLC {} of game {}", dlc_id, appid)))
    }

    // -- Selection -----------------------------------------------------------

    /// Flip the install selection of one DLC. Returns the new membership.
    pub fn toggle_install(&self, appid: &str, dlc_id: &str) -> bool {
        let selected = self.conn.state_mut().selection.toggle_install(appid, dlc_id);
        self.conn.save_snapshot();
        selected
    }

    /// Flip the removal selection of one installed DLC.
    pub fn toggle_remove(&self, appid: &str, dlc_id: &str) -> bool {
        let selected = self.conn.state_mut().selection.toggle_remove(appid, dlc_id);
        self.conn.save_snapshot();
        selected
    }

    /// Select every not-installed DLC of every game with a stored list.
    pub fn select_all(&self) -> usize {
        let added = {
            let mut state = self.conn.state_mut();
            let lists: Vec<(String, ReconciledDlcs)> = state
                .games
                .iter()
                .filter_map(|g| state.dlcs.get(&g.appid).map(|r| (g.appid.clone(), r.clone())))
                .collect();
            let mut added = 0;
            for (appid, reconciled) in &lists {
                added += state.selection.select_all_available(appid, reconciled);
            }
            let notice = if added > 0 {
                Notice::success(format!("{} DLCs selected", added))
            } else {
                Notice::info("All DLCs are already selected")
            };
            state.notify(notice);
            added
        };
        self.conn.save_snapshot();
        added
    }

    /// Clear every install selection.
    pub fn deselect_all(&self) -> usize {
        let removed = {
            let mut state = self.conn.state_mut();
            let removed = state.selection.deselect_all_installs();
            let notice = if removed > 0 {
                Notice::info(format!("{} DLCs deselected", removed))
            } else {
                Notice::info("No DLC was selected")
            };
            state.notify(notice);
            removed
        };
        self.conn.save_snapshot();
        removed
    }

    // -- Installation --------------------------------------------------------

    /// Install every DLC selected for `appid`.
    pub fn install_selected(&self, appid: &str) -> Result<InstallOutcome> {
        let ids = self.conn.state().selection.install_ids(appid).to_vec();
        if ids.is_empty() {
            return Err(self.fail(
                "Install".to_string(),
                DlcError::InvalidArgument("select at least one DLC to install".into()),
            ));
        }

        let outcome: InstallOutcome = self
            .post_ids(appid, "install", &ids)
            .map_err(|e| self.fail(format!("Failed to install DLCs for {}", appid), e))?;

        self.conn.state_mut().selection.clear_install(appid);
        self.after_change(appid);
        self.conn.notify(Notice::success(format!(
            "{} DLC(s) installed for game {}",
            outcome.installed, appid
        )));
        Ok(outcome)
    }

    /// Install a single DLC regardless of the current selection.
    pub fn install_single(&self, appid: &str, dlc_id: &str) -> Result<InstallOutcome> {
        let outcome: InstallOutcome = self
            .post_ids(appid, "install", &[dlc_id.to_string()])
            .map_err(|e| self.fail(format!("Failed to install DLC {}", dlc_id), e))?;

        self.conn
            .state_mut()
            .selection
            .set_install(appid, dlc_id, false);
        self.after_change(appid);
        self.conn
            .notify(Notice::success(format!("DLC {} installed", dlc_id)));
        Ok(outcome)
    }

    // -- Removal -------------------------------------------------------------

    /// Remove every installed DLC selected for removal on `appid`.
    pub fn uninstall_selected(&self, appid: &str) -> Result<UninstallOutcome> {
        let ids = self.conn.state().selection.remove_ids(appid).to_vec();
        if ids.is_empty() {
            return Err(self.fail(
                "Remove".to_string(),
                DlcError::InvalidArgument("select at least one installed DLC to remove".into()),
            ));
        }

        let outcome: UninstallOutcome = self
            .post_ids(appid, "uninstall", &ids)
            .map_err(|e| self.fail(format!("Failed to remove DLCs for {}", appid), e))?;

        self.conn.state_mut().selection.clear_remove(appid);
        self.after_change(appid);
        self.conn.notify(Notice::success(format!(
            "{} DLC(s) removed from game {}",
            outcome.removed, appid
        )));
        Ok(outcome)
    }

    /// Remove one installed DLC.
    pub fn remove_single(&self, appid: &str, dlc_id: &str) -> Result<UninstallOutcome> {
        let outcome: UninstallOutcome = self
            .post_ids(appid, "uninstall", &[dlc_id.to_string()])
            .map_err(|e| self.fail(format!("Failed to remove DLC {}", dlc_id), e))?;

        self.conn
            .state_mut()
            .selection
            .set_remove(appid, dlc_id, false);
        self.after_change(appid);
        self.conn
            .notify(Notice::success(format!("DLC {} removed", dlc_id)));
        Ok(outcome)
    }

    /// Remove every installed DLC of `appid` (empty id list).
    pub fn uninstall_all(&self, appid: &str) -> Result<UninstallOutcome> {
        let outcome: UninstallOutcome = self
            .post_ids(appid, "uninstall", &[])
            .map_err(|e| self.fail(format!("Failed to remove DLCs for {}", appid), e))?;

        self.conn.state_mut().selection.clear_remove(appid);
        self.after_change(appid);
        self.conn.notify(Notice::success(format!(
            "{} DLC(s) removed from game {}",
            outcome.removed, appid
        )));
        Ok(outcome)
    }

    // -- Validation and summary ----------------------------------------------

    /// Ask the backend to validate the DLC data of `appid` and record the
    /// result on the stored game.
    pub fn validate(&self, appid: &str) -> Result<ValidationReport> {
        let mut request = ApiRequest::game_get(appid, "validate");
        request.no_cache();

        match self.conn.call_as::<ValidationReport>(&request) {
            Ok(report) => {
                self.mark_validated(appid, true);
                // A stale list would contradict the validation badge.
                if let Err(e) = self.list(appid) {
                    tracing::warn!(appid, error = %e, "reload after validation failed");
                }
                self.conn.notify(Notice::success(format!(
                    "Game {} validated: {} valid DLCs found",
                    appid, report.total_valid
                )));
                Ok(report)
            }
            Err(e) => {
                self.mark_validated(appid, false);
                Err(self.fail(format!("Failed to validate game {}", appid), e))
            }
        }
    }

    /// Fetch the backend summary of `appid`.
    pub fn summary(&self, appid: &str) -> Result<GameSummary> {
        let mut request = ApiRequest::game_get(appid, "summary");
        request.no_cache();
        self.conn
            .call_as(&request)
            .map_err(|e| self.fail(format!("Failed to load summary for {}", appid), e))
    }

    // -- Helpers -------------------------------------------------------------

    fn fetch(&self, appid: &str, request: &ApiRequest) -> Result<ReconciledDlcs> {
        let body = self.conn.call(request)?;
        let reconciled = reconcile_response(&body);
        if reconciled.invalid_count > 0 {
            tracing::warn!(
                appid,
                invalid = reconciled.invalid_count,
                "filtered invalid DLC entries"
            );
        }
        self.conn.state_mut().set_dlcs(appid, reconciled.clone());
        Ok(reconciled)
    }

    fn post_ids<T: DeserializeOwned>(&self, appid: &str, action: &str, ids: &[String]) -> Result<T> {
        let mut request = ApiRequest::game_post(appid, action);
        request.dlc_ids(ids);
        self.conn.call_as(&request)
    }

    /// Reload the list after a successful change and persist.
    fn after_change(&self, appid: &str) {
        if let Err(e) = self.list(appid) {
            tracing::warn!(appid, error = %e, "reload after change failed");
        }
        self.conn.save_snapshot();
    }

    fn mark_validated(&self, appid: &str, valid: bool) {
        let mut state = self.conn.state_mut();
        if let Some(game) = state.game_mut(appid) {
            game.data_validated = Some(valid);
        }
    }

    /// Record an error notice and hand the error back.
    fn fail(&self, context: String, e: DlcError) -> DlcError {
        self.conn.notify(Notice::error(format!("{}: {}", context, e)));
        e
    }
}

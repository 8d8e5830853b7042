//! Per-game DLC selection sets.
//!
//! Two independent maps from game id to an ordered, duplicate-free list of
//! DLC ids: one for DLCs queued for installation and one for installed DLCs
//! queued for removal. Sets only change through explicit toggles or after a
//! successful install/removal round-trip for that game.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ReconciledDlcs;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default)]
    to_install: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    to_remove: BTreeMap<String, Vec<String>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the two maps stored in a snapshot. Duplicates are dropped.
    pub fn from_maps(
        to_install: BTreeMap<String, Vec<String>>,
        to_remove: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let dedup = |map: BTreeMap<String, Vec<String>>| -> BTreeMap<String, Vec<String>> {
            map.into_iter()
                .map(|(game, ids)| {
                    let mut out: Vec<String> = Vec::with_capacity(ids.len());
                    for id in ids {
                        if !out.contains(&id) {
                            out.push(id);
                        }
                    }
                    (game, out)
                })
                .collect()
        };
        Self {
            to_install: dedup(to_install),
            to_remove: dedup(to_remove),
        }
    }

    // -- Installation queue ------------------------------------------------

    /// Flip membership of `dlc_id` in the install set. Returns whether it is
    /// selected afterwards.
    pub fn toggle_install(&mut self, game: &str, dlc_id: &str) -> bool {
        toggle(&mut self.to_install, game, dlc_id)
    }

    /// Set membership explicitly, as a checkbox would.
    pub fn set_install(&mut self, game: &str, dlc_id: &str, selected: bool) {
        set(&mut self.to_install, game, dlc_id, selected);
    }

    pub fn install_ids(&self, game: &str) -> &[String] {
        self.to_install.get(game).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected_for_install(&self, game: &str, dlc_id: &str) -> bool {
        self.install_ids(game).iter().any(|id| id == dlc_id)
    }

    pub fn clear_install(&mut self, game: &str) {
        self.to_install.remove(game);
    }

    pub fn total_to_install(&self) -> usize {
        self.to_install.values().map(Vec::len).sum()
    }

    /// Games with at least one DLC queued for installation, in key order.
    pub fn pending_installs(&self) -> Vec<(String, Vec<String>)> {
        pending(&self.to_install)
    }

    /// Select every validated, not-installed DLC of `game`. Returns how many
    /// were newly selected.
    pub fn select_all_available(&mut self, game: &str, dlcs: &ReconciledDlcs) -> usize {
        let mut added = 0;
        for dlc in dlcs.available() {
            if !self.is_selected_for_install(game, &dlc.id) {
                self.set_install(game, &dlc.id, true);
                added += 1;
            }
        }
        added
    }

    /// Clear every install set. Returns the number of ids dropped.
    pub fn deselect_all_installs(&mut self) -> usize {
        let total = self.total_to_install();
        self.to_install.clear();
        total
    }

    // -- Removal queue -----------------------------------------------------

    pub fn toggle_remove(&mut self, game: &str, dlc_id: &str) -> bool {
        toggle(&mut self.to_remove, game, dlc_id)
    }

    pub fn set_remove(&mut self, game: &str, dlc_id: &str, selected: bool) {
        set(&mut self.to_remove, game, dlc_id, selected);
    }

    pub fn remove_ids(&self, game: &str) -> &[String] {
        self.to_remove.get(game).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected_for_removal(&self, game: &str, dlc_id: &str) -> bool {
        self.remove_ids(game).iter().any(|id| id == dlc_id)
    }

    pub fn clear_remove(&mut self, game: &str) {
        self.to_remove.remove(game);
    }

    pub fn total_to_remove(&self) -> usize {
        self.to_remove.values().map(Vec::len).sum()
    }

    pub fn pending_removals(&self) -> Vec<(String, Vec<String>)> {
        pending(&self.to_remove)
    }

    // -- Whole state -------------------------------------------------------

    pub fn clear_all(&mut self) {
        self.to_install.clear();
        self.to_remove.clear();
    }

    pub fn install_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.to_install
    }

    pub fn remove_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.to_remove
    }
}

fn toggle(map: &mut BTreeMap<String, Vec<String>>, game: &str, dlc_id: &str) -> bool {
    let ids = map.entry(game.to_string()).or_default();
    if let Some(pos) = ids.iter().position(|id| id == dlc_id) {
        ids.remove(pos);
        if ids.is_empty() {
            map.remove(game);
        }
        false
    } else {
        ids.push(dlc_id.to_string());
        true
    }
}

fn set(map: &mut BTreeMap<String, Vec<String>>, game: &str, dlc_id: &str, selected: bool) {
    let present = map
        .get(game)
        .map(|ids| ids.iter().any(|id| id == dlc_id))
        .unwrap_or(false);
    if present != selected {
        toggle(map, game, dlc_id);
    }
}

fn pending(map: &BTreeMap<String, Vec<String>>) -> Vec<(String, Vec<String>)> {
    map.iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(game, ids)| (game.clone(), ids.clone()))
        .collect()
}

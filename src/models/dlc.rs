use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DlcRecord: A validated, display-ready DLC entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DlcRecord {
    pub id: String,
    pub appid: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_field: String,
    pub price: String,
    pub original_price: String,
    pub discount_percent: i64,
    pub is_free: bool,
    pub release_date: String,
    pub coming_soon: bool,
    pub header_image: String,
    pub capsule_image: String,
    pub validated: bool,
}

// ---------------------------------------------------------------------------
// ReconciledDlcs: Output of one reconciliation pass for a game
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledDlcs {
    pub validated_dlcs: Vec<DlcRecord>,
    pub installed_ids: Vec<String>,
    pub total_raw: usize,
    pub total_valid: usize,
    pub invalid_count: usize,
    pub installed_count: usize,
}

impl ReconciledDlcs {
    pub fn is_installed(&self, dlc_id: &str) -> bool {
        self.installed_ids.iter().any(|id| id == dlc_id)
    }

    pub fn get(&self, dlc_id: &str) -> Option<&DlcRecord> {
        self.validated_dlcs.iter().find(|d| d.id == dlc_id)
    }

    /// Validated DLCs that are not installed yet, in list order.
    pub fn available(&self) -> impl Iterator<Item = &DlcRecord> {
        self.validated_dlcs
            .iter()
            .filter(move |d| !self.is_installed(&d.id))
    }
}

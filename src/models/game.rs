use serde::{Deserialize, Serialize};

use super::de::string_or_number;

// ---------------------------------------------------------------------------
// Game: An installed Steam game as reported by the backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(deserialize_with = "string_or_number")]
    pub appid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub install_path: Option<String>,
    #[serde(default)]
    pub has_fix: bool,
    #[serde(default)]
    pub fix_status: Option<String>,
    #[serde(default)]
    pub has_dlc: bool,
    #[serde(default)]
    pub installed_dlc_count: u32,
    /// Set client-side by the last validation run for this game.
    #[serde(default)]
    pub data_validated: Option<bool>,
}

impl Game {
    /// Display name, falling back to `Game {appid}`.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("Game {}", self.appid),
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de::{id_list, string_or_number};
use super::game::Game;

// ---------------------------------------------------------------------------
// Game list endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamesResponse {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub from_cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetail {
    pub game: Game,
}

// ---------------------------------------------------------------------------
// Install / uninstall results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstallOutcome {
    #[serde(default)]
    pub installed: u32,
    #[serde(default, deserialize_with = "id_list")]
    pub dlcs_added: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UninstallOutcome {
    #[serde(default)]
    pub removed: u32,
    #[serde(default, deserialize_with = "id_list")]
    pub dlcs_removed: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation and summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default, deserialize_with = "string_or_number")]
    pub appid: String,
    #[serde(default)]
    pub total_raw: u32,
    #[serde(default)]
    pub total_valid: u32,
    #[serde(default)]
    pub installed_count: u32,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub dlcs: Vec<Value>,
    #[serde(default)]
    pub installed_dlc_ids: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSummary {
    #[serde(default)]
    pub game: Option<Game>,
    #[serde(default)]
    pub available_dlcs: u32,
    #[serde(default)]
    pub installed_dlcs: u32,
    #[serde(default)]
    pub validated_count: u32,
    #[serde(default)]
    pub dlcs: Vec<Value>,
    #[serde(default)]
    pub installed_dlc_ids: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Maintenance endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerStatus {
    #[serde(default)]
    pub steam_path: Option<String>,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub games_with_dlc: u32,
    /// Path of the `stplug-in` directory, or a falsy value when missing.
    #[serde(default, rename = "stplug-in")]
    pub stplug_in: Option<Value>,
    #[serde(default)]
    pub dlc_cache_size: u32,
    #[serde(default)]
    pub total_dlcs_cached: u32,
    #[serde(default)]
    pub from_cache: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl ManagerStatus {
    /// Whether the backend located the `stplug-in` directory.
    pub fn has_stplug_in(&self) -> bool {
        match &self.stplug_in {
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub steam_path: Option<String>,
    #[serde(default, rename = "stplug-in_exists")]
    pub stplug_in_exists: bool,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some("healthy")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheOutcome {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub dlc_cache_cleared: bool,
    #[serde(default)]
    pub games_cache_cleared: bool,
}

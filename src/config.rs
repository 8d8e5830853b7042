use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// Steam store endpoint used to check outbound connectivity, queried with
/// `appids=570`.
pub const STEAM_STORE_CHECK_URL: &str = "https://store.steampowered.com/api/appdetails";
pub const STEAM_STORE_CHECK_APPID: &str = "570";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Name of the persisted client snapshot inside the cache directory.
pub const SNAPSHOT_FILE: &str = "dlc_manager_cache.json";
pub const SNAPSHOT_VERSION: &str = "v10.1";

/// A snapshot younger than this is restored on startup.
pub const RESTORE_WINDOW: Duration = Duration::from_secs(60 * 60);
/// A snapshot older than this triggers a forced game list refresh.
pub const AUTO_REFRESH_AFTER: Duration = Duration::from_secs(30 * 60);

/// Pause between iterations of multi-game batch operations.
pub const BATCH_DELAY: Duration = Duration::from_millis(500);

pub const NOTICE_DURATION: Duration = Duration::from_secs(5);
pub const OPERATION_LOG_CAPACITY: usize = 200;

pub const DEFAULT_DLC_DESCRIPTION: &str = "No description available";

/// Lower-case substrings that mark a store entry as non-installable content
/// (soundtracks, artbooks, bundles, editions).
pub const EXCLUDED_KEYWORDS: &[&str] = &[
    "soundtrack",
    "ost",
    "artbook",
    "guide",
    "season pass",
    "bundle",
    "pack",
    "comic",
    "art book",
    "strategy guide",
    "sound track",
    "digital artbook",
    "digital soundtrack",
    "pre-order",
    "preorder",
    "deluxe edition",
    "gold edition",
    "ultimate edition",
    "collector's edition",
];

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("steam-dlc-sdk")
    } else {
        PathBuf::from(".steam-dlc-sdk-cache")
    }
}

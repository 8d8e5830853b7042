//! Backend status and cache maintenance endpoints.

use serde_json::Value;

use crate::config;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{
    CacheOutcome, DiagnosticCheck, DiagnosticReport, Game, GamesResponse, HealthReport,
    ManagerStatus,
};
use crate::notice::{Notice, Severity};
use crate::queries::GameQuery;
use crate::request::ApiRequest;

/// Query interface for status, health and backend cache control.
pub struct MaintenanceQuery<'a> {
    conn: &'a Connection,
}

impl<'a> MaintenanceQuery<'a> {
    /// Create a new `MaintenanceQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// `GET /api/dlc/status`.
    pub fn status(&self) -> Result<ManagerStatus> {
        self.conn.call_as(&ApiRequest::get("/api/dlc/status"))
    }

    /// `GET /api/dlc/health`. An unhealthy backend answers with
    /// `success: false` and is reported as an error.
    pub fn health(&self) -> Result<HealthReport> {
        self.conn.call_as(&ApiRequest::get("/api/dlc/health"))
    }

    /// Ask the backend to rebuild its DLC cache.
    pub fn refresh_cache(&self) -> Result<CacheOutcome> {
        match self
            .conn
            .call_as::<CacheOutcome>(&ApiRequest::post("/api/dlc/cache/refresh"))
        {
            Ok(outcome) => {
                self.conn.notify(Notice::success("Backend cache refreshed"));
                Ok(outcome)
            }
            Err(e) => {
                self.conn
                    .notify(Notice::error(format!("Failed to refresh cache: {}", e)));
                Err(e)
            }
        }
    }

    /// Clear the backend cache, then the local snapshot and all in-memory
    /// state. Local state is only touched once the backend confirmed.
    pub fn clear_cache(&self) -> Result<CacheOutcome> {
        let outcome = match self
            .conn
            .call_as::<CacheOutcome>(&ApiRequest::post("/api/dlc/cache/clear"))
        {
            Ok(outcome) => outcome,
            Err(e) => {
                self.conn
                    .notify(Notice::error(format!("Failed to clear cache: {}", e)));
                return Err(e);
            }
        };
        self.conn.clear_local()?;
        self.conn
            .notify(Notice::success("Cache cleared, reload the game list"));
        Ok(outcome)
    }

    /// Run the system checks in order and score the result.
    ///
    /// Every check runs even when an earlier one failed. The report
    /// severity is success from 80 %, warning from 50 %, error below.
    pub fn diagnose(&self) -> DiagnosticReport {
        let mut checks = Vec::with_capacity(5);

        let status = self.conn.send(&ApiRequest::get("/api/dlc/status"));
        checks.push(match &status {
            Ok(_) => DiagnosticCheck::new("API Connection", Severity::Success, "API reachable"),
            Err(e) => DiagnosticCheck::new(
                "API Connection",
                Severity::Error,
                format!("API unreachable: {}", e),
            ),
        });
        let status = status
            .ok()
            .filter(is_success)
            .and_then(|body| serde_json::from_value::<ManagerStatus>(body).ok());

        let mut cached = ApiRequest::get("/api/dlc/games");
        cached.query("cache", "true");
        checks.push(match self.conn.send(&cached) {
            Ok(body) if is_success(&body) => {
                DiagnosticCheck::new(
                    "System Cache",
                    Severity::Success,
                    format!("Cache OK: {} games", game_count(body)),
                )
            }
            Ok(_) => DiagnosticCheck::new("System Cache", Severity::Warning, "Cache issues"),
            Err(_) => DiagnosticCheck::new("System Cache", Severity::Error, "Cache unavailable"),
        });

        let mut store = ApiRequest::get(config::STEAM_STORE_CHECK_URL);
        store.query("appids", config::STEAM_STORE_CHECK_APPID);
        checks.push(match self.conn.send(&store) {
            Ok(body) if body[config::STEAM_STORE_CHECK_APPID]["success"] == Value::Bool(true) => {
                DiagnosticCheck::new("Steam API", Severity::Success, "Steam API reachable")
            }
            Ok(_) => DiagnosticCheck::new("Steam API", Severity::Warning, "Steam API limited"),
            Err(_) => DiagnosticCheck::new("Steam API", Severity::Error, "Steam API unreachable"),
        });

        checks.push(match &status {
            Some(s) if s.has_stplug_in() => {
                DiagnosticCheck::new("stplug-in", Severity::Success, "stplug-in directory found")
            }
            _ => DiagnosticCheck::new("stplug-in", Severity::Error, "stplug-in directory missing"),
        });

        let installed = self
            .conn
            .send(&ApiRequest::get("/api/dlc/games"))
            .map(|body| {
                if is_success(&body) {
                    game_count(body)
                } else {
                    0
                }
            });
        checks.push(match installed {
            Ok(n) if n > 0 => DiagnosticCheck::new(
                "Installed Games",
                Severity::Success,
                format!("{} games found", n),
            ),
            Ok(_) => DiagnosticCheck::new("Installed Games", Severity::Warning, "No games found"),
            Err(_) => {
                DiagnosticCheck::new("Installed Games", Severity::Error, "Could not load games")
            }
        });

        let report = DiagnosticReport::from_checks(checks);
        self.conn.notify(Notice::new(
            report.severity,
            format!("Diagnostics score: {}%", report.score),
        ));
        report
    }

    /// Clear every cache, then force a rescan of the installed games.
    pub fn apply_fix(&self) -> Result<Vec<Game>> {
        let fixed = self
            .clear_cache()
            .and_then(|_| GameQuery::new(self.conn).load(true));
        match fixed {
            Ok(games) => {
                self.conn.notify(Notice::success("Fixes applied"));
                Ok(games)
            }
            Err(e) => {
                self.conn
                    .notify(Notice::error(format!("Failed to apply fixes: {}", e)));
                Err(e)
            }
        }
    }
}

fn is_success(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).unwrap_or(true)
}

fn game_count(body: Value) -> usize {
    serde_json::from_value::<GamesResponse>(body)
        .map(|r| r.games.len())
        .unwrap_or(0)
}

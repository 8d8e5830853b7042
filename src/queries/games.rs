//! Game list queries.
//!
//! The game list is fetched from `/api/dlc/games` and kept in
//! [`AppState`](crate::state::AppState); lookups and search run in memory.

use crate::connection::Connection;
use crate::error::{DlcError, Result};
use crate::models::{Game, GameDetail, GamesResponse};
use crate::notice::Notice;
use crate::request::ApiRequest;

// ---------------------------------------------------------------------------
// GameQuery
// ---------------------------------------------------------------------------

/// Query interface for installed games.
pub struct GameQuery<'a> {
    conn: &'a Connection,
}

impl<'a> GameQuery<'a> {
    /// Create a new `GameQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Fetch the installed games and replace the stored list.
    ///
    /// With `force_refresh` the backend rescans instead of answering from
    /// its own cache. On failure the stored list is cleared; a non-forced
    /// load then falls back to the local snapshot if one exists.
    pub fn load(&self, force_refresh: bool) -> Result<Vec<Game>> {
        let mut request = ApiRequest::get("/api/dlc/games");
        if force_refresh {
            request.query("refresh", "true").no_cache();
        }

        match self.conn.call_as::<GamesResponse>(&request) {
            Ok(resp) => {
                let games = resp.games;
                {
                    let mut state = self.conn.state_mut();
                    state.set_games(games.clone());
                    let verb = if force_refresh { "refreshed" } else { "loaded" };
                    state.notify(Notice::success(format!(
                        "{} games {} successfully",
                        games.len(),
                        verb
                    )));
                }
                self.conn.save_snapshot();
                Ok(games)
            }
            Err(e) => {
                {
                    let mut state = self.conn.state_mut();
                    state.set_games(Vec::new());
                    state.notify(Notice::error(format!("Failed to load games: {}", e)));
                }
                if !force_refresh {
                    match self.conn.fallback_to_snapshot() {
                        Ok(true) => self
                            .conn
                            .notify(Notice::warning("Showing games from the local cache")),
                        Ok(false) => {}
                        Err(cache_err) => {
                            tracing::warn!(error = %cache_err, "snapshot fallback failed")
                        }
                    }
                }
                Err(e)
            }
        }
    }

    /// The stored game list.
    pub fn list(&self) -> Vec<Game> {
        self.conn.state().games.clone()
    }

    /// Look up a stored game by app id.
    pub fn get(&self, appid: &str) -> Option<Game> {
        self.conn.state().game(appid).cloned()
    }

    /// Fetch one game's details from the backend.
    pub fn detail(&self, appid: &str) -> Result<Game> {
        let request = ApiRequest::get(&format!("/api/dlc/games/{}", appid.trim()));
        let detail: GameDetail = self.conn.call_as(&request).map_err(|e| match e {
            DlcError::Api(msg) => DlcError::NotFound(msg),
            other => other,
        })?;
        Ok(detail.game)
    }

    /// Case-insensitive search over stored games.
    ///
    /// A game matches when the query is found in its name, its app id, its
    /// install path, or the name or description of one of its reconciled
    /// DLCs. An empty query returns every game.
    pub fn search(&self, query: &str) -> Vec<Game> {
        let query = query.trim().to_lowercase();
        let state = self.conn.state();
        if query.is_empty() {
            return state.games.clone();
        }

        state
            .games
            .iter()
            .filter(|game| {
                let contains = |s: Option<&str>| {
                    s.map(|s| s.to_lowercase().contains(&query))
                        .unwrap_or(false)
                };
                if contains(game.name.as_deref())
                    || game.appid.contains(&query)
                    || contains(game.install_path.as_deref())
                {
                    return true;
                }
                state
                    .dlcs
                    .get(&game.appid)
                    .map(|r| {
                        r.validated_dlcs.iter().any(|d| {
                            contains(Some(d.name.as_str()))
                                || contains(Some(d.description.as_str()))
                        })
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Number of stored games.
    pub fn count(&self) -> usize {
        self.conn.state().games.len()
    }
}

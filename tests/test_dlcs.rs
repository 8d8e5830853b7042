//! DLC listing, selection, installation, removal and validation through
//! the manager.

mod common;

use serde_json::json;
use steam_dlc_sdk::{DlcError, Method, Severity};

use common::{dlc_list_after_install_body, games_body, manager, seeded_backend, FakeBackend};

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[test]
fn list_reconciles_and_updates_stats() {
    let backend = seeded_backend();
    let (m, _tmp) = manager(&backend);
    m.games().load(false).unwrap();

    let r = m.dlcs().list("100").unwrap();
    let ids: Vec<&str> = r.validated_dlcs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["101", "102"]);
    assert_eq!(r.installed_ids, vec!["101"]);
    assert_eq!(r.invalid_count, 2);

    let d = &r.validated_dlcs[0];
    assert_eq!(d.description, "More story");
    assert_eq!(d.price, "$4.99");
    assert_eq!(r.validated_dlcs[1].discount_percent, 25);

    let stats = m.stats();
    assert_eq!(stats.total_games, 2);
    assert_eq!(stats.games_with_dlc, 1);
    assert_eq!(stats.available_dlcs, 2);
    assert_eq!(stats.installed_dlcs, 1);
    assert_eq!(stats.invalid_dlcs, 2);
}

#[test]
fn list_failure_reports_error_notice() {
    let backend = seeded_backend();
    backend.on(
        Method::Get,
        "/api/dlc/300/list",
        json!({"success": false, "error": "Game not found"}),
    );
    let (m, _tmp) = manager(&backend);

    let err = m.dlcs().list("300").unwrap_err();
    assert!(matches!(err, DlcError::Api(ref msg) if msg == "Game not found"));
    let notice = m.last_notice().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.message.contains("Game not found"));
    assert!(m.dlcs().cached("300").is_none());
}

#[test]
fn refresh_bypasses_backend_cache() {
    let backend = seeded_backend();
    let (m, _tmp) = manager(&backend);
    m.dlcs().refresh("100").unwrap();

    let sent = backend.requests_to("/api/dlc/100/list");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query_value("refresh"), Some("true"));
    assert!(sent[0].query_value("nocache").is_some());
    assert_eq!(
        m.last_notice().unwrap().message,
        "DLCs refreshed for game 100"
    );
}

#[test]
fn sorted_puts_installed_first() {
    let backend = seeded_backend();
    let (m, _tmp) = manager(&backend);
    m.dlcs().list("100").unwrap();

    let names: Vec<String> = m.dlcs().sorted("100").into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Chapter 2", "Arena Mode"]);
    assert!(m.dlcs().sorted("999").is_empty());
}

#[test]
fn info_looks_up_stored_record() {
    let backend = seeded_backend();
    let (m, _tmp) = manager(&backend);
    m.dlcs().list("100").unwrap();

    assert_eq!(m.dlcs().info("100", "102").unwrap().name, "Arena Mode");
    assert!(matches!(
        m.dlcs().info("100", "103"),
        Err(DlcError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Installation
// ---------------------------------------------------------------------------

#[test]
fn install_selected_clears_selection_and_reloads() {
    let backend = seeded_backend();
    backend
        .on(Method::Get, "/api/dlc/100/list", dlc_list_after_install_body())
        .on(
            Method::Post,
            "/api/dlc/100/install",
            json!({"success": true, "installed": 1, "dlcs_added": ["102"]}),
        );
    let (m, _tmp) = manager(&backend);
    m.games().load(false).unwrap();
    m.dlcs().list("100").unwrap();

    assert!(m.dlcs().toggle_install("100", "102"));
    let outcome = m.dlcs().install_selected("100").unwrap();
    assert_eq!(outcome.installed, 1);
    assert_eq!(outcome.dlcs_added, vec!["102"]);

    let posted = backend.requests_to("/api/dlc/100/install");
    assert_eq!(posted[0].body().unwrap(), &json!({"dlc_ids": ["102"]}));

    assert!(m.selection().install_ids("100").is_empty());
    assert!(m.dlcs().cached("100").unwrap().is_installed("102"));
    assert_eq!(m.stats().installed_dlcs, 2);
    assert_eq!(
        m.last_notice().unwrap().message,
        "1 DLC(s) installed for game 100"
    );
}

#[test]
fn install_failure_keeps_selection() {
    let backend = seeded_backend();
    backend.on(
        Method::Post,
        "/api/dlc/100/install",
        json!({"success": false, "error": "Failed to write configuration"}),
    );
    let (m, _tmp) = manager(&backend);
    m.dlcs().list("100").unwrap();
    m.dlcs().toggle_install("100", "102");

    let err = m.dlcs().install_selected("100").unwrap_err();
    assert!(matches!(err, DlcError::Api(_)));
    assert_eq!(m.selection().install_ids("100"), ["102"]);
    assert_eq!(m.last_notice().unwrap().severity, Severity::Error);
}

#[test]
fn install_without_selection_is_rejected_locally() {
    let backend = seeded_backend();
    let (m, _tmp) = manager(&backend);

    let err = m.dlcs().install_selected("100").unwrap_err();
    assert!(matches!(err, DlcError::InvalidArgument(_)));
    assert!(backend.requests_to("/api/dlc/100/install").is_empty());
}

#[test]
fn install_single_ignores_selection() {
    let backend = seeded_backend();
    backend.on(
        Method::Post,
        "/api/dlc/100/install",
        json!({"success": true, "installed": 1}),
    );
    let (m, _tmp) = manager(&backend);
    m.dlcs().toggle_install("100", "102");
    m.dlcs().toggle_install("100", "104");

    m.dlcs().install_single("100", "102").unwrap();
    let posted = backend.requests_to("/api/dlc/100/install");
    assert_eq!(posted[0].body().unwrap(), &json!({"dlc_ids": ["102"]}));
    assert_eq!(m.selection().install_ids("100"), ["104"]);
}

// ---------------------------------------------------------------------------
// Removal
// ---------------------------------------------------------------------------

#[test]
fn uninstall_selected_sends_selected_ids() {
    let backend = seeded_backend();
    backend.on(
        Method::Post,
        "/api/dlc/100/uninstall",
        json!({"success": true, "removed": 1, "dlcs_removed": [101]}),
    );
    let (m, _tmp) = manager(&backend);
    m.dlcs().list("100").unwrap();
    m.dlcs().toggle_remove("100", "101");

    let outcome = m.dlcs().uninstall_selected("100").unwrap();
    assert_eq!(outcome.removed, 1);
    assert_eq!(outcome.dlcs_removed, vec!["101"]);
    assert!(m.selection().remove_ids("100").is_empty());
}

#[test]
fn remove_single_drops_only_that_id() {
    let backend = seeded_backend();
    backend.on(
        Method::Post,
        "/api/dlc/100/uninstall",
        json!({"success": true, "removed": 1}),
    );
    let (m, _tmp) = manager(&backend);
    m.dlcs().toggle_remove("100", "101");
    m.dlcs().toggle_remove("100", "102");

    m.dlcs().remove_single("100", "101").unwrap();
    let posted = backend.requests_to("/api/dlc/100/uninstall");
    assert_eq!(posted[0].body().unwrap(), &json!({"dlc_ids": ["101"]}));
    assert_eq!(m.selection().remove_ids("100"), ["102"]);
    assert_eq!(m.last_notice().unwrap().message, "DLC 101 removed");
}

#[test]
fn uninstall_all_sends_empty_id_list() {
    let backend = seeded_backend();
    backend.on(
        Method::Post,
        "/api/dlc/100/uninstall",
        json!({"success": true, "removed": 1}),
    );
    let (m, _tmp) = manager(&backend);
    m.dlcs().toggle_remove("100", "101");

    m.dlcs().uninstall_all("100").unwrap();
    let posted = backend.requests_to("/api/dlc/100/uninstall");
    assert_eq!(posted[0].body().unwrap(), &json!({"dlc_ids": []}));
    assert!(m.selection().remove_ids("100").is_empty());
    assert_eq!(
        m.last_notice().unwrap().message,
        "1 DLC(s) removed from game 100"
    );
}

// ---------------------------------------------------------------------------
// Bulk selection
// ---------------------------------------------------------------------------

#[test]
fn select_all_picks_every_available_dlc() {
    let backend = seeded_backend();
    let (m, _tmp) = manager(&backend);
    m.games().load(false).unwrap();
    m.dlcs().list("100").unwrap();
    m.dlcs().list("200").unwrap();

    assert_eq!(m.dlcs().select_all(), 1);
    assert_eq!(m.selection().install_ids("100"), ["102"]);
    assert_eq!(m.dlcs().select_all(), 0);
    assert_eq!(
        m.last_notice().unwrap().message,
        "All DLCs are already selected"
    );

    assert_eq!(m.dlcs().deselect_all(), 1);
    assert_eq!(m.selection().total_to_install(), 0);
}

// ---------------------------------------------------------------------------
// Validation and summary
// ---------------------------------------------------------------------------

#[test]
fn validate_marks_game() {
    let backend = seeded_backend();
    backend.on(
        Method::Get,
        "/api/dlc/100/validate",
        json!({
            "success": true,
            "appid": 100,
            "total_raw": 4,
            "total_valid": 2,
            "installed_count": 1,
            "validated": true,
            "timestamp": 1700000000.5
        }),
    );
    let (m, _tmp) = manager(&backend);
    m.games().load(false).unwrap();

    let report = m.dlcs().validate("100").unwrap();
    assert_eq!(report.appid, "100");
    assert_eq!(report.total_valid, 2);
    assert_eq!(m.games().get("100").unwrap().data_validated, Some(true));
    assert!(m.dlcs().cached("100").is_some());
    assert_eq!(
        m.last_notice().unwrap().message,
        "Game 100 validated: 2 valid DLCs found"
    );
}

#[test]
fn failed_validation_marks_game_invalid() {
    let backend = seeded_backend();
    backend.down(Method::Get, "/api/dlc/100/validate", "connection refused");
    let (m, _tmp) = manager(&backend);
    m.games().load(false).unwrap();

    assert!(m.dlcs().validate("100").is_err());
    assert_eq!(m.games().get("100").unwrap().data_validated, Some(false));
}

#[test]
fn validation_survives_failed_reload() {
    let backend = FakeBackend::new();
    backend
        .on(Method::Get, "/api/dlc/games", games_body())
        .on(
            Method::Get,
            "/api/dlc/100/validate",
            json!({"success": true, "appid": 100, "total_valid": 2, "validated": true}),
        )
        .down(Method::Get, "/api/dlc/100/list", "connection reset");
    let (m, _tmp) = manager(&backend);
    m.games().load(false).unwrap();

    let report = m.dlcs().validate("100").unwrap();
    assert_eq!(report.total_valid, 2);
    assert_eq!(m.games().get("100").unwrap().data_validated, Some(true));
    assert_eq!(backend.requests_to("/api/dlc/100/list").len(), 1);
}

#[test]
fn summary_parses_counts() {
    let backend = seeded_backend();
    backend.on(
        Method::Get,
        "/api/dlc/100/summary",
        json!({
            "success": true,
            "game": {"appid": "100", "name": "Space Colony"},
            "available_dlcs": 2,
            "installed_dlcs": 1,
            "validated_count": 2,
            "dlcs": [],
            "installed_dlc_ids": ["101"]
        }),
    );
    let (m, _tmp) = manager(&backend);

    let summary = m.dlcs().summary("100").unwrap();
    assert_eq!(summary.game.unwrap().display_name(), "Space Colony");
    assert_eq!(summary.available_dlcs, 2);
    assert_eq!(summary.installed_dlcs, 1);
    let sent = backend.requests_to("/api/dlc/100/summary");
    assert!(sent[0].query_value("nocache").is_some());
}

#[test]
fn toggles_are_persisted() {
    let backend = seeded_backend();
    let (m, tmp) = manager(&backend);
    m.dlcs().toggle_install("100", "102");

    let raw = std::fs::read_to_string(tmp.path().join("dlc_manager_cache.json")).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot["selected_dlcs"]["100"], json!(["102"]));
}

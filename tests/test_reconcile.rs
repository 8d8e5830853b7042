//! Reconciliation of raw DLC lists: validation, de-duplication, keyword
//! exclusion and installed-id filtering.

use serde_json::{json, Value};
use steam_dlc_sdk::reconcile::{
    is_excluded, is_numeric_id, reconcile, reconcile_response, sort_for_display,
    sorted_for_display,
};

fn arr(v: Value) -> Vec<Value> {
    v.as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

#[test]
fn duplicate_malformed_and_excluded_entries_are_counted_invalid() {
    let raw = arr(json!([
        {"id": "10", "name": "Chapter 2"},
        {"id": "10", "name": "Chapter 2 dup"},
        {"appid": "abc", "name": "bad id"},
        {"id": "20", "name": "Artbook"}
    ]));
    let installed = arr(json!(["10", "20", "99"]));

    let r = reconcile(&raw, &installed);

    assert_eq!(r.validated_dlcs.len(), 1);
    assert_eq!(r.validated_dlcs[0].id, "10");
    assert_eq!(r.validated_dlcs[0].name, "Chapter 2");
    assert_eq!(r.total_raw, 4);
    assert_eq!(r.total_valid, 1);
    assert_eq!(r.invalid_count, 3);
    assert_eq!(r.installed_ids, vec!["10"]);
    assert_eq!(r.installed_count, 1);
}

#[test]
fn empty_input_yields_empty_result() {
    let r = reconcile(&[], &[]);
    assert!(r.validated_dlcs.is_empty());
    assert!(r.installed_ids.is_empty());
    assert_eq!(r.total_raw, 0);
    assert_eq!(r.total_valid, 0);
    assert_eq!(r.invalid_count, 0);
    assert_eq!(r.installed_count, 0);
}

#[test]
fn soundtrack_is_excluded_but_chapter_is_kept() {
    let raw = arr(json!([
        {"id": "1", "name": "Awesome Game Soundtrack"},
        {"id": "2", "name": "Awesome Game: Chapter 2"}
    ]));
    let r = reconcile(&raw, &[]);
    assert_eq!(r.validated_dlcs.len(), 1);
    assert_eq!(r.validated_dlcs[0].name, "Awesome Game: Chapter 2");
    assert_eq!(r.invalid_count, 1);
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

fn messy_input() -> (Vec<Value>, Vec<Value>) {
    let raw = arr(json!([
        {"id": 5, "name": "Winter Map"},
        {"id": "5", "name": "Winter Map again"},
        {"id": " 6 ", "name": "Desert Map"},
        {"id": "", "appid": "7", "name": "Night Mode"},
        {"id": null, "appid": 8},
        {"id": "9a", "name": "Letters"},
        {"id": "-3", "name": "Negative"},
        {"id": "11", "name": "Deluxe Edition Upgrade"},
        {"id": "12", "name": "Season Pass"},
        {"name": "No id at all"},
        {"id": "11", "name": "Repeat of excluded"},
        {"id": 13.5, "name": "Float id"},
        {"id": "14", "name": "Co-op Campaign"}
    ]));
    let installed = arr(json!([5, "6", "7", "7", "11", "abc", null, "14 ", "100"]));
    (raw, installed)
}

#[test]
fn valid_plus_invalid_equals_raw() {
    let (raw, installed) = messy_input();
    let r = reconcile(&raw, &installed);
    assert_eq!(r.total_valid + r.invalid_count, r.total_raw);
    assert_eq!(r.total_raw, raw.len());
}

#[test]
fn validated_ids_are_unique() {
    let (raw, installed) = messy_input();
    let r = reconcile(&raw, &installed);
    let mut ids: Vec<&str> = r.validated_dlcs.iter().map(|d| d.id.as_str()).collect();
    let before = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), before);
}

#[test]
fn installed_ids_are_subset_of_validated() {
    let (raw, installed) = messy_input();
    let r = reconcile(&raw, &installed);
    for id in &r.installed_ids {
        assert!(r.validated_dlcs.iter().any(|d| &d.id == id), "{id} not validated");
    }
    assert_eq!(r.installed_count, r.installed_ids.len());
}

#[test]
fn messy_input_keeps_expected_records_in_order() {
    let (raw, installed) = messy_input();
    let r = reconcile(&raw, &installed);
    let ids: Vec<&str> = r.validated_dlcs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["5", "6", "7", "8", "14"]);
    assert_eq!(r.installed_ids, vec!["5", "6", "7"]);
}

#[test]
fn reconciliation_is_idempotent() {
    let (raw, installed) = messy_input();
    let first = reconcile(&raw, &installed);
    let second = reconcile(&raw, &installed);
    assert_eq!(first, second);
}

#[test]
fn every_validated_record_is_marked_and_named() {
    let (raw, installed) = messy_input();
    let r = reconcile(&raw, &installed);
    for d in &r.validated_dlcs {
        assert!(d.validated);
        assert!(!d.name.is_empty());
        assert!(is_numeric_id(&d.id));
        assert!(!is_excluded(&d.name));
        assert_eq!(d.id, d.appid);
    }
}

// ---------------------------------------------------------------------------
// Field defaults
// ---------------------------------------------------------------------------

#[test]
fn missing_fields_get_defaults() {
    let raw = arr(json!([{"appid": 42}]));
    let r = reconcile(&raw, &[]);
    let d = &r.validated_dlcs[0];
    assert_eq!(d.id, "42");
    assert_eq!(d.name, "DLC 42");
    assert_eq!(d.description, "No description available");
    assert_eq!(d.type_field, "dlc");
    assert_eq!(d.price, "N/A");
    assert_eq!(d.original_price, "N/A");
    assert_eq!(d.discount_percent, 0);
    assert!(!d.is_free);
    assert_eq!(d.release_date, "");
    assert!(!d.coming_soon);
    assert_eq!(d.header_image, "");
    assert_eq!(d.capsule_image, "");
}

#[test]
fn fallback_fields_are_used_in_order() {
    let raw = arr(json!([
        {
            "id": "1",
            "name": "Chapter 3",
            "short_description": "Short text",
            "final_formatted": "R$ 9,99",
            "initial_formatted": "R$ 19,99",
            "discount_percent": "50",
            "is_free": false,
            "coming_soon": true,
            "release_date": "12 Mar, 2024",
            "type": "music"
        },
        {
            "id": "2",
            "name": "Chapter 4",
            "description": "",
            "short_description": "",
            "price": "",
            "final_formatted": "$1.99",
            "is_free": true
        }
    ]));
    let r = reconcile(&raw, &[]);

    let a = &r.validated_dlcs[0];
    assert_eq!(a.description, "Short text");
    assert_eq!(a.price, "R$ 9,99");
    assert_eq!(a.original_price, "R$ 19,99");
    assert_eq!(a.discount_percent, 50);
    assert!(a.coming_soon);
    assert_eq!(a.release_date, "12 Mar, 2024");
    assert_eq!(a.type_field, "music");

    let b = &r.validated_dlcs[1];
    assert_eq!(b.description, "No description available");
    assert_eq!(b.price, "$1.99");
    assert!(b.is_free);
}

#[test]
fn empty_name_falls_back_to_id() {
    let raw = arr(json!([{"id": "77", "name": ""}]));
    let r = reconcile(&raw, &[]);
    assert_eq!(r.validated_dlcs[0].name, "DLC 77");
}

// ---------------------------------------------------------------------------
// Keyword filter
// ---------------------------------------------------------------------------

#[test]
fn keyword_match_is_case_insensitive_substring() {
    assert!(is_excluded("OFFICIAL SOUNDTRACK"));
    assert!(is_excluded("Digital Artbook"));
    assert!(is_excluded("Starter Bundle"));
    assert!(is_excluded("Weapon Pack"));
    assert!(is_excluded("Collector's Edition Content"));
    assert!(is_excluded("Pre-Order Bonus"));
    assert!(is_excluded("The OST"));
    assert!(!is_excluded("Chapter 2"));
    assert!(!is_excluded("Arena Mode"));
}

#[test]
fn numeric_id_check() {
    assert!(is_numeric_id("0"));
    assert!(is_numeric_id("1234567"));
    assert!(!is_numeric_id(""));
    assert!(!is_numeric_id(" 1"));
    assert!(!is_numeric_id("1.5"));
    assert!(!is_numeric_id("-1"));
    assert!(!is_numeric_id("١٢"));
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[test]
fn response_accepts_alternate_keys() {
    let body = json!({
        "success": true,
        "available_dlcs": [{"id": "1", "name": "Chapter 2"}],
        "installed_dlcs": [1]
    });
    let r = reconcile_response(&body);
    assert_eq!(r.total_valid, 1);
    assert_eq!(r.installed_ids, vec!["1"]);
}

#[test]
fn response_without_lists_is_empty() {
    let r = reconcile_response(&json!({"success": true}));
    assert_eq!(r.total_raw, 0);
    assert!(r.installed_ids.is_empty());
}

// ---------------------------------------------------------------------------
// Display ordering
// ---------------------------------------------------------------------------

#[test]
fn installed_first_then_alphabetical() {
    let raw = arr(json!([
        {"id": "1", "name": "delta"},
        {"id": "2", "name": "Alpha"},
        {"id": "3", "name": "charlie"},
        {"id": "4", "name": "Bravo"}
    ]));
    let r = reconcile(&raw, &arr(json!(["3", "1"])));
    let names: Vec<String> = sorted_for_display(&r).into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["charlie", "delta", "Alpha", "Bravo"]);
}

#[test]
fn sort_is_stable_for_equal_names() {
    let raw = arr(json!([
        {"id": "1", "name": "Map"},
        {"id": "2", "name": "map"}
    ]));
    let mut dlcs = reconcile(&raw, &[]).validated_dlcs;
    sort_for_display(&mut dlcs, &[]);
    assert_eq!(dlcs[0].id, "1");
    assert_eq!(dlcs[1].id, "2");
}

#[test]
fn sort_compares_lowercase_code_points() {
    let raw = arr(json!([
        {"id": "1", "name": "Épée"},
        {"id": "2", "name": "Zeta"},
        {"id": "3", "name": "epic"}
    ]));
    let mut dlcs = reconcile(&raw, &[]).validated_dlcs;
    sort_for_display(&mut dlcs, &[]);
    let names: Vec<&str> = dlcs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["epic", "Zeta", "Épée"]);
}

// ---------------------------------------------------------------------------
// Float ids
// ---------------------------------------------------------------------------

#[test]
fn integral_float_ids_render_as_integers() {
    let raw = arr(json!([
        {"id": 10.0, "name": "Chapter 2"},
        {"appid": 11.0, "name": "Chapter 3"},
        {"id": 12.5, "name": "Half"}
    ]));
    let r = reconcile(&raw, &arr(json!([10.0])));
    let ids: Vec<&str> = r.validated_dlcs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["10", "11"]);
    assert_eq!(r.installed_ids, vec!["10"]);
    assert!(r.is_installed("10"));
    assert_eq!(r.invalid_count, 1);
}

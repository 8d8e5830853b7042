//! DLC reconciliation: turns the loosely-shaped DLC list returned by the
//! backend into a de-duplicated, consistently-shaped list plus the matching
//! set of installed ids.
//!
//! The pass never fails. Malformed ids, duplicates and entries whose name
//! matches one of [`EXCLUDED_KEYWORDS`] are dropped and counted in
//! `invalid_count`, so `total_valid + invalid_count == total_raw` always holds.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde_json::Value;

use crate::config::{DEFAULT_DLC_DESCRIPTION, EXCLUDED_KEYWORDS};
use crate::models::de::number_to_string;
use crate::models::{DlcRecord, ReconciledDlcs};

/// Reconcile a raw DLC list and a raw installed-id list.
pub fn reconcile(raw_dlcs: &[Value], raw_installed: &[Value]) -> ReconciledDlcs {
    let mut validated = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut invalid_count = 0;

    for raw in raw_dlcs {
        let id = candidate_id(raw);
        if !is_numeric_id(&id) {
            invalid_count += 1;
            continue;
        }
        // Marked before the keyword check: a repeat of an excluded id is still a duplicate.
        if !seen.insert(id.clone()) {
            invalid_count += 1;
            continue;
        }

        let record = build_record(id, raw);
        if is_valid_dlc(&record) {
            validated.push(record);
        } else {
            invalid_count += 1;
        }
    }

    let valid_ids: HashSet<&str> = validated.iter().map(|d: &DlcRecord| d.id.as_str()).collect();
    let mut installed_ids: Vec<String> = Vec::new();
    for value in raw_installed {
        let id = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => number_to_string(n),
            _ => continue,
        };
        if is_numeric_id(&id) && valid_ids.contains(id.as_str()) && !installed_ids.contains(&id) {
            installed_ids.push(id);
        }
    }

    let total_valid = validated.len();
    let installed_count = installed_ids.len();
    ReconciledDlcs {
        validated_dlcs: validated,
        installed_ids,
        total_raw: raw_dlcs.len(),
        total_valid,
        invalid_count,
        installed_count,
    }
}

/// Reconcile a full `/api/dlc/{appid}/list` response body.
///
/// Accepts either `dlcs` or `available_dlcs` for the DLC list and either
/// `installed_dlc_ids` or `installed_dlcs` for the installed ids.
pub fn reconcile_response(body: &Value) -> ReconciledDlcs {
    let raw_dlcs = first_array(body, &["dlcs", "available_dlcs"]);
    let raw_installed = first_array(body, &["installed_dlc_ids", "installed_dlcs"]);
    reconcile(raw_dlcs, raw_installed)
}

/// True when the lower-cased name contains any exclusion keyword.
pub fn is_excluded(name: &str) -> bool {
    let name = name.to_lowercase();
    EXCLUDED_KEYWORDS.iter().any(|kw| name.contains(kw))
}

/// A record is kept when it has an id and a name and is not excluded by keyword.
pub fn is_valid_dlc(dlc: &DlcRecord) -> bool {
    if dlc.id.is_empty() || dlc.name.is_empty() {
        return false;
    }
    !is_excluded(&dlc.name)
}

/// `^\d+$` over ASCII digits.
pub fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

/// Order DLCs for display: installed first, then by name ignoring case.
/// The sort is stable, so equal names keep their list order.
pub fn sort_for_display(dlcs: &mut [DlcRecord], installed_ids: &[String]) {
    let installed: HashSet<&str> = installed_ids.iter().map(String::as_str).collect();
    dlcs.sort_by(|a, b| {
        let a_inst = installed.contains(a.id.as_str());
        let b_inst = installed.contains(b.id.as_str());
        match (a_inst, b_inst) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    });
}

/// Copy of the validated list in display order.
pub fn sorted_for_display(reconciled: &ReconciledDlcs) -> Vec<DlcRecord> {
    let mut dlcs = reconciled.validated_dlcs.clone();
    sort_for_display(&mut dlcs, &reconciled.installed_ids);
    dlcs
}

// ---------------------------------------------------------------------------
// Field extraction
// ---------------------------------------------------------------------------

fn build_record(id: String, raw: &Value) -> DlcRecord {
    let name = text(raw, &["name"]).unwrap_or_else(|| format!("DLC {}", id));
    DlcRecord {
        appid: id.clone(),
        name,
        description: text(raw, &["description", "short_description"])
            .unwrap_or_else(|| DEFAULT_DLC_DESCRIPTION.to_string()),
        type_field: text(raw, &["type"]).unwrap_or_else(|| "dlc".to_string()),
        price: text(raw, &["price", "final_formatted"]).unwrap_or_else(|| "N/A".to_string()),
        original_price: text(raw, &["original_price", "initial_formatted"])
            .unwrap_or_else(|| "N/A".to_string()),
        discount_percent: truthy(raw, "discount_percent")
            .and_then(as_integer)
            .unwrap_or(0),
        is_free: truthy(raw, "is_free").is_some(),
        release_date: text(raw, &["release_date"]).unwrap_or_default(),
        coming_soon: truthy(raw, "coming_soon").is_some(),
        header_image: text(raw, &["header_image"]).unwrap_or_default(),
        capsule_image: text(raw, &["capsule_image"]).unwrap_or_default(),
        validated: true,
        id,
    }
}

/// `id`, falling back to `appid`, as a trimmed string.
fn candidate_id(raw: &Value) -> String {
    let value = truthy(raw, "id").or_else(|| truthy(raw, "appid"));
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => number_to_string(n),
        _ => String::new(),
    }
}

/// Field value unless it is absent, `null`, `false`, zero or an empty string.
fn truthy<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    let value = raw.get(key)?;
    let falsy = match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if falsy {
        None
    } else {
        Some(value)
    }
}

/// First truthy scalar among `keys`, rendered as a string.
fn text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match truthy(raw, key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_to_string(n)),
        _ => None,
    })
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

fn first_array<'a>(body: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

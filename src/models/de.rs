//! Lenient deserializers for backend fields that arrive as either strings
//! or numbers.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Render a scalar JSON value as a trimmed string. `null` becomes `""`.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => number_to_string(n),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Render a JSON number the way JavaScript's `String()` does for ids:
/// a float with no fractional part prints without the `.0`.
pub fn number_to_string(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                return (f as i64).to_string();
            }
        }
    }
    n.to_string()
}

pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

/// A list of ids where each element may be a string or a number; `null`
/// becomes an empty list.
pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(value
        .unwrap_or_default()
        .iter()
        .map(scalar_to_string)
        .filter(|s| !s.is_empty())
        .collect())
}

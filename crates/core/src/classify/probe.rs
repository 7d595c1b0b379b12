//! Field probing helpers shared by the extractor rules.
//!
//! Payloads come from several producers that agree on neither field names nor
//! nesting. Every rule is a list of aliases probed in priority order; these
//! helpers define what "found" means for each kind of rule.

use serde_json::{Map, Value};

/// Null, a blank string, an empty list or an object without keys.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Loose truthiness: null, `false`, zero and `""` are not meaningful, containers always are.
pub fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn first_non_empty<'a>(data: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find(|value| !is_empty_value(value))
}

/// First meaningful alias, else the first alias that is present and non-null.
pub fn first_meaningful_or_present<'a>(
    data: &'a Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Value> {
    let present = || {
        keys.iter()
            .filter_map(|key| data.get(*key))
            .filter(|value| !value.is_null())
    };
    present()
        .find(|value| is_meaningful(value))
        .or_else(|| present().next())
}

pub fn type_of(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

/// Strings as-is, everything else JSON-encoded.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

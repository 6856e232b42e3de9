//! Blank, truthiness and collection predicates for records

use serde_json::Value;

/// Check if a record counts as blank
///
/// Blank values are `null`, an empty mapping, an empty sequence and text that
/// is empty or whitespace only. Numbers and booleans (including `0` and
/// `false`) are never blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Check if a schema entry value is truthy
///
/// Falsy values are `null`, `false`, zero, `""`, `"0"` and empty
/// sequences or mappings. A falsy rule value is emitted as a literal instead
/// of being resolved as a path.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !(text.is_empty() || text == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Check if a record is a keyed collection of nested records
///
/// True for a non-empty mapping whose every value is itself a mapping or
/// sequence. Plain sequences are never collections.
pub fn is_collection(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            !map.is_empty()
                && map
                    .values()
                    .all(|item| matches!(item, Value::Object(_) | Value::Array(_)))
        }
        _ => false,
    }
}

//! Helpers for inspecting the free-form values held in a record's data map.
//!
//! Rule predicates receive values as [`serde_json::Value`], so the same
//! predicate works for typed records (through the binder) and for plain maps.

use serde_json::{Map, Number, Value};

/// The string-keyed data snapshot of a record.
pub type DataMap = Map<String, Value>;

/// Get the type name of a Value for error messages
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns `true` when a value counts as "not provided".
///
/// `null`, the empty string, the empty array and the empty object are empty.
/// An object is also empty when every one of its members is empty, which
/// mirrors a struct whose fields all carry zero values. Numbers and booleans
/// are never empty: `0` and `false` are real answers.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(members) => members.values().all(is_empty_value),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Returns `true` when the key is absent or its value is empty.
pub fn is_missing(value: Option<&Value>) -> bool {
    value.is_none_or(is_empty_value)
}

/// Extract f64 from Number, trying both f64 and i64 representations
#[inline]
pub fn number_as_f64(num: &Number) -> Option<f64> {
    num.as_f64()
        .or_else(|| num.as_i64().map(|i| i as f64))
        .or_else(|| num.as_u64().map(|u| u as f64))
}

/// Reads a value as a number, accepting numeric strings as form data does.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => number_as_f64(n),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Length of a value for length-style rules.
///
/// Strings count characters, arrays count elements, objects count members.
pub fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(members) => Some(members.len()),
        _ => None,
    }
}

/// Scalar text form used when comparing against rule parameters.
///
/// Returns `None` for arrays, objects and `null`.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

//! Type rules

use crate::error::{RuleResult, ValidationError};
use crate::value::{DataMap, as_number};
use serde_json::Value;

fn expect(ok: bool, code: &'static str, title: &str, what: &str) -> RuleResult {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new(code, format!("{title} must be {what}")))
    }
}

/// `boolean`: a boolean, `0`/`1`, or `"true"`/`"false"`/`"0"`/`"1"`.
pub fn boolean(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let ok = match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_u64(), Some(0 | 1)),
        Value::String(s) => matches!(s.as_str(), "true" | "false" | "0" | "1"),
        _ => false,
    };
    expect(ok, "boolean", title, "a boolean")
}

/// `number`: a number or a numeric string.
pub fn number(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    expect(as_number(value).is_some(), "number", title, "a number")
}

/// `integer`: an integral number or a string holding one.
pub fn integer(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let ok = match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i128>().is_ok(),
        _ => false,
    };
    expect(ok, "integer", title, "an integer")
}

/// `float`: any number, integral or not.
pub fn float(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    expect(as_number(value).is_some(), "float", title, "a floating point number")
}

/// `string`: a JSON string.
pub fn string(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    expect(value.is_string(), "string", title, "a string")
}

/// `array`: a JSON array.
pub fn array(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    expect(value.is_array(), "array", title, "an array")
}

//! Rules that compare a field with a sibling field

use crate::error::{RuleResult, ValidationError};
use crate::rules::invalid_param;
use crate::value::DataMap;
use serde_json::Value;

/// `same:<field>` / `confirm:<field>`: equal to the sibling's value.
pub fn same(value: &Value, param: &str, data: &DataMap, title: &str) -> RuleResult {
    let other = param.trim();
    if other.is_empty() {
        return Err(invalid_param("same", param));
    }
    if data.get(other) == Some(value) {
        return Ok(());
    }
    Err(ValidationError::new("same", format!("{title} must match {other}"))
        .with_param("other", other.to_string()))
}

/// `different:<field>`: not equal to the sibling's value.
pub fn different(value: &Value, param: &str, data: &DataMap, title: &str) -> RuleResult {
    let other = param.trim();
    if other.is_empty() {
        return Err(invalid_param("different", param));
    }
    if data.get(other) != Some(value) {
        return Ok(());
    }
    Err(ValidationError::new(
        "different",
        format!("{title} must differ from {other}"),
    )
    .with_param("other", other.to_string()))
}

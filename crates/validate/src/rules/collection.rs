//! Set membership rules

use crate::error::{RuleResult, ValidationError};
use crate::rules::param_list;
use crate::value::{DataMap, as_text};
use serde_json::Value;

fn listed(value: &Value, param: &str) -> bool {
    as_text(value).is_some_and(|text| param_list(param).any(|item| item == text))
}

/// `in:a,b,c`: the value is one of the listed items.
pub fn in_list(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if listed(value, param) {
        return Ok(());
    }
    Err(
        ValidationError::new("in", format!("{title} must be one of {param}"))
            .with_param("allowed", param.to_string()),
    )
}

/// `notIn:a,b,c`: the value is none of the listed items.
pub fn not_in(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if !listed(value, param) {
        return Ok(());
    }
    Err(
        ValidationError::new("notIn", format!("{title} must not be one of {param}"))
            .with_param("denied", param.to_string()),
    )
}

/// `arrayIn:a,b,c`: the value is an array whose every element is listed.
pub fn array_in(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let Some(items) = value.as_array() else {
        return Err(ValidationError::new(
            "arrayIn",
            format!("{title} must be an array"),
        ));
    };

    match items.iter().find(|item| !listed(item, param)) {
        None => Ok(()),
        Some(item) => Err(ValidationError::new(
            "arrayIn",
            format!("{title} may only contain items from {param}"),
        )
        .with_param("allowed", param.to_string())
        .with_param("actual", item.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_matches_text_form() {
        assert!(in_list(&json!("b"), "a,b,c", &DataMap::new(), "Kind").is_ok());
        assert!(in_list(&json!(2), "1, 2, 3", &DataMap::new(), "Kind").is_ok());
        assert!(in_list(&json!(true), "true,false", &DataMap::new(), "Kind").is_ok());

        let err = in_list(&json!("d"), "a,b,c", &DataMap::new(), "Kind").unwrap_err();
        assert_eq!(err.message, "Kind must be one of a,b,c");
        assert_eq!(err.param("allowed"), Some("a,b,c"));
    }

    #[test]
    fn test_not_in() {
        assert!(not_in(&json!("root"), "root,admin", &DataMap::new(), "User").is_err());
        assert!(not_in(&json!("alice"), "root,admin", &DataMap::new(), "User").is_ok());
    }

    #[test]
    fn test_array_in() {
        let data = DataMap::new();
        assert!(array_in(&json!([12, 23, 34]), "12,23,34", &data, "D1").is_ok());
        assert!(array_in(&json!([]), "12,23,34", &data, "D1").is_ok());

        let err = array_in(&json!([12, 99]), "12,23,34", &data, "D1").unwrap_err();
        assert_eq!(err.param("actual"), Some("99"));
        assert!(array_in(&json!(12), "12", &data, "D1").is_err());
    }
}

//! Presence rules

use crate::error::{RuleResult, ValidationError};
use crate::value::{DataMap, is_empty_value};
use serde_json::Value;

/// `required`: the value must be present and non-empty.
///
/// A chain starting with `required` is evaluated even when the field is
/// absent from the data map; the value is then `null`.
pub fn required(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if is_empty_value(value) {
        return Err(ValidationError::new("required", format!("{title} is required")));
    }
    Ok(())
}

/// `accepted`: one of `yes`, `on`, `1`, `true`.
pub fn accepted(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let ok = match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.as_str(), "yes" | "on" | "1" | "true"),
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("accepted", format!("{title} must be accepted")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(rule: fn(&Value, &str, &DataMap, &str) -> RuleResult, value: Value) -> RuleResult {
        rule(&value, "", &DataMap::new(), "Field")
    }

    #[test]
    fn test_required() {
        assert!(check(required, json!("x")).is_ok());
        assert!(check(required, json!(0)).is_ok());
        assert!(check(required, json!(false)).is_ok());

        let err = check(required, json!("")).unwrap_err();
        assert_eq!(err.code, "required");
        assert_eq!(err.message, "Field is required");
        assert!(check(required, json!(null)).is_err());
        assert!(check(required, json!([])).is_err());
    }

    #[test]
    fn test_accepted() {
        for value in [json!("yes"), json!("on"), json!(1), json!(true), json!("1")] {
            assert!(check(accepted, value).is_ok());
        }
        for value in [json!("no"), json!(0), json!(false), json!(null)] {
            assert!(check(accepted, value).is_err());
        }
    }
}

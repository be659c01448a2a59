//! Validation of a single bare value
//!
//! [`check_var`] applies one rule chain to one value outside of any record,
//! e.g. for ad hoc request parameters:
//!
//! ```
//! use nebula_validate::prelude::*;
//! use serde_json::json;
//!
//! let registry = RuleRegistry::with_builtins();
//! let messages = TextTable::from([("between", "Page size must be 1 to 100")]);
//!
//! assert!(check_var(&registry, &json!(20), "required|between:1,100", "size", &messages).is_ok());
//!
//! let err = check_var(&registry, &json!(500), "required|between:1,100", "size", &messages);
//! assert_eq!(err.unwrap_err().to_string(), "Page size must be 1 to 100");
//! ```

use crate::chain::RuleChain;
use crate::error::{CheckError, ConfigError};
use crate::record::TextTable;
use crate::registry::RuleRegistry;
use crate::value::{DataMap, is_empty_value};
use serde_json::Value;

/// Prefix of configuration errors raised by [`check_var`].
pub const STANDALONE_PREFIX: &str = "validate: ";

/// Title used when the caller passes an empty one.
const DEFAULT_TITLE: &str = "value";

/// Checks `value` against a rule chain.
///
/// Follows the same rules as a record field: a chain not starting with
/// `required` skips empty values, rules run in order and the first violation
/// is returned. `messages` overrides violation messages by rule name. Only
/// registered rules are available, and sibling-field rules see an empty map.
pub fn check_var(
    registry: &RuleRegistry,
    value: &Value,
    chain: &str,
    title: &str,
    messages: &TextTable,
) -> Result<(), CheckError> {
    let chain = RuleChain::parse(chain);
    if !chain.is_required() && is_empty_value(value) {
        return Ok(());
    }

    let title = if title.is_empty() { DEFAULT_TITLE } else { title };
    let data = DataMap::new();

    for item in chain.items() {
        let Some(rule) = registry.lookup(&item.name) else {
            tracing::warn!(rule = %item.name, "Standalone check uses an undefined rule");
            return Err(CheckError::config(
                STANDALONE_PREFIX,
                ConfigError::undefined_rule(title, item.name.as_str()),
            ));
        };

        if let Err(violation) = rule.check(value, &item.param, &data, title) {
            let violation = match messages.get(&item.name) {
                Some(message) => violation.with_message(message.to_string()),
                None => violation,
            };
            return Err(violation.into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(value: Value, chain: &str) -> Result<(), CheckError> {
        check_var(
            &RuleRegistry::with_builtins(),
            &value,
            chain,
            "",
            &TextTable::new(),
        )
    }

    #[test]
    fn test_optional_empty_value_passes() {
        assert!(check(json!(""), "email").is_ok());
        assert!(check(Value::Null, "between:1,2").is_ok());
    }

    #[test]
    fn test_required_empty_value_fails() {
        let err = check(json!(""), "required|email").unwrap_err();
        let violation = err.as_violation().unwrap();
        assert_eq!(violation.code, "required");
        assert_eq!(violation.message, "value is required");
    }

    #[test]
    fn test_undefined_rule_uses_standalone_prefix() {
        let err = check(json!("x"), "required|shouting").unwrap_err();
        assert!(err.is_config());
        assert_eq!(err.system_prefix(), Some(STANDALONE_PREFIX));
        assert!(err.to_string().starts_with("validate: rule `shouting`"));
    }

    #[test]
    fn test_message_override_by_rule_name() {
        let messages = TextTable::from([("email", "Bad address")]);
        let err = check_var(
            &RuleRegistry::with_builtins(),
            &json!("nope"),
            "email",
            "Email",
            &messages,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Bad address");
    }
}

//! Built-in rule predicates
//!
//! Every predicate has the registry signature `(value, param, data, title)`
//! and is registered by [`RuleRegistry::with_builtins`]. Names follow the
//! camelCase convention used in rule chains, e.g. `alphaNum`, `notIn`.
//!
//! Parameters are plain strings; list parameters are comma separated
//! (`in:a,b,c`, `between:18,65`). A malformed parameter is reported as a
//! violation whose `param` entry holds the offending text.

pub mod charset;
pub mod collection;
pub mod date;
pub mod field;
pub mod format;
pub mod numeric;
pub mod presence;
pub mod types;

use crate::error::ValidationError;
use crate::registry::RuleRegistry;

/// Registers every built-in rule.
pub(crate) fn register_builtins(registry: &mut RuleRegistry) {
    // Presence
    registry.insert_builtin("required", presence::required);
    registry.insert_builtin("accepted", presence::accepted);

    // Types
    registry.insert_builtin("boolean", types::boolean);
    registry.insert_builtin("number", types::number);
    registry.insert_builtin("integer", types::integer);
    registry.insert_builtin("float", types::float);
    registry.insert_builtin("string", types::string);
    registry.insert_builtin("array", types::array);

    // Character sets
    registry.insert_builtin("alpha", charset::alpha);
    registry.insert_builtin("alphaNum", charset::alpha_num);
    registry.insert_builtin("alphaDash", charset::alpha_dash);
    registry.insert_builtin("chs", charset::chs);
    registry.insert_builtin("chsAlpha", charset::chs_alpha);
    registry.insert_builtin("chsAlphaNum", charset::chs_alpha_num);
    registry.insert_builtin("chsDash", charset::chs_dash);
    registry.insert_builtin("chsDashChar", charset::chs_dash_char);

    // Formats
    registry.insert_builtin("email", format::email);
    registry.insert_builtin("url", format::url);
    registry.insert_builtin("mobile", format::mobile);
    registry.insert_builtin("regex", format::regex);

    // Sets
    registry.insert_builtin("in", collection::in_list);
    registry.insert_builtin("notIn", collection::not_in);
    registry.insert_builtin("arrayIn", collection::array_in);

    // Numbers and lengths
    registry.insert_builtin("between", numeric::between);
    registry.insert_builtin("notBetween", numeric::not_between);
    registry.insert_builtin("gt", numeric::gt);
    registry.insert_builtin("egt", numeric::egt);
    registry.insert_builtin("lt", numeric::lt);
    registry.insert_builtin("elt", numeric::elt);
    registry.insert_builtin("eq", numeric::eq);
    registry.insert_builtin("length", numeric::length);
    registry.insert_builtin("min", numeric::min);
    registry.insert_builtin("max", numeric::max);

    // Dates
    registry.insert_builtin("date", date::date);
    registry.insert_builtin("dateFormat", date::date_format);
    registry.insert_builtin("before", date::before);
    registry.insert_builtin("after", date::after);

    // Sibling fields
    registry.insert_builtin("same", field::same);
    registry.insert_builtin("confirm", field::same);
    registry.insert_builtin("different", field::different);
}

/// Error for a rule parameter the rule cannot interpret.
pub(crate) fn invalid_param(rule: &'static str, param: &str) -> ValidationError {
    ValidationError::new(rule, format!("rule `{rule}` has an invalid parameter `{param}`"))
        .with_param("param", param.to_string())
}

/// Splits a comma separated parameter into trimmed items.
pub(crate) fn param_list(param: &str) -> impl Iterator<Item = &str> {
    param.split(',').map(str::trim)
}

/// Parses a single numeric bound.
pub(crate) fn parse_bound(rule: &'static str, param: &str) -> Result<f64, ValidationError> {
    param
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|bound| bound.is_finite())
        .ok_or_else(|| invalid_param(rule, param))
}

/// Parses a `lo,hi` pair of numeric bounds.
pub(crate) fn parse_bounds(rule: &'static str, param: &str) -> Result<(f64, f64), ValidationError> {
    match param.split_once(',') {
        Some((lo, hi)) => Ok((parse_bound(rule, lo)?, parse_bound(rule, hi)?)),
        None => Err(invalid_param(rule, param)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_list_trims() {
        let items: Vec<&str> = param_list(" a, b ,c").collect();
        assert_eq!(items, ["a", "b", "c"]);
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(parse_bounds("between", "18,65"), Ok((18.0, 65.0)));
        assert_eq!(parse_bounds("between", " 1.5 , 2 "), Ok((1.5, 2.0)));

        let err = parse_bounds("between", "18").unwrap_err();
        assert_eq!(err.code, "between");
        assert_eq!(err.param("param"), Some("18"));

        assert!(parse_bounds("between", "a,b").is_err());
    }
}

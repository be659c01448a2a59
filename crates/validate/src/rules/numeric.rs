//! Numeric comparison and length rules
//!
//! `between`, `notBetween`, `gt`, `egt`, `lt` and `elt` compare numbers and
//! numeric strings. `length`, `min` and `max` measure strings (characters),
//! arrays and objects; `min` and `max` compare numbers by value.

use crate::error::{RuleResult, ValidationError};
use crate::rules::{invalid_param, parse_bound, parse_bounds};
use crate::value::{DataMap, as_number, as_text, length_of};
use serde_json::Value;

fn number_of(code: &'static str, value: &Value, title: &str) -> Result<f64, ValidationError> {
    as_number(value)
        .ok_or_else(|| ValidationError::new(code, format!("{title} must be a number")))
}

/// `between:lo,hi`: `lo <= value <= hi`.
pub fn between(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let (lo, hi) = parse_bounds("between", param)?;
    let actual = number_of("between", value, title)?;
    if actual >= lo && actual <= hi {
        return Ok(());
    }
    Err(
        ValidationError::new("between", format!("{title} must be between {lo} and {hi}"))
            .with_param("min", lo.to_string())
            .with_param("max", hi.to_string()),
    )
}

/// `notBetween:lo,hi`: the value lies outside `[lo, hi]`.
pub fn not_between(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let (lo, hi) = parse_bounds("notBetween", param)?;
    let actual = number_of("notBetween", value, title)?;
    if actual < lo || actual > hi {
        return Ok(());
    }
    Err(ValidationError::new(
        "notBetween",
        format!("{title} must not be between {lo} and {hi}"),
    )
    .with_param("min", lo.to_string())
    .with_param("max", hi.to_string()))
}

fn compare(
    code: &'static str,
    relation: &str,
    holds: fn(f64, f64) -> bool,
    value: &Value,
    param: &str,
    title: &str,
) -> RuleResult {
    let bound = parse_bound(code, param)?;
    let actual = number_of(code, value, title)?;
    if holds(actual, bound) {
        return Ok(());
    }
    Err(
        ValidationError::new(code, format!("{title} must be {relation} {bound}"))
            .with_param("bound", bound.to_string()),
    )
}

/// `gt:n`: value > n.
pub fn gt(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    compare("gt", "greater than", |a, b| a > b, value, param, title)
}

/// `egt:n`: value >= n.
pub fn egt(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    compare("egt", "at least", |a, b| a >= b, value, param, title)
}

/// `lt:n`: value < n.
pub fn lt(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    compare("lt", "less than", |a, b| a < b, value, param, title)
}

/// `elt:n`: value <= n.
pub fn elt(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    compare("elt", "at most", |a, b| a <= b, value, param, title)
}

/// `eq:x`: the text form of the value equals `x`.
pub fn eq(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if as_text(value).is_some_and(|text| text == param) {
        return Ok(());
    }
    Err(ValidationError::new("eq", format!("{title} must equal {param}"))
        .with_param("expected", param.to_string()))
}

fn measure(code: &'static str, value: &Value, title: &str) -> Result<usize, ValidationError> {
    length_of(value).ok_or_else(|| {
        ValidationError::new(code, format!("{title} must be a string or a collection"))
    })
}

fn parse_len(code: &'static str, param: &str) -> Result<usize, ValidationError> {
    param
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid_param(code, param))
}

/// `length:n` or `length:lo,hi`: exact length or inclusive length range.
pub fn length(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let (lo, hi) = match param.split_once(',') {
        Some((lo, hi)) => (parse_len("length", lo)?, parse_len("length", hi)?),
        None => {
            let exact = parse_len("length", param)?;
            (exact, exact)
        }
    };
    let actual = measure("length", value, title)?;
    if (lo..=hi).contains(&actual) {
        return Ok(());
    }

    let message = if lo == hi {
        format!("{title} length must be {lo}")
    } else {
        format!("{title} length must be between {lo} and {hi}")
    };
    Err(ValidationError::new("length", message)
        .with_param("min", lo.to_string())
        .with_param("max", hi.to_string())
        .with_param("actual", actual.to_string()))
}

/// `min:n`: at least `n` (numbers) or at least `n` long (everything else).
pub fn min(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if let Value::Number(_) = value {
        return compare("min", "at least", |a, b| a >= b, value, param, title);
    }
    let bound = parse_len("min", param)?;
    let actual = measure("min", value, title)?;
    if actual >= bound {
        return Ok(());
    }
    Err(ValidationError::new(
        "min",
        format!("{title} must be at least {bound} long"),
    )
    .with_param("bound", bound.to_string())
    .with_param("actual", actual.to_string()))
}

/// `max:n`: at most `n` (numbers) or at most `n` long (everything else).
pub fn max(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if let Value::Number(_) = value {
        return compare("max", "at most", |a, b| a <= b, value, param, title);
    }
    let bound = parse_len("max", param)?;
    let actual = measure("max", value, title)?;
    if actual <= bound {
        return Ok(());
    }
    Err(ValidationError::new(
        "max",
        format!("{title} must be at most {bound} long"),
    )
    .with_param("bound", bound.to_string())
    .with_param("actual", actual.to_string()))
}

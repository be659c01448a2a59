//! Date rules

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{RuleResult, ValidationError};
use crate::rules::invalid_param;
use crate::value::DataMap;
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses the date shapes accepted by the date rules.
///
/// RFC 3339 timestamps are normalised to UTC; date-only strings are taken
/// at midnight.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn date_of(code: &'static str, value: &Value, title: &str) -> Result<NaiveDateTime, ValidationError> {
    value
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| ValidationError::new(code, format!("{title} must be a valid date")))
}

/// Resolves a date parameter: a literal date, or the key of a sibling field.
fn bound_of(code: &'static str, param: &str, data: &DataMap) -> Result<NaiveDateTime, ValidationError> {
    parse_date(param)
        .or_else(|| data.get(param.trim()).and_then(Value::as_str).and_then(parse_date))
        .ok_or_else(|| invalid_param(code, param))
}

/// `date`: a parseable date or date-time string.
pub fn date(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    date_of("date", value, title).map(|_| ())
}

/// `dateFormat:<fmt>`: a string matching a chrono format exactly.
pub fn date_format(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let ok = value.as_str().is_some_and(|text| {
        NaiveDateTime::parse_from_str(text, param).is_ok()
            || NaiveDate::parse_from_str(text, param).is_ok()
            || NaiveTime::parse_from_str(text, param).is_ok()
    });
    if ok {
        return Ok(());
    }
    Err(ValidationError::new(
        "dateFormat",
        format!("{title} must match the date format {param}"),
    )
    .with_param("format", param.to_string()))
}

/// `before:<date|field>`: strictly earlier than the bound.
pub fn before(value: &Value, param: &str, data: &DataMap, title: &str) -> RuleResult {
    let bound = bound_of("before", param, data)?;
    if date_of("before", value, title)? < bound {
        return Ok(());
    }
    Err(ValidationError::new("before", format!("{title} must be before {param}"))
        .with_param("bound", param.to_string()))
}

/// `after:<date|field>`: strictly later than the bound.
pub fn after(value: &Value, param: &str, data: &DataMap, title: &str) -> RuleResult {
    let bound = bound_of("after", param, data)?;
    if date_of("after", value, title)? > bound {
        return Ok(());
    }
    Err(ValidationError::new("after", format!("{title} must be after {param}"))
        .with_param("bound", param.to_string()))
}

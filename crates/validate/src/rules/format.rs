//! Format rules

use std::sync::LazyLock;

use crate::error::{RuleResult, ValidationError};
use crate::rules::invalid_param;
use crate::value::{DataMap, as_text};
use regex::Regex;
use serde_json::Value;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap()
});

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

// Mainland China mobile numbers.
static MOBILE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").unwrap());

fn text_matches(pattern: &Regex, value: &Value) -> bool {
    as_text(value).is_some_and(|text| pattern.is_match(&text))
}

/// `email`: an e-mail address.
pub fn email(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if text_matches(&EMAIL_REGEX, value) {
        return Ok(());
    }
    Err(ValidationError::new(
        "email",
        format!("{title} must be a valid email address"),
    ))
}

/// `url`: an http(s) URL.
pub fn url(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if text_matches(&URL_REGEX, value) {
        return Ok(());
    }
    Err(ValidationError::new("url", format!("{title} must be a valid URL")))
}

/// `mobile`: an 11-digit mobile phone number.
pub fn mobile(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    if text_matches(&MOBILE_REGEX, value) {
        return Ok(());
    }
    Err(ValidationError::new(
        "mobile",
        format!("{title} must be a valid mobile number"),
    ))
}

/// `regex:<pattern>`: the text form of the value matches `pattern`.
///
/// The pattern is used as written; anchor it with `^...$` for full matches.
pub fn regex(value: &Value, param: &str, _data: &DataMap, title: &str) -> RuleResult {
    let pattern = Regex::new(param).map_err(|_| invalid_param("regex", param))?;
    if text_matches(&pattern, value) {
        return Ok(());
    }
    Err(ValidationError::new("regex", format!("{title} has an invalid format"))
        .with_param("pattern", param.to_string()))
}

//! Character-set rules
//!
//! Scalars are checked through their text form, so `alphaNum` accepts the
//! number `42`. Arrays, objects and `null` always fail.

use std::sync::LazyLock;

use crate::error::{RuleResult, ValidationError};
use crate::value::{DataMap, as_text};
use regex::Regex;
use serde_json::Value;

static ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());

static ALPHA_NUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

static ALPHA_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").unwrap());

static CHS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Han}+$").unwrap());

static CHS_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Han}A-Za-z]+$").unwrap());

static CHS_ALPHA_NUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Han}A-Za-z0-9]+$").unwrap());

static CHS_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Han}A-Za-z0-9_\-]+$").unwrap());

// CJK symbols and full-width forms, e.g. `（超管）`.
static CHS_DASH_CHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{Han}A-Za-z0-9_\-\x{3000}-\x{303F}\x{FF00}-\x{FFEF}]+$").unwrap()
});

fn matches(
    pattern: &Regex,
    code: &'static str,
    allowed: &str,
    value: &Value,
    title: &str,
) -> RuleResult {
    match as_text(value) {
        Some(text) if pattern.is_match(&text) => Ok(()),
        _ => Err(ValidationError::new(
            code,
            format!("{title} may only contain {allowed}"),
        )),
    }
}

/// `alpha`: ASCII letters.
pub fn alpha(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    matches(&ALPHA, "alpha", "letters", value, title)
}

/// `alphaNum`: ASCII letters and digits.
pub fn alpha_num(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    matches(&ALPHA_NUM, "alphaNum", "letters and digits", value, title)
}

/// `alphaDash`: ASCII letters, digits, `_` and `-`.
pub fn alpha_dash(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    matches(
        &ALPHA_DASH,
        "alphaDash",
        "letters, digits, underscores and dashes",
        value,
        title,
    )
}

/// `chs`: Chinese characters.
pub fn chs(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    matches(&CHS, "chs", "Chinese characters", value, title)
}

/// `chsAlpha`: Chinese characters and letters.
pub fn chs_alpha(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    matches(
        &CHS_ALPHA,
        "chsAlpha",
        "Chinese characters and letters",
        value,
        title,
    )
}

/// `chsAlphaNum`: Chinese characters, letters and digits.
pub fn chs_alpha_num(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    matches(
        &CHS_ALPHA_NUM,
        "chsAlphaNum",
        "Chinese characters, letters and digits",
        value,
        title,
    )
}

/// `chsDash`: Chinese characters, letters, digits, `_` and `-`.
pub fn chs_dash(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    matches(
        &CHS_DASH,
        "chsDash",
        "Chinese characters, letters, digits, underscores and dashes",
        value,
        title,
    )
}

/// `chsDashChar`: like `chsDash`, plus CJK and full-width punctuation.
pub fn chs_dash_char(value: &Value, _param: &str, _data: &DataMap, title: &str) -> RuleResult {
    matches(
        &CHS_DASH_CHAR,
        "chsDashChar",
        "Chinese characters, letters, digits, dashes and Chinese punctuation",
        value,
        title,
    )
}

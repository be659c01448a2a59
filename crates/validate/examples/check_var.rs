//! Checking loose request parameters without a record type.

use nebula_validate::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = RuleRegistry::with_builtins();
    if let Err(err) = registry.register_fn("even", |value, _, _, title| {
        match value.as_i64() {
            Some(n) if n % 2 == 0 => Ok(()),
            _ => Err(ValidationError::new("even", format!("{title} must be even"))),
        }
    }) {
        eprintln!("cannot register rule: {err}");
        return;
    }

    let messages = TextTable::from([("between", "Page size must be 10 to 100")]);

    let checks = [
        (json!(20), "required|integer|between:10,100|even", "page size"),
        (json!(500), "required|integer|between:10,100", "page size"),
        (json!(21), "integer|even", "offset"),
        (json!(""), "email", "contact"),
        (json!("2024-02-30"), "required|date", "since"),
        (json!("abc"), "required|palindrome", "token"),
    ];

    for (value, chain, title) in checks {
        match check_var(&registry, &value, chain, title, &messages) {
            Ok(()) => println!("{title} = {value}: ok"),
            Err(err) => println!("{title} = {value}: {err}"),
        }
    }
}

//! Integration tests for keeping records and data maps in sync.

use nebula_validate::prelude::*;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Default, PartialEq)]
struct Pair {
    a: i64,
    b: String,
}

impl Record for Pair {
    fn rules() -> RuleSet<Self> {
        RuleSet::new()
            .chain("a", "required|integer")
            .chain("b", "required|string")
    }

    fn fields() -> FieldTable<Self> {
        bind_fields!(Self; "a" => a, "b" => b)
    }
}

fn map(value: Value) -> DataMap {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn round_trip_through_validation() {
    let validator = Validator::<Pair>::new(Arc::new(RuleRegistry::with_builtins()));
    let mut instance = validator
        .bind_with(Pair::default(), map(json!({"a": 1, "b": "x"})))
        .unwrap();

    instance.check().unwrap();

    let (record, data) = instance.into_parts();
    assert_eq!(record, Pair { a: 1, b: "x".into() });
    assert_eq!(Value::Object(data), json!({"a": 1, "b": "x"}));
}

#[test]
fn set_datas_replaces_map_and_fields() {
    let validator = Validator::<Pair>::new(Arc::new(RuleRegistry::with_builtins()));
    let mut instance = validator.bind(Pair { a: 5, b: "five".into() }).unwrap();
    assert_eq!(Value::Object(instance.data().clone()), json!({"a": 5, "b": "five"}));

    instance
        .set_datas(map(json!({"b": "six", "note": "unbound"})))
        .unwrap();

    assert_eq!(instance.record(), &Pair { a: 5, b: "six".into() });
    assert_eq!(instance.data().get("note"), Some(&json!("unbound")));
    assert_eq!(instance.data().get("a"), None);
}

#[test]
fn set_datas_type_mismatch_keeps_old_map() {
    let validator = Validator::<Pair>::new(Arc::new(RuleRegistry::with_builtins()));
    let mut instance = validator.bind(Pair { a: 5, b: "five".into() }).unwrap();

    let err = instance.set_datas(map(json!({"a": "five"}))).unwrap_err();
    assert!(err.is_config());
    assert_eq!(
        err.as_config(),
        Some(&ConfigError::TypeMismatch {
            field: "a".into(),
            expected: "i64",
            actual: "string",
        })
    );
    assert!(err.to_string().starts_with(validator.system_prefix()));
    assert_eq!(instance.data().get("a"), Some(&json!(5)));
}

#[test]
fn bind_with_rejects_mismatched_data() {
    let validator = Validator::<Pair>::new(Arc::new(RuleRegistry::with_builtins()));
    let err = validator
        .bind_with(Pair::default(), map(json!({"a": 1.5})))
        .unwrap_err();
    assert!(matches!(
        err.as_config(),
        Some(ConfigError::TypeMismatch { actual: "number", .. })
    ));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Plan {
    Free,
    Pro,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Address {
    city: String,
    zip: String,
}

#[derive(Debug)]
struct Account {
    plan: Plan,
    address: Option<Address>,
    seats: Vec<u16>,
}

impl Record for Account {
    fn rules() -> RuleSet<Self> {
        RuleSet::new()
            .chain("plan", "required|in:free,pro")
            .chain("seats", "array")
    }

    fn fields() -> FieldTable<Self> {
        bind_fields!(Self; "plan" => plan, "address" => address, "seats" => seats)
    }
}

#[test]
fn nested_and_enum_fields_bind_through_serde() {
    let validator = Validator::<Account>::new(Arc::new(RuleRegistry::with_builtins()));
    let mut account = validator
        .bind(Account {
            plan: Plan::Free,
            address: None,
            seats: vec![],
        })
        .unwrap();

    assert_eq!(account.data().get("plan"), Some(&json!("free")));
    assert_eq!(account.data().get("address"), Some(&Value::Null));

    account.set_data("plan", json!("pro")).unwrap();
    account
        .set_data("address", json!({"city": "Oslo", "zip": "0150"}))
        .unwrap();
    account.set_data("seats", json!([3, 4])).unwrap();
    account.check().unwrap();

    let account = account.into_record();
    assert_eq!(account.plan, Plan::Pro);
    assert_eq!(account.address.map(|a| a.city).as_deref(), Some("Oslo"));
    assert_eq!(account.seats, [3, 4]);
}

#[test]
fn out_of_range_numbers_are_mismatches() {
    let validator = Validator::<Account>::new(Arc::new(RuleRegistry::with_builtins()));
    let mut account = validator
        .bind(Account {
            plan: Plan::Free,
            address: None,
            seats: vec![],
        })
        .unwrap();

    let err = account.set_data("seats", json!([70000])).unwrap_err();
    assert!(err.is_config());
    assert!(account.record().seats.is_empty());

    let err = account.set_data("plan", json!("enterprise")).unwrap_err();
    assert!(err.is_config());
    assert_eq!(account.record().plan, Plan::Free);
}

//! Validating a user record in different scenes.
//!
//! Run with `RUST_LOG=nebula_validate=trace` to see each rule being applied.

use nebula_validate::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct User {
    name: String,
    email: String,
    password: String,
    password_confirm: String,
    age: u32,
    captcha: String,
}

impl User {
    fn is_captcha(&self, value: &Value, _: &str, _: &DataMap, title: &str) -> RuleResult {
        match value.as_str() {
            Some("x7k2") => Ok(()),
            _ => Err(ValidationError::new("captcha", format!("{title} does not match"))),
        }
    }
}

impl Record for User {
    fn rules() -> RuleSet<Self> {
        RuleSet::new()
            .chain("name", "required|chsDash|length:2,16")
            .chain("email", "required|email")
            .chain("password", "required|length:8,64")
            .chain("password_confirm", "required|confirm:password")
            .chain("age", "between:13,120")
            .chain("captcha", "required|isCaptcha")
    }

    fn titles() -> TextTable {
        TextTable::from([
            ("name", "Name"),
            ("email", "E-mail"),
            ("password", "Password"),
            ("password_confirm", "Password confirmation"),
            ("age", "Age"),
            ("captcha", "Captcha"),
        ])
    }

    fn messages() -> TextTable {
        TextTable::from([("password_confirm.confirm", "Passwords do not match")])
    }

    fn scenes() -> Scenes {
        Scenes::new()
            .scene("login", ["email", "password", "captcha"])
            .scene("profile", ["name", "age"])
    }

    fn methods() -> MethodTable<Self> {
        MethodTable::new().with("isCaptcha", Self::is_captcha)
    }

    fn fields() -> FieldTable<Self> {
        bind_fields!(Self;
            "name" => name,
            "email" => email,
            "password" => password,
            "password_confirm" => password_confirm,
            "age" => age,
            "captcha" => captcha,
        )
    }

    fn handle_data(&mut self, data: &mut DataMap, scene: &str) -> RuleResult {
        if scene.is_empty() {
            data.insert("name".into(), json!(self.name.trim()));
        }
        Ok(())
    }
}

fn report(scene: &str, result: Result<(), CheckError>) {
    let scene = if scene.is_empty() { "<all>" } else { scene };
    match result {
        Ok(()) => println!("{scene:>8}: ok"),
        Err(err) if err.is_config() => println!("{scene:>8}: misconfigured: {err}"),
        Err(err) => println!("{scene:>8}: invalid: {err}"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let validator = Validator::<User>::with_config(
        Arc::new(RuleRegistry::with_builtins()),
        ValidatorConfig::from_env(),
    );

    let mut user = match validator.bind(User {
        name: "ann".into(),
        email: "ann@example.com".into(),
        password: "correct-horse".into(),
        password_confirm: "correct-horse".into(),
        age: 34,
        captcha: "x7k2".into(),
    }) {
        Ok(user) => user,
        Err(err) => {
            eprintln!("cannot bind user: {err}");
            return;
        }
    };

    for scene in ["login", "profile", ""] {
        report(scene, user.check_scene(scene));
    }

    if let Err(err) = user.set_data("password_confirm", json!("correct-h0rse")) {
        eprintln!("cannot update user: {err}");
        return;
    }
    report("", user.check());

    report("signup", user.check_scene("signup"));
}

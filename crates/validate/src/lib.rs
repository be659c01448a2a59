//! # nebula-validate
//!
//! Declarative, scene-aware validation of records against named rules.
//!
//! A record type declares, per field key, a rule specification: a rule chain
//! such as `"required|between:18,65"`, an inline closure, or a method on the
//! record. Scenes pick the subset of fields that matter in a given context
//! (`"login"`, `"profile"`), and field bindings keep the typed record and its
//! string-keyed data map in sync.
//!
//! ## Quick Start
//!
//! ```
//! use nebula_validate::prelude::*;
//! use std::sync::Arc;
//!
//! struct Signup {
//!     user: String,
//!     pass: String,
//!     age: u32,
//! }
//!
//! impl Record for Signup {
//!     fn rules() -> RuleSet<Self> {
//!         RuleSet::new()
//!             .chain("user", "required|alphaDash|length:3,16")
//!             .chain("pass", "required|length:8,64")
//!             .chain("age", "required|between:18,65")
//!     }
//!
//!     fn titles() -> TextTable {
//!         TextTable::from([("user", "User name"), ("age", "Age")])
//!     }
//!
//!     fn scenes() -> Scenes {
//!         Scenes::new().scene("login", ["user", "pass"])
//!     }
//!
//!     fn fields() -> FieldTable<Self> {
//!         bind_fields!(Self; "user" => user, "pass" => pass, "age" => age)
//!     }
//! }
//!
//! let validator = Validator::<Signup>::new(Arc::new(RuleRegistry::with_builtins()));
//! let mut signup = validator
//!     .bind(Signup { user: "ann".into(), pass: "correct-horse".into(), age: 12 })
//!     .unwrap();
//!
//! assert!(signup.check_scene("login").is_ok());
//! assert_eq!(signup.check().unwrap_err().to_string(), "Age must be between 18 and 65");
//! ```
//!
//! ## Errors
//!
//! A pass reports at most one [`CheckError`]: either a violation of the
//! input data, or a configuration error (unknown scene, undefined rule,
//! binding type mismatch) carrying the validator's system prefix.
//!
//! ## Rules
//!
//! [`RuleRegistry::with_builtins`] provides the built-in rules listed in
//! [`rules`]; register your own with [`RuleRegistry::register_fn`] before
//! sharing the registry.

pub mod binder;
pub mod chain;
pub mod config;
pub mod error;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod rules;
pub mod scene;
pub mod standalone;
pub mod validator;
pub mod value;

pub use config::{EmptyScenePolicy, ValidatorConfig};
pub use error::{CheckError, ConfigError, ErrorLatch, RuleResult, ValidationError};
pub use record::{Record, RuleSet, RuleSpec, TextTable};
pub use registry::{Rule, RuleRegistry};
pub use serde_json::Value;
pub use standalone::check_var;
pub use validator::{Instance, Session, Validator};
pub use value::DataMap;

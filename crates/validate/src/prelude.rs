//! Prelude module for convenient imports.
//!
//! ```
//! use nebula_validate::prelude::*;
//! ```

pub use crate::binder::{FieldTable, decode_field, encode_field};
pub use crate::bind_fields;
pub use crate::chain::RuleChain;
pub use crate::config::{EmptyScenePolicy, ValidatorConfig};
pub use crate::error::{CheckError, ConfigError, RuleResult, ValidationError};
pub use crate::record::{MethodTable, Record, RuleSet, RuleSpec, TextTable};
pub use crate::registry::{Rule, RuleRegistry};
pub use crate::scene::Scenes;
pub use crate::standalone::check_var;
pub use crate::validator::{Instance, Session, Validator};
pub use crate::value::DataMap;

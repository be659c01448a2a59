//! Error types for record validation
//!
//! Two kinds of failure come out of a validation pass:
//!
//! - a **violation** ([`ValidationError`]): the input data broke a rule and the
//!   message is meant for the end user;
//! - a **configuration error** ([`ConfigError`]): the validator definition
//!   itself is wrong (unknown scene, undefined rule, binding type mismatch)
//!   and the message is meant for the developer.
//!
//! [`CheckError`] carries either kind. Configuration errors are rendered with
//! the per-record system prefix so that code which only sees the string can
//! still tell them apart.
//!
//! [`ErrorLatch`] holds at most one error per session.

use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Outcome of a single rule predicate.
pub type RuleResult = Result<(), ValidationError>;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A rule violation.
///
/// Uses `Cow<'static, str>` for zero-allocation when codes and messages are
/// known at compile time.
///
/// # Examples
///
/// ```
/// use nebula_validate::ValidationError;
///
/// let error = ValidationError::new("between", "Age must be between 18 and 65")
///     .with_field("age")
///     .with_param("min", "18")
///     .with_param("max", "65");
///
/// assert_eq!(error.param("max"), Some("65"));
/// assert_eq!(error.to_string(), "Age must be between 18 and 65");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the rule that reported the violation.
    ///
    /// Examples: "required", "between", "email"
    pub code: Cow<'static, str>,

    /// Human-readable message, already mentioning the field title.
    pub message: Cow<'static, str>,

    /// Key of the field being validated, filled in by the evaluator.
    pub field: Option<Cow<'static, str>>,

    /// Ordered parameters of the failed rule, typically 0-2 entries.
    pub params: SmallVec<[(Cow<'static, str>, Cow<'static, str>); 2]>,
}

impl ValidationError {
    /// Creates a new violation with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            params: SmallVec::new(),
        }
    }

    /// Sets the field key for this error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Replaces the message, keeping code, field and params.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Returns the field key, if the error has been attributed to one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Creates a "custom" violation with a message.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new("custom", message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// CONFIGURATION ERROR
// ============================================================================

/// The validator definition is wrong; fix the code, do not retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A rule was registered without a name.
    #[error("rule name is empty")]
    EmptyRuleName,

    /// `check_scene` was asked for a scene the record does not define.
    #[error("scene `{scene}` is not defined")]
    UndefinedScene { scene: String },

    /// A scene lists a field that has no rule specification.
    #[error("scene `{scene}` lists field `{field}` which has no rules")]
    SceneFieldMissing { scene: String, field: String },

    /// A chain names a rule that is neither registered nor a record method.
    #[error("rule `{rule}` used by field `{field}` is not defined")]
    UndefinedRule { field: String, rule: String },

    /// An incoming data value cannot be assigned to the bound field.
    #[error("field `{field}` has type `{expected}` but was given a {actual} value")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A bound field could not be turned into a data value.
    #[error("field `{field}` cannot be encoded: {message}")]
    Encode { field: String, message: String },
}

impl ConfigError {
    /// Create an undefined scene error
    pub fn undefined_scene(scene: impl Into<String>) -> Self {
        Self::UndefinedScene {
            scene: scene.into(),
        }
    }

    /// Create a scene/field mismatch error
    pub fn scene_field_missing(scene: impl Into<String>, field: impl Into<String>) -> Self {
        Self::SceneFieldMissing {
            scene: scene.into(),
            field: field.into(),
        }
    }

    /// Create an undefined rule error
    pub fn undefined_rule(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::UndefinedRule {
            field: field.into(),
            rule: rule.into(),
        }
    }
}

// ============================================================================
// CHECK ERROR
// ============================================================================

/// The single error reported by a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The validator is misconfigured. Displays as `"{prefix}{source}"`.
    #[error("{prefix}{source}")]
    Config {
        prefix: Arc<str>,
        #[source]
        source: ConfigError,
    },

    /// The input data broke a rule.
    #[error(transparent)]
    Violation(ValidationError),
}

impl CheckError {
    /// Wraps a configuration error with the record's system prefix.
    pub fn config(prefix: impl Into<Arc<str>>, source: ConfigError) -> Self {
        Self::Config {
            prefix: prefix.into(),
            source,
        }
    }

    /// Returns true if the validator definition is at fault.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if the input data is at fault.
    #[must_use]
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Violation(_))
    }

    /// The system prefix of a configuration error.
    #[must_use]
    pub fn system_prefix(&self) -> Option<&str> {
        match self {
            Self::Config { prefix, .. } => Some(&**prefix),
            Self::Violation(_) => None,
        }
    }

    /// The violation, if this is one.
    #[must_use]
    pub fn as_violation(&self) -> Option<&ValidationError> {
        match self {
            Self::Violation(error) => Some(error),
            Self::Config { .. } => None,
        }
    }

    /// The configuration error, if this is one.
    #[must_use]
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config { source, .. } => Some(source),
            Self::Violation(_) => None,
        }
    }
}

impl From<ValidationError> for CheckError {
    fn from(error: ValidationError) -> Self {
        Self::Violation(error)
    }
}

// ============================================================================
// ERROR LATCH
// ============================================================================

/// Holds the first error of a session; later errors are dropped.
#[derive(Debug, Clone, Default)]
pub struct ErrorLatch {
    error: Option<CheckError>,
}

impl ErrorLatch {
    /// Creates an empty latch.
    #[must_use]
    pub fn new() -> Self {
        Self { error: None }
    }

    /// Latches `error` unless one is already pending, and returns the
    /// pending error either way.
    pub fn set(&mut self, error: CheckError) -> &CheckError {
        self.error.get_or_insert(error)
    }

    /// The latched error, if any.
    #[must_use]
    pub fn get(&self) -> Option<&CheckError> {
        self.error.as_ref()
    }

    /// Returns true if an error is latched.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.error.is_some()
    }

    /// Converts the latch into the pass result.
    pub fn into_result(self) -> Result<(), CheckError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

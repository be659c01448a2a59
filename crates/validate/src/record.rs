//! The record contract
//!
//! A type becomes validatable by implementing [`Record`]: it declares a rule
//! set keyed by field, and optionally titles, message overrides, scenes,
//! record-owned rule methods, the field bindings that keep the typed value
//! and its data map in sync, and a post-validation hook.
//!
//! A field's rule specification is a closed variant ([`RuleSpec`]):
//!
//! - a rule chain such as `"required|between:18,65"`;
//! - an inline closure taking `(value, data, title)`;
//! - a method on the record taking `(value, param, data, title)`.

use crate::binder::FieldTable;
use crate::chain::RuleChain;
use crate::error::RuleResult;
use crate::scene::Scenes;
use crate::value::DataMap;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// RULE SPECIFICATIONS
// ============================================================================

/// Signature of an inline closure rule: `(value, data, title)`.
pub type ClosurePredicate = dyn Fn(&Value, &DataMap, &str) -> RuleResult + Send + Sync;

/// A record-owned rule: `(record, value, param, data, title)`.
///
/// Used both as a field specification and as a named rule inside chains.
pub type MethodRule<R> = fn(&R, &Value, &str, &DataMap, &str) -> RuleResult;

/// Shared inline closure rule.
#[derive(Clone)]
pub struct ClosureRule(Arc<ClosurePredicate>);

impl ClosureRule {
    /// Wraps a closure.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value, &DataMap, &str) -> RuleResult + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    /// Runs the closure.
    #[inline]
    pub fn call(&self, value: &Value, data: &DataMap, title: &str) -> RuleResult {
        (self.0)(value, data, title)
    }
}

impl fmt::Debug for ClosureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClosureRule(<closure>)")
    }
}

/// How a single field is validated.
pub enum RuleSpec<R> {
    /// A parsed `|`-separated rule chain.
    Chain(RuleChain),
    /// An inline closure, always invoked.
    Closure(ClosureRule),
    /// A record method, always invoked with an empty parameter.
    Method(MethodRule<R>),
}

impl<R> RuleSpec<R> {
    /// Parses a rule chain specification.
    pub fn chain(source: &str) -> Self {
        Self::Chain(RuleChain::parse(source))
    }

    /// Wraps a closure specification.
    pub fn closure<F>(check: F) -> Self
    where
        F: Fn(&Value, &DataMap, &str) -> RuleResult + Send + Sync + 'static,
    {
        Self::Closure(ClosureRule::new(check))
    }

    /// Short kind name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Chain(_) => "chain",
            Self::Closure(_) => "closure",
            Self::Method(_) => "method",
        }
    }
}

impl<R> Clone for RuleSpec<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Chain(chain) => Self::Chain(chain.clone()),
            Self::Closure(closure) => Self::Closure(closure.clone()),
            Self::Method(method) => Self::Method(*method),
        }
    }
}

impl<R> fmt::Debug for RuleSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(chain) => f.debug_tuple("Chain").field(&chain.source()).finish(),
            Self::Closure(_) => f.write_str("Closure(<closure>)"),
            Self::Method(_) => f.write_str("Method(<fn>)"),
        }
    }
}

impl<R> From<&str> for RuleSpec<R> {
    fn from(source: &str) -> Self {
        Self::chain(source)
    }
}

// ============================================================================
// RULE SET
// ============================================================================

/// Field key to rule specification, in declaration order.
///
/// # Examples
///
/// ```
/// use nebula_validate::record::RuleSet;
///
/// struct Signup;
///
/// let rules = RuleSet::<Signup>::new()
///     .chain("email", "required|email")
///     .chain("age", "required|between:18,65");
///
/// assert_eq!(rules.keys().collect::<Vec<_>>(), ["email", "age"]);
/// ```
pub struct RuleSet<R> {
    specs: IndexMap<String, RuleSpec<R>>,
}

impl<R> RuleSet<R> {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self {
            specs: IndexMap::new(),
        }
    }

    /// Adds a rule chain for `key`.
    #[must_use = "builder methods must be chained or built"]
    pub fn chain(mut self, key: impl Into<String>, chain: &str) -> Self {
        self.insert(key, RuleSpec::chain(chain));
        self
    }

    /// Adds an inline closure for `key`.
    #[must_use = "builder methods must be chained or built"]
    pub fn closure<F>(mut self, key: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value, &DataMap, &str) -> RuleResult + Send + Sync + 'static,
    {
        self.insert(key, RuleSpec::closure(check));
        self
    }

    /// Adds a record method for `key`.
    #[must_use = "builder methods must be chained or built"]
    pub fn method(mut self, key: impl Into<String>, method: MethodRule<R>) -> Self {
        self.insert(key, RuleSpec::Method(method));
        self
    }

    /// Sets the specification for `key`, replacing any previous one.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, spec: RuleSpec<R>) -> Option<RuleSpec<R>> {
        self.specs.insert(key.into(), spec)
    }

    /// Merges `other` into this set; `other` wins on shared keys.
    pub fn merge(&mut self, other: RuleSet<R>) {
        self.specs.extend(other.specs);
    }

    /// Specification for `key`.
    pub fn get(&self, key: &str) -> Option<&RuleSpec<R>> {
        self.specs.get(key)
    }

    /// Returns true if `key` has a specification.
    pub fn contains(&self, key: &str) -> bool {
        self.specs.contains_key(key)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec<R>)> {
        self.specs.iter().map(|(key, spec)| (key.as_str(), spec))
    }

    /// Field keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl<R> Default for RuleSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for RuleSet<R> {
    fn clone(&self) -> Self {
        Self {
            specs: self.specs.clone(),
        }
    }
}

impl<R> fmt::Debug for RuleSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.specs.iter()).finish()
    }
}

impl<R, K: Into<String>> FromIterator<(K, RuleSpec<R>)> for RuleSet<R> {
    fn from_iter<I: IntoIterator<Item = (K, RuleSpec<R>)>>(iter: I) -> Self {
        Self {
            specs: iter.into_iter().map(|(key, spec)| (key.into(), spec)).collect(),
        }
    }
}

// ============================================================================
// METHOD TABLE
// ============================================================================

/// Named record methods usable inside rule chains.
///
/// Chain items that are not registered rules are looked up here.
pub struct MethodTable<R> {
    methods: HashMap<String, MethodRule<R>>,
}

impl<R> MethodTable<R> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Adds a method under `name`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, name: impl Into<String>, method: MethodRule<R>) -> Self {
        self.methods.insert(name.into(), method);
        self
    }

    /// Looks up a method.
    pub fn get(&self, name: &str) -> Option<MethodRule<R>> {
        self.methods.get(name).copied()
    }

    /// Method names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<R> Default for MethodTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for MethodTable<R> {
    fn clone(&self) -> Self {
        Self {
            methods: self.methods.clone(),
        }
    }
}

impl<R> fmt::Debug for MethodTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.names())
            .finish()
    }
}

// ============================================================================
// TEXT TABLE
// ============================================================================

/// String table used for field titles and message overrides.
///
/// Message overrides are keyed `"field.rule"`, e.g. `"age.between"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    entries: HashMap<String, String>,
}

impl TextTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    /// Sets an entry, returning the previous text.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), text.into())
    }

    /// Text for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for TextTable {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, text) in iter {
            self.insert(key, text);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TextTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for TextTable {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// A typed record that can be validated.
///
/// Only [`rules`](Record::rules) is required. Everything else defaults to
/// empty; a record without [`fields`](Record::fields) is validated against
/// whatever data map it is given and never receives data back.
///
/// # Examples
///
/// ```
/// use nebula_validate::prelude::*;
/// use serde_json::json;
///
/// struct Login {
///     user: String,
///     pass: String,
/// }
///
/// impl Record for Login {
///     fn rules() -> RuleSet<Self> {
///         RuleSet::new()
///             .chain("user", "required|alphaDash")
///             .chain("pass", "required|length:6,32")
///     }
///
///     fn fields() -> FieldTable<Self> {
///         bind_fields!(Self; "user" => user, "pass" => pass)
///     }
/// }
///
/// let validator = Validator::<Login>::new(RuleRegistry::with_builtins().into());
/// let mut instance = validator
///     .bind(Login { user: "ann".into(), pass: "123".into() })
///     .unwrap();
///
/// let err = instance.check().unwrap_err();
/// assert_eq!(err.as_violation().unwrap().code, "length");
///
/// instance.set_data("pass", json!("hunter22")).unwrap();
/// assert!(instance.check().is_ok());
/// assert_eq!(instance.record().pass, "hunter22");
/// ```
pub trait Record: Sized + 'static {
    /// Rule specification per field key.
    fn rules() -> RuleSet<Self>;

    /// Display titles per field key; missing or empty titles fall back to the key.
    fn titles() -> TextTable {
        TextTable::new()
    }

    /// Message overrides keyed `"field.rule"`.
    fn messages() -> TextTable {
        TextTable::new()
    }

    /// Named field subsets.
    fn scenes() -> Scenes {
        Scenes::new()
    }

    /// Record methods usable as named rules in chains.
    fn methods() -> MethodTable<Self> {
        MethodTable::new()
    }

    /// Bindings between record fields and data map keys.
    fn fields() -> FieldTable<Self> {
        FieldTable::new()
    }

    /// Runs after every field passed, with `self` already synced from `data`.
    /// May add derived entries to `data`, assign bound fields directly or
    /// raise a late violation. Changed map entries are written onto the
    /// record afterwards, then bound fields are written back into `data`.
    fn handle_data(&mut self, data: &mut DataMap, scene: &str) -> RuleResult {
        let _ = (data, scene);
        Ok(())
    }
}

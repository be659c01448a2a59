//! Rule registry
//!
//! Maps rule names used in rule chains (`"required|between:18,65"`) to
//! predicates. A registry is built up front, then shared with validators
//! behind an `Arc`; once shared it can no longer change, so lookups during
//! validation never race with registration.

use crate::error::{ConfigError, RuleResult};
use crate::value::DataMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a rule predicate: `(value, param, data, title)`.
pub type RulePredicate = dyn Fn(&Value, &str, &DataMap, &str) -> RuleResult + Send + Sync;

/// Plain function form of a predicate, used by the built-in table.
pub type RuleFn = fn(&Value, &str, &DataMap, &str) -> RuleResult;

/// A named rule predicate.
#[derive(Clone)]
pub struct Rule {
    name: Arc<str>,
    check: Arc<RulePredicate>,
}

impl Rule {
    /// Creates a rule from a name and a predicate.
    pub fn new<F>(name: impl Into<Arc<str>>, check: F) -> Self
    where
        F: Fn(&Value, &str, &DataMap, &str) -> RuleResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// The rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the predicate.
    #[inline]
    pub fn check(&self, value: &Value, param: &str, data: &DataMap, title: &str) -> RuleResult {
        (self.check)(value, param, data, title)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("check", &"<function>")
            .finish()
    }
}

/// Registry of rule predicates keyed by name
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<Arc<str>, Rule>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Creates a registry holding every built-in rule.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::rules::register_builtins(&mut registry);
        registry
    }

    /// Registers a rule, replacing any rule with the same name.
    pub fn register(&mut self, rule: Rule) -> Result<(), ConfigError> {
        if rule.name.is_empty() {
            return Err(ConfigError::EmptyRuleName);
        }

        if self.rules.contains_key(&rule.name) {
            tracing::debug!(rule = rule.name(), "Replacing registered rule");
        } else {
            tracing::trace!(rule = rule.name(), "Registered rule");
        }

        self.rules.insert(Arc::clone(&rule.name), rule);
        Ok(())
    }

    /// Inserts a built-in rule; built-in names are never empty.
    pub(crate) fn insert_builtin(&mut self, name: &'static str, check: RuleFn) {
        let rule = Rule::new(name, check);
        self.rules.insert(Arc::clone(&rule.name), rule);
    }

    /// Registers a closure under `name`.
    pub fn register_fn<F>(&mut self, name: &str, check: F) -> Result<(), ConfigError>
    where
        F: Fn(&Value, &str, &DataMap, &str) -> RuleResult + Send + Sync + 'static,
    {
        self.register(Rule::new(name, check))
    }

    /// Registers rules in order, stopping at the first failure.
    ///
    /// Rules registered before the failure stay registered.
    pub fn register_many(&mut self, rules: impl IntoIterator<Item = Rule>) -> Result<(), ConfigError> {
        for rule in rules {
            self.register(rule)?;
        }
        Ok(())
    }

    /// Looks up a rule by name.
    pub fn lookup(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Check if a rule exists
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Get all rule names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(|name| &**name).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use serde_json::json;

    fn pass(_: &Value, _: &str, _: &DataMap, _: &str) -> RuleResult {
        Ok(())
    }

    fn fail(_: &Value, _: &str, _: &DataMap, title: &str) -> RuleResult {
        Err(ValidationError::new("fail", format!("{title} always fails")))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = RuleRegistry::new();
        registry.register_fn("pass", pass).unwrap();

        let rule = registry.lookup("pass").unwrap();
        assert_eq!(rule.name(), "pass");
        assert!(rule.check(&json!(1), "", &DataMap::new(), "x").is_ok());
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut registry = RuleRegistry::new();
        assert_eq!(registry.register_fn("", pass), Err(ConfigError::EmptyRuleName));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = RuleRegistry::new();
        registry.register_fn("rule", pass).unwrap();
        registry.register_fn("rule", fail).unwrap();

        assert_eq!(registry.len(), 1);
        let err = registry
            .lookup("rule")
            .unwrap()
            .check(&json!(1), "", &DataMap::new(), "Age")
            .unwrap_err();
        assert_eq!(err.message, "Age always fails");
    }

    #[test]
    fn test_register_many_stops_at_first_failure() {
        let mut registry = RuleRegistry::new();
        let result = registry.register_many([
            Rule::new("a", pass),
            Rule::new("", pass),
            Rule::new("b", pass),
        ]);

        assert_eq!(result, Err(ConfigError::EmptyRuleName));
        assert!(registry.contains("a"));
        assert!(!registry.contains("b"));
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = RuleRegistry::with_builtins();
        assert!(registry.contains("required"));
        assert!(registry.contains("between"));
        assert!(registry.contains("email"));
        assert!(registry.names().windows(2).all(|w| w[0] <= w[1]));
    }
}

//! Rule chain parsing
//!
//! A rule chain is a `|`-separated list of rule items; each item is a rule
//! name, optionally followed by `:` and a single parameter string:
//!
//! ```text
//! required|length:3,20|alphaDash
//! ```
//!
//! Items run strictly in order. The first item decides how absent values are
//! treated: a chain starting with `required` always runs, any other chain is
//! skipped when the field is absent or empty.

use smallvec::SmallVec;
use std::fmt;

/// Name of the rule that makes a chain run on absent values.
pub const REQUIRED: &str = "required";

/// One `name[:param]` item of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleItem {
    /// Rule name, looked up in the registry and then on the record.
    pub name: String,
    /// Everything after the first `:`, or `""`.
    pub param: String,
}

impl RuleItem {
    /// Parses a single item. Splits at the first `:` only, so parameters may
    /// contain further colons.
    pub fn parse(item: &str) -> Self {
        let (name, param) = item.split_once(':').unwrap_or((item, ""));
        Self {
            name: name.trim().to_string(),
            param: param.to_string(),
        }
    }
}

/// A parsed rule chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleChain {
    source: String,
    items: SmallVec<[RuleItem; 4]>,
}

impl RuleChain {
    /// Parses a chain; empty items are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_validate::chain::RuleChain;
    ///
    /// let chain = RuleChain::parse("required||between:18,65");
    /// assert!(chain.is_required());
    /// assert_eq!(chain.len(), 2);
    /// assert_eq!(chain.items()[1].param, "18,65");
    /// ```
    pub fn parse(source: &str) -> Self {
        let items = source
            .split('|')
            .filter(|item| !item.trim().is_empty())
            .map(RuleItem::parse)
            .filter(|item| !item.name.is_empty())
            .collect();

        Self {
            source: source.to_string(),
            items,
        }
    }

    /// True if the first item is `required`.
    pub fn is_required(&self) -> bool {
        self.items.first().is_some_and(|item| item.name == REQUIRED)
    }

    /// Items in evaluation order.
    pub fn items(&self) -> &[RuleItem] {
        &self.items
    }

    /// `(name, param)` pairs in evaluation order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items
            .iter()
            .map(|item| (item.name.as_str(), item.param.as_str()))
    }

    /// The chain as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the chain has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for RuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for RuleChain {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

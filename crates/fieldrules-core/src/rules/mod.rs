//! Rules, rule outcomes and the per-validator rule registry
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

pub mod built_in;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

/// Result of applying one rule to one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    /// The rule's condition was not met
    Failed,
    /// The rule cannot reason about this kind of value
    Unsupported,
    /// The rule's parameter could not be parsed for this kind of value
    BadParameter,
}

impl Outcome {
    pub fn from_bool(valid: bool) -> Self {
        if valid {
            Outcome::Valid
        } else {
            Outcome::Failed
        }
    }
}

/// A named, parameterised check
///
/// Rules must be pure. Any `Fn(&Value, &str) -> Outcome` closure is a rule.
pub trait Rule: Send + Sync {
    fn check(&self, value: &Value<'_>, param: &str) -> Outcome;
}

impl<F> Rule for F
where
    F: Fn(&Value<'_>, &str) -> Outcome + Send + Sync,
{
    fn check(&self, value: &Value<'_>, param: &str) -> Outcome {
        self(value, param)
    }
}

/// A statically declared `(rule name, parameter)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSpec {
    name: Cow<'static, str>,
    param: Cow<'static, str>,
}

impl RuleSpec {
    pub fn new(name: impl Into<Cow<'static, str>>, param: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
        }
    }

    pub fn required() -> Self {
        Self::new(built_in::REQUIRED, "")
    }

    pub fn len(param: impl Into<Cow<'static, str>>) -> Self {
        Self::new(built_in::LEN, param)
    }

    pub fn min(param: impl Into<Cow<'static, str>>) -> Self {
        Self::new(built_in::MIN, param)
    }

    pub fn max(param: impl Into<Cow<'static, str>>) -> Self {
        Self::new(built_in::MAX, param)
    }

    pub fn email() -> Self {
        Self::new(built_in::EMAIL, "")
    }

    pub fn regexp(pattern: impl Into<Cow<'static, str>>) -> Self {
        Self::new(built_in::REGEXP, pattern)
    }

    pub fn in_list(param: impl Into<Cow<'static, str>>) -> Self {
        Self::new(built_in::IN_LIST, param)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param(&self) -> &str {
        &self.param
    }
}

/// Rule name to rule table
///
/// Cloning a registry shares the rule functions; adding or removing entries
/// on a clone leaves the original untouched.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// A registry with no rules at all
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// A registry seeded with the built-in rules
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for (name, rule) in built_in::all() {
            registry.rules.insert(name.to_string(), rule);
        }
        registry
    }

    /// Add, replace or (with `None`) remove the rule called `name`
    pub fn set(&mut self, name: &str, rule: Option<Arc<dyn Rule>>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::EmptyRuleName);
        }
        match rule {
            Some(rule) => {
                self.rules.insert(name.to_string(), rule);
            }
            None => {
                self.rules.remove(name);
            }
        }
        Ok(())
    }

    pub fn register<R: Rule + 'static>(&mut self, name: &str, rule: R) -> Result<()> {
        self.set(name, Some(Arc::new(rule)))
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.set(name, None)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Rule>> {
        self.rules.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

//! Rule-string parsing
//!
//! A rule string is a comma separated list of clauses, each `name` or
//! `name=param`. A backslash escapes a comma so it can appear inside a
//! parameter: `regexp=^a\,b$` is a single clause with param `^a,b$`.
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::rules::{Outcome, Rule, RuleRegistry, RuleSpec};
use crate::value::Value;

/// Tag key read when none is configured
pub const DEFAULT_TAG_KEY: &str = "validate";

/// Rule string that excludes a field from validation and descent
pub const SKIP_FIELD: &str = "-";

/// Failure to turn a rule string into tags
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("unknown rule {name:?}")]
    UnknownRule { name: String },
}

impl TagError {
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        Self::UnknownRule { name: name.into() }
    }
}

/// One parsed clause, bound to its rule
#[derive(Clone)]
pub struct Tag {
    name: String,
    param: String,
    rule: Arc<dyn Rule>,
}

impl Tag {
    pub fn new(name: impl Into<String>, param: impl Into<String>, rule: Arc<dyn Rule>) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
            rule,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// Run the bound rule with this tag's parameter
    pub fn check(&self, value: &Value<'_>) -> Outcome {
        self.rule.check(value, &self.param)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("name", &self.name)
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.param == other.param && Arc::ptr_eq(&self.rule, &other.rule)
    }
}

/// Parse a raw rule string against `registry`
///
/// The empty string yields no tags. Any clause with an empty or unregistered
/// name fails the whole string.
pub fn parse_tags(raw: &str, registry: &RuleRegistry) -> Result<Vec<Tag>, TagError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    split_unescaped(raw, ',')
        .into_iter()
        .map(|clause| {
            let clause = clause.replace("\\,", ",");
            let (name, param) = match find_unescaped(&clause, '=') {
                Some(at) => (&clause[..at], &clause[at + 1..]),
                None => (clause.as_str(), ""),
            };
            bind(name.trim(), param.trim(), registry)
        })
        .collect()
}

/// Bind statically declared rule specs against `registry`
pub fn parse_specs(specs: &[RuleSpec], registry: &RuleRegistry) -> Result<Vec<Tag>, TagError> {
    specs
        .iter()
        .map(|spec| bind(spec.name(), spec.param(), registry))
        .collect()
}

fn bind(name: &str, param: &str, registry: &RuleRegistry) -> Result<Tag, TagError> {
    if name.is_empty() {
        return Err(TagError::unknown_rule(name));
    }
    let rule = registry
        .get(name)
        .ok_or_else(|| TagError::unknown_rule(name))?;
    Ok(Tag::new(name, param, rule))
}

/// Split on every `sep` preceded by an even number of backslashes
fn split_unescaped(raw: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut backslashes = 0usize;

    for (i, ch) in raw.char_indices() {
        if ch == sep && backslashes % 2 == 0 {
            parts.push(&raw[start..i]);
            start = i + ch.len_utf8();
        }
        backslashes = if ch == '\\' { backslashes + 1 } else { 0 };
    }
    parts.push(&raw[start..]);
    parts
}

fn find_unescaped(raw: &str, sep: char) -> Option<usize> {
    let mut backslashes = 0usize;
    for (i, ch) in raw.char_indices() {
        if ch == sep && backslashes % 2 == 0 {
            return Some(i);
        }
        backslashes = if ch == '\\' { backslashes + 1 } else { 0 };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_and_params(tags: &[Tag]) -> Vec<(&str, &str)> {
        tags.iter().map(|t| (t.name(), t.param())).collect()
    }

    #[test]
    fn test_split_unescaped() {
        assert_eq!(split_unescaped("a,b", ','), vec!["a", "b"]);
        assert_eq!(split_unescaped(r"a\,b", ','), vec![r"a\,b"]);
        assert_eq!(split_unescaped(r"a\\,b", ','), vec![r"a\\", "b"]);
        assert_eq!(split_unescaped(",a,", ','), vec!["", "a", ""]);
        assert_eq!(split_unescaped("", ','), vec![""]);
    }

    #[test]
    fn test_find_unescaped() {
        assert_eq!(find_unescaped("min=3", '='), Some(3));
        assert_eq!(find_unescaped(r"a\=b=c", '='), Some(4));
        assert_eq!(find_unescaped("required", '='), None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let registry = RuleRegistry::with_builtins();
        let tags = parse_tags(" required , min = 3 ", &registry).unwrap();
        assert_eq!(names_and_params(&tags), vec![("required", ""), ("min", "3")]);
    }

    #[test]
    fn test_param_keeps_later_equals_signs() {
        let registry = RuleRegistry::with_builtins();
        let tags = parse_tags("regexp=^a=b$", &registry).unwrap();
        assert_eq!(names_and_params(&tags), vec![("regexp", "^a=b$")]);
    }

    #[test]
    fn test_empty_clause_is_unknown_rule() {
        let registry = RuleRegistry::with_builtins();
        assert_eq!(
            parse_tags("required,", &registry),
            Err(TagError::unknown_rule(""))
        );
        assert_eq!(
            parse_tags(",required", &registry),
            Err(TagError::unknown_rule(""))
        );
        assert_eq!(parse_tags("=5", &registry), Err(TagError::unknown_rule("")));
    }

    #[test]
    fn test_parse_specs() {
        let registry = RuleRegistry::with_builtins();
        let tags = parse_specs(&[RuleSpec::required(), RuleSpec::max("10")], &registry).unwrap();
        assert_eq!(names_and_params(&tags), vec![("required", ""), ("max", "10")]);

        let err = parse_specs(&[RuleSpec::new("nope", "")], &registry).unwrap_err();
        assert_eq!(err.to_string(), "unknown rule \"nope\"");
    }

    #[test]
    fn test_tag_checks_with_its_param() {
        let registry = RuleRegistry::with_builtins();
        let tags = parse_tags("min=3", &registry).unwrap();
        assert_eq!(tags[0].check(&Value::from(2i32)), Outcome::Failed);
        assert_eq!(tags[0].check(&Value::from(3i32)), Outcome::Valid);
    }
}

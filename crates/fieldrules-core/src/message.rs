//! Message tables and error-message resolution
//!
//! A failed rule is turned into text by the first hit of:
//!
//! 1. `<module>.<field>.error.<rule>` in the validator's translated messages,
//!    with arguments `[value, param]`
//! 2. `default.error.<rule>` in the translated messages, with arguments
//!    `[module label, field label, value, param]`; labels come from
//!    `<module>.label` and `<module>.<field>.label` and fall back to the raw
//!    names
//! 3. the default template keyed by the rule name alone, with arguments
//!    `[module, field, value, param]`
//!
//! Tiers 1 and 2 are only consulted while translation is enabled.
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rules::built_in;

/// Key to template table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Messages(HashMap<String, String>);

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in templates used as the last resolution tier
    pub fn defaults() -> Self {
        [
            (built_in::REQUIRED, "${0} ${1} cannot be blank"),
            (built_in::EMAIL, "${0} ${2} is not a valid e-mail address"),
            (built_in::LEN, "${0} ${2} should be in size ${3}"),
            (built_in::MIN, "${0} ${2} is less than minimum value ${3}"),
            (built_in::MAX, "${0} ${2} exceeds maximum value ${3}"),
            (built_in::IN_LIST, "${0} ${2} is not contained within the list ${3}"),
            (built_in::REGEXP, "${0} ${2} is not a valid data"),
        ]
        .into_iter()
        .collect()
    }

    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), template.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up `key` and substitute `args` into it
    pub fn format<S: AsRef<str>>(&self, key: &str, args: &[S]) -> Option<String> {
        self.get(key).map(|template| format_message(template, args))
    }

    /// Copy every entry of `other` into `self`, overwriting duplicates
    pub fn merge(&mut self, other: Messages) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries sorted by key
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        entries.sort_unstable();
        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Messages {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Replace `${0}`, `${1}`, ... with `args`, first occurrence of each only
///
/// Placeholders without a matching argument are left as they are.
pub fn format_message<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut message = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        message = message.replacen(&format!("${{{i}}}"), arg.as_ref(), 1);
    }
    message
}

/// Source of translated messages for a `(language, module)` pair
pub trait MessageProvider: Send + Sync {
    fn messages(&self, lang_code: &str, module: &str) -> Messages;
}

impl<F> MessageProvider for F
where
    F: Fn(&str, &str) -> Messages + Send + Sync,
{
    fn messages(&self, lang_code: &str, module: &str) -> Messages {
        self(lang_code, module)
    }
}

/// Provider that never supplies translations
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslations;

impl MessageProvider for NoTranslations {
    fn messages(&self, _lang_code: &str, _module: &str) -> Messages {
        Messages::new()
    }
}

/// Per-language message tables, typically loaded from a file
///
/// ```yaml
/// en:
///   default.error.required: "${1} is mandatory"
///   User.Email.label: "e-mail"
/// fr:
///   default.error.required: "${1} est obligatoire"
/// ```
///
/// Keys already carry their module prefix, so the same table is returned
/// for every module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(HashMap<String, Messages>);

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, lang_code: impl Into<String>, messages: Messages) -> Self {
        self.0.insert(lang_code.into(), messages);
        self
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<_> = self.0.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

impl MessageProvider for Catalog {
    fn messages(&self, lang_code: &str, _module: &str) -> Messages {
        self.0.get(lang_code).cloned().unwrap_or_default()
    }
}

/// Three-tier lookup over a validator's message tables
#[derive(Debug, Clone, Copy)]
pub struct MessageResolver<'a> {
    translations: Option<&'a Messages>,
    defaults: &'a Messages,
}

impl<'a> MessageResolver<'a> {
    /// `translations` is `None` when translation is disabled
    pub fn new(translations: Option<&'a Messages>, defaults: &'a Messages) -> Self {
        Self {
            translations,
            defaults,
        }
    }

    /// Resolve the message for `rule` failing on `module.field`
    ///
    /// `args` are the rule arguments, `[value, param]` for every built-in.
    /// Module defaults label the module from `<module>.label` and the field
    /// from `<module>.<field>.label`.
    pub fn resolve(&self, module: &str, field: &str, rule: &str, args: &[String]) -> Option<String> {
        if let Some(translations) = self.translations {
            let specific = format!("{module}.{field}.error.{rule}");
            if let Some(message) = translations.format(&specific, args) {
                return Some(message);
            }

            let module_label = translations
                .get(&format!("{module}.label"))
                .unwrap_or(module);
            let field_label = translations
                .get(&format!("{module}.{field}.label"))
                .unwrap_or(field);
            let labelled = with_scope(module_label, field_label, args);
            if let Some(message) = translations.format(&format!("default.error.{rule}"), &labelled) {
                return Some(message);
            }
        }

        self.defaults.format(rule, &with_scope(module, field, args))
    }
}

fn with_scope<'s>(module: &'s str, field: &'s str, args: &'s [String]) -> Vec<&'s str> {
    let mut scoped = Vec::with_capacity(args.len() + 2);
    scoped.push(module);
    scoped.push(field);
    scoped.extend(args.iter().map(String::as_str));
    scoped
}

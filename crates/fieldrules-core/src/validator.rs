//! The validation engine
//!
//! A [`Validator`] walks the fields of a [`Describe`] value, runs each field's
//! rules in order and records the first failure per field path. It then
//! descends into every field's value: records are walked by a child validator
//! scoped to the field name, sequences per element (`Field[i]`) and maps per
//! key and value (`Field[k](key)`, `Field[k](value)`).
//!
//! ```rust
//! use fieldrules_core::{Describe, Field, Validator};
//!
//! struct User {
//!     name: String,
//! }
//!
//! impl Describe for User {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![Field::new("Name", &self.name).rules("required")]
//!     }
//! }
//!
//! let mut validator = Validator::new("User");
//! let errors = validator.validate(&User { name: String::new() }).unwrap_err();
//! assert_eq!(errors.to_map()["Name"], "User Name cannot be blank");
//! ```
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::message::{MessageProvider, MessageResolver, Messages, NoTranslations};
use crate::report::{Errors, FieldError};
use crate::rules::{Outcome, Rule, RuleRegistry};
use crate::tag::{self, Tag, TagError, DEFAULT_TAG_KEY, SKIP_FIELD};
use crate::value::{Describe, Field, Value};

/// Default limit on nested record depth
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Traversal context for one module scope
///
/// Not meant to be shared across threads while validating; build one per
/// top-level call or serialize access externally.
pub struct Validator {
    tag_key: String,
    registry: RuleRegistry,
    module: String,
    errors: Errors,
    lang_code: Option<String>,
    messages: Messages,
    provider: Arc<dyn MessageProvider>,
    defaults: Arc<Messages>,
    max_depth: usize,
    depth: usize,
}

impl Validator {
    /// A validator with the built-in rules and no translation
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            tag_key: DEFAULT_TAG_KEY.to_string(),
            registry: RuleRegistry::with_builtins(),
            module: module.into(),
            errors: Errors::new(),
            lang_code: None,
            messages: Messages::new(),
            provider: Arc::new(NoTranslations),
            defaults: Arc::new(Messages::defaults()),
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    /// Use `provider` for translated messages
    pub fn with_provider(mut self, provider: impl MessageProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Replace the built-in message templates
    pub fn with_default_messages(mut self, messages: Messages) -> Self {
        self.defaults = Arc::new(messages);
        self
    }

    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// Read rule strings from `key` instead of `validate`
    pub fn set_tag_key(&mut self, key: impl Into<String>) {
        self.tag_key = key.into();
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Add, replace or (with `None`) remove a rule
    pub fn set_rule(&mut self, name: &str, rule: Option<Arc<dyn Rule>>) -> Result<()> {
        self.registry.set(name, rule)
    }

    pub fn register_rule<R: Rule + 'static>(&mut self, name: &str, rule: R) -> Result<()> {
        self.registry.register(name, rule)
    }

    pub fn remove_rule(&mut self, name: &str) -> Result<()> {
        self.registry.remove(name)
    }

    /// Turn on translated messages for `lang_code`
    ///
    /// Fetches this module's table from the provider right away.
    pub fn enable_translation(&mut self, lang_code: &str) -> Result<()> {
        if lang_code.is_empty() {
            return Err(Error::MissingLanguageCode);
        }
        self.messages = self.provider.messages(lang_code, &self.module);
        self.lang_code = Some(lang_code.to_string());
        debug!(
            module = %self.module,
            lang = lang_code,
            entries = self.messages.len(),
            "translation enabled"
        );
        Ok(())
    }

    pub fn lang_code(&self) -> Option<&str> {
        self.lang_code.as_deref()
    }

    pub fn is_translating(&self) -> bool {
        self.lang_code.is_some()
    }

    /// The translated messages installed by [`enable_translation`](Self::enable_translation)
    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Record an application-level error, ignored if `path` already has one
    pub fn add_error(&mut self, path: impl Into<String>, error: FieldError) {
        self.errors.add(path, error);
    }

    pub fn remove_error(&mut self, path: &str) -> Option<FieldError> {
        self.errors.remove(path)
    }

    /// Errors recorded so far and not yet returned by [`validate`](Self::validate)
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Parse a rule string against this validator's registry
    pub fn parse_tags(&self, raw: &str) -> std::result::Result<Vec<Tag>, TagError> {
        tag::parse_tags(raw, &self.registry)
    }

    /// Validate every field of `value`, returning the collected errors
    ///
    /// Errors added with [`add_error`](Self::add_error) beforehand are
    /// returned alongside. The validator is left empty and may be reused.
    pub fn validate<T: Describe + ?Sized>(&mut self, value: &T) -> std::result::Result<(), Errors> {
        self.walk(value);
        std::mem::take(&mut self.errors).into_result()
    }

    /// Run `tags` against `value` and record the first failure under `name`
    ///
    /// Returns `true` when no rule failed. Rules reporting an unsupported
    /// value or a bad parameter are logged and skipped.
    pub fn validate_field(&mut self, name: &str, value: &Value<'_>, tags: &[Tag]) -> bool {
        for tag in tags {
            match tag.check(value) {
                Outcome::Valid => {}
                Outcome::Failed => {
                    debug!(module = %self.module, field = name, rule = tag.name(), "rule failed");
                    let error = self.resolve(name, tag, value);
                    self.errors.add(name, error);
                    return false;
                }
                Outcome::Unsupported => {
                    warn!(
                        module = %self.module,
                        field = name,
                        rule = tag.name(),
                        kind = value.kind(),
                        "rule does not support this kind of value"
                    );
                }
                Outcome::BadParameter => {
                    warn!(
                        module = %self.module,
                        field = name,
                        rule = tag.name(),
                        param = tag.param(),
                        kind = value.kind(),
                        "rule parameter is invalid for this kind of value"
                    );
                }
            }
        }
        true
    }

    fn resolve(&self, field: &str, tag: &Tag, value: &Value<'_>) -> FieldError {
        let translations = self.lang_code.as_ref().map(|_| &self.messages);
        let args = [value.to_string(), tag.param().to_string()];
        MessageResolver::new(translations, &self.defaults)
            .resolve(&self.module, field, tag.name(), &args)
            .map_or(FieldError::Failed, FieldError::Message)
    }

    fn walk<T: Describe + ?Sized>(&mut self, record: &T) {
        for field in record.fields() {
            let raw = field.tag_value(&self.tag_key).unwrap_or_default();
            if raw == SKIP_FIELD {
                continue;
            }

            match self.field_tags(&field, raw) {
                Ok(tags) if tags.is_empty() => {}
                Ok(tags) => {
                    self.validate_field(field.name(), field.value(), &tags);
                }
                Err(err) => {
                    warn!(module = %self.module, field = field.name(), error = %err, "cannot parse rules");
                    self.errors.add(field.name(), err.into());
                }
            }

            self.descend(field.value(), field.name());
        }
    }

    /// Static specs first, then the rule string
    fn field_tags(&self, field: &Field<'_>, raw: &str) -> std::result::Result<Vec<Tag>, TagError> {
        let mut tags = tag::parse_specs(field.specs(), &self.registry)?;
        tags.extend(tag::parse_tags(raw, &self.registry)?);
        Ok(tags)
    }

    fn descend(&mut self, value: &Value<'_>, path: &str) {
        match value {
            Value::Record(record) => {
                if self.depth >= self.max_depth {
                    warn!(module = %self.module, path, limit = self.max_depth, "nesting too deep");
                    self.errors.add(path, FieldError::DepthExceeded { limit: self.max_depth });
                    return;
                }
                debug!(module = %self.module, path, depth = self.depth + 1, "descending into record");
                let mut child = self.child(path);
                child.walk(&**record);
                self.errors.append_scoped(path, child.errors);
            }
            Value::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.descend(item, &format!("{path}[{i}]"));
                }
            }
            Value::Map(entries) => {
                for (key, value) in entries {
                    self.descend(key, &format!("{path}[{key}](key)"));
                    self.descend(value, &format!("{path}[{key}](value)"));
                }
            }
            _ => {}
        }
    }

    /// A validator for a nested record, sharing rules and message sources
    fn child(&self, module: &str) -> Validator {
        let messages = match &self.lang_code {
            Some(lang_code) => self.provider.messages(lang_code, module),
            None => Messages::new(),
        };
        Validator {
            tag_key: self.tag_key.clone(),
            registry: self.registry.clone(),
            module: module.to_string(),
            errors: Errors::new(),
            lang_code: self.lang_code.clone(),
            messages,
            provider: Arc::clone(&self.provider),
            defaults: Arc::clone(&self.defaults),
            max_depth: self.max_depth,
            depth: self.depth + 1,
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("module", &self.module)
            .field("tag_key", &self.tag_key)
            .field("registry", &self.registry)
            .field("lang_code", &self.lang_code)
            .field("max_depth", &self.max_depth)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

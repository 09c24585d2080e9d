//! Field errors, the path-keyed error map and its response envelope
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::tag::TagError;

/// Top-level message of the validation response envelope
pub const VALIDATION_MESSAGE: &str = "Validation Error(s)";

/// Error recorded against one field path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A rule failed and its message was resolved
    #[error("{0}")]
    Message(String),

    /// A rule failed and no message template matched
    #[error("validation failed")]
    Failed,

    /// The field's rule string named a rule that is not registered
    #[error("unknown rule {name:?}")]
    UnknownRule { name: String },

    /// The field holds a record nested deeper than the validator allows
    #[error("maximum nesting depth of {limit} exceeded")]
    DepthExceeded { limit: usize },
}

impl FieldError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<TagError> for FieldError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::UnknownRule { name } => Self::UnknownRule { name },
        }
    }
}

/// Ordered field path to error map
///
/// The first error recorded for a path wins; later inserts for the same path
/// are ignored. Iteration and serialization follow insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: Vec<(String, FieldError)>,
    /// Path to position in `entries`
    index: HashMap<String, usize>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `error` at `path`
    ///
    /// Returns `false` when the path is empty or already has an error.
    pub fn add(&mut self, path: impl Into<String>, error: FieldError) -> bool {
        let path = path.into();
        if path.is_empty() || self.contains(&path) {
            return false;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push((path, error));
        true
    }

    pub fn remove(&mut self, path: &str) -> Option<FieldError> {
        let position = self.index.remove(path)?;
        let (_, error) = self.entries.remove(position);
        for (later, _) in &self.entries[position..] {
            if let Some(slot) = self.index.get_mut(later) {
                *slot -= 1;
            }
        }
        Some(error)
    }

    /// Merge `child` under `prefix`, keying each entry `prefix.path`
    pub fn append_scoped(&mut self, prefix: &str, child: Errors) {
        for (path, error) in child.entries {
            self.add(format!("{prefix}.{path}"), error);
        }
    }

    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.index.get(path).map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.entries.iter().map(|(path, error)| (path.as_str(), error))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    /// Path to display string, sorted by path
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(path, error)| (path.clone(), error.to_string()))
            .collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{VALIDATION_MESSAGE}:")?;
        for (path, error) in &self.entries {
            write!(f, "\n  {path}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

impl Serialize for Errors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, error) in &self.entries {
            map.serialize_entry(path, &error.to_string())?;
        }
        map.end()
    }
}

impl IntoIterator for Errors {
    type Item = (String, FieldError);
    type IntoIter = std::vec::IntoIter<(String, FieldError)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<P: Into<String>> Extend<(P, FieldError)> for Errors {
    fn extend<I: IntoIterator<Item = (P, FieldError)>>(&mut self, iter: I) {
        for (path, error) in iter {
            self.add(path, error);
        }
    }
}

impl<P: Into<String>> FromIterator<(P, FieldError)> for Errors {
    fn from_iter<I: IntoIterator<Item = (P, FieldError)>>(iter: I) -> Self {
        let mut errors = Self::new();
        errors.extend(iter);
        errors
    }
}

/// Body of a failed-validation response
///
/// Serializes as `{"message": "Validation Error(s)", "errors": {...}}`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationResponse<'a> {
    pub message: &'static str,
    pub errors: &'a Errors,
}

impl<'a> ValidationResponse<'a> {
    /// HTTP status that accompanies the envelope
    pub const STATUS: u16 = 400;

    pub fn new(errors: &'a Errors) -> Self {
        Self {
            message: VALIDATION_MESSAGE,
            errors,
        }
    }

    pub fn status(&self) -> u16 {
        Self::STATUS
    }
}

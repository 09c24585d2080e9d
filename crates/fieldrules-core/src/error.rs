//! Setup-time errors for validators and rule registries
//!
//! These are returned to the caller immediately and never collected into
//! an [`Errors`](crate::Errors) map.
//!
//! Copyright (c) 2025 Fieldrules Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Misuse of the validator API at configuration time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A rule was registered or removed under the empty name
    #[error("rule name cannot be empty")]
    EmptyRuleName,

    /// Translation was enabled without a language code
    #[error("language code not defined")]
    MissingLanguageCode,

    /// A top-level value that is not a record was handed to the engine
    #[error("cannot validate a top-level {kind} value, expected a record")]
    UnsupportedValue { kind: &'static str },
}

/// Result type for setup operations
pub type Result<T> = std::result::Result<T, Error>;

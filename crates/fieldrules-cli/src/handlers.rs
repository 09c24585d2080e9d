//! Command handlers for CLI subcommands
//!
//! Each subcommand lives in its own module; this module only wires them up.

mod completions;
mod config;
mod rules;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use rules::handle_rules;
pub use validate::handle_validate;

use crate::config::FileFormat;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a structured file, choosing the parser from its extension
///
/// `allowed` lists the formats the caller accepts; anything else is
/// reported as an invalid format.
pub(crate) fn read_structured<T: DeserializeOwned>(
    path: &Path,
    allowed: &[FileFormat],
) -> Result<T> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let expected = || {
        allowed
            .iter()
            .map(|format| format!("{:?}", format).to_lowercase())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let format = FileFormat::from_path(path)
        .filter(|format| allowed.contains(format))
        .ok_or_else(|| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: expected(),
        })?;

    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), ?format, "Read input file");

    Ok(match format {
        FileFormat::Json => serde_json::from_str(&content)?,
        FileFormat::Yaml => serde_yaml::from_str(&content)?,
        FileFormat::Toml => toml::from_str(&content)?,
    })
}

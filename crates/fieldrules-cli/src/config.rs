//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Command-line arguments, which take precedence

use crate::cli::{ConfigFormat, OutputFormat};
use crate::error::{Error, Result};
use fieldrules_core::{DEFAULT_MAX_DEPTH, DEFAULT_TAG_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Validation defaults
    pub validation: ValidationSettings,

    /// Output settings
    pub output: OutputSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Validation defaults applied when the command line does not override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Tag key rule strings are read from
    pub tag_key: String,

    /// Maximum nesting depth of records
    pub max_depth: usize,

    /// Module name when neither the schema nor the command line sets one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Language code for translated messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Message catalog file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level used when no -v flag is given (trace, debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Per-target levels, e.g. `fieldrules_core = "debug"`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            tag_key: DEFAULT_TAG_KEY.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            module: None,
            lang: None,
            messages: None,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

/// Serialization format of a configuration or data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Some(Self::Toml),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

impl From<ConfigFormat> for FileFormat {
    fn from(format: ConfigFormat) -> Self {
        match format {
            ConfigFormat::Toml => Self::Toml,
            ConfigFormat::Json => Self::Json,
            ConfigFormat::Yaml => Self::Yaml,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::from_path(path) {
            Some(FileFormat::Toml) => toml::from_str(&content)?,
            Some(FileFormat::Yaml) => serde_yaml::from_str(&content)?,
            Some(FileFormat::Json) => serde_json::from_str(&content)?,
            None => {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: "toml, yaml or json".to_string(),
                })
            }
        };

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from `file`, or else from the first default location that exists
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            return Self::from_file(path);
        }

        match Self::default_config_paths().into_iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Default configuration file paths, in search order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory
            PathBuf::from(".fieldrules.toml"),
            PathBuf::from(".fieldrules.yaml"),
            PathBuf::from(".fieldrules.json"),
        ];

        // User config directory
        if let Some(dir) = Self::user_config_dir() {
            paths.push(dir.join("config.toml"));
            paths.push(dir.join("config.yaml"));
            paths.push(dir.join("config.json"));
        }

        paths
    }

    /// The per-user configuration directory
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fieldrules"))
    }

    /// Render the configuration in the given format
    pub fn render(&self, format: FileFormat) -> Result<String> {
        Ok(match format {
            FileFormat::Toml => toml::to_string_pretty(self)?,
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(FileFormat::from_path(path).unwrap_or(FileFormat::Toml))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.validation.tag_key, "validate");
        assert_eq!(config.validation.max_depth, 32);
        assert_eq!(config.output.format, OutputFormat::Human);
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[validation]
lang = "en"

[output]
format = "json-pretty"

[logging.filters]
fieldrules_core = "debug"
"#,
        )
        .unwrap();

        assert_eq!(config.validation.lang.as_deref(), Some("en"));
        assert_eq!(config.validation.tag_key, "validate");
        assert_eq!(config.output.format, OutputFormat::JsonPretty);
        assert!(config.output.color);
        assert_eq!(
            config.logging.filters.get("fieldrules_core").map(String::as_str),
            Some("debug")
        );
    }

    #[test]
    fn test_save_and_load_each_format() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.validation.module = Some("Order".to_string());
        config.validation.max_depth = 8;
        config.logging.format = Some("json".to_string());
        config
            .logging
            .filters
            .insert("fieldrules_core".to_string(), "trace".to_string());

        for name in ["config.toml", "config.yaml", "config.json"] {
            let path = dir.path().join("nested").join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config, "round trip via {name}");
        }
    }

    #[test]
    fn test_missing_and_unknown_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            Config::from_file(&missing),
            Err(Error::FileNotFound { .. })
        ));

        let unknown = dir.path().join("config.ini");
        std::fs::write(&unknown, "x = 1").unwrap();
        assert!(matches!(
            Config::from_file(&unknown),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_explicit_file_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "validation:\n  module: Invoice\n").unwrap();

        let config = Config::load_with_file(Some(&path)).unwrap();
        assert_eq!(config.validation.module.as_deref(), Some("Invoice"));

        let missing = dir.path().join("gone.toml");
        assert!(matches!(
            Config::load_with_file(Some(&missing)),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_default_paths_start_in_current_directory() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".fieldrules.toml"));
        assert!(paths.len() >= 3);
    }
}

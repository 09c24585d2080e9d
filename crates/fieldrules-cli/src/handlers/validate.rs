//! Validation command handler

use super::read_structured;
use crate::cli::ValidateArgs;
use crate::config::{Config, FileFormat};
use crate::error::{Error, ErrorContext, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use fieldrules_core::{Catalog, Schema, Validator};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const DOCUMENT_FORMATS: &[FileFormat] = &[FileFormat::Json, FileFormat::Yaml];
const SCHEMA_FORMATS: &[FileFormat] = &[FileFormat::Json, FileFormat::Yaml, FileFormat::Toml];

/// Validation settings after merging the command line over the config file
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    module: String,
    tag_key: String,
    max_depth: usize,
    lang: Option<String>,
    messages: Option<PathBuf>,
}

impl Settings {
    fn resolve(args: &ValidateArgs, config: &Config, schema: &Schema) -> Self {
        let defaults = &config.validation;
        let module = args
            .module
            .clone()
            .or_else(|| schema.module.clone())
            .or_else(|| defaults.module.clone())
            .unwrap_or_else(|| document_stem(&args.document));

        Self {
            module,
            tag_key: args.tag_key.clone().unwrap_or_else(|| defaults.tag_key.clone()),
            max_depth: args.max_depth.unwrap_or(defaults.max_depth),
            lang: args.lang.clone().or_else(|| defaults.lang.clone()),
            messages: args.messages.clone().or_else(|| defaults.messages.clone()),
        }
    }

    fn build_validator(&self) -> Result<Validator> {
        let mut validator = Validator::new(self.module.clone()).with_max_depth(self.max_depth);
        validator.set_tag_key(self.tag_key.clone());

        if let Some(path) = &self.messages {
            let catalog: Catalog = read_structured(path, DOCUMENT_FORMATS)
                .with_context(|| format!("loading message catalog {}", path.display()))?;
            debug!(languages = ?catalog.languages(), "Loaded message catalog");
            validator = validator.with_provider(catalog);
        }

        if let Some(lang) = &self.lang {
            if self.messages.is_none() {
                warn!(lang = %lang, "No message catalog configured; using default messages");
            }
            validator.enable_translation(lang)?;
        }

        Ok(validator)
    }
}

/// Module name fallback taken from the document's file name
fn document_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Document")
        .to_string()
}

/// Handle the validate command
#[instrument(skip(config, output), fields(document = %args.document.display(), schema = %args.schema.display()))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &args.document.display().to_string());
    info!("Starting validation");
    output.info(&format!("Validating {}", args.document.display()))?;

    let schema: Schema = read_structured(&args.schema, SCHEMA_FORMATS)?;
    let document: serde_json::Value = read_structured(&args.document, DOCUMENT_FORMATS)?;
    debug!(fields = schema.fields.len(), "Loaded rule schema");

    let settings = Settings::resolve(&args, config, &schema);
    debug!(?settings, "Resolved validation settings");

    let mut validator = settings.build_validator()?;
    let record = schema.bind(&document)?;

    let outcome = {
        let _validation_timer = Timer::new("validation");
        validator.validate(&record)
    };

    match outcome {
        Ok(()) => {
            info!("Document is valid");
            output.success(&format!("✓ {} is valid", args.document.display()))?;
            if output.format() != crate::cli::OutputFormat::Human {
                output.data(&serde_json::json!({ "valid": true }))?;
            }
            Ok(())
        }
        Err(errors) => {
            warn!(count = errors.len(), "Validation failed");
            output.validation_errors(&errors)?;
            Err(Error::ValidationFailed {
                count: errors.len(),
            })
        }
    }
}

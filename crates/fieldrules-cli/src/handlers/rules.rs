//! Rules command handler

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::OutputWriter;
use fieldrules_core::{Messages, RuleRegistry};
use serde::Serialize;

/// One row of the rules listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Built-in rules with their default message templates, sorted by name
pub fn builtin_rules() -> Vec<RuleInfo> {
    let registry = RuleRegistry::with_builtins();
    let messages = Messages::defaults();

    registry
        .names()
        .into_iter()
        .map(|name| RuleInfo {
            name: name.to_string(),
            message: messages.get(name).map(str::to_string),
        })
        .collect()
}

/// Handle the rules command
pub fn handle_rules(output: &mut OutputWriter) -> Result<()> {
    let rules = builtin_rules();
    tracing::debug!(count = rules.len(), "Listing built-in rules");

    if output.format() == OutputFormat::Human {
        output.section("Built-in Rules")?;
        let rows = rules
            .into_iter()
            .map(|rule| vec![rule.name, rule.message.unwrap_or_default()])
            .collect();
        output.table(&["Rule", "Default message"], rows)
    } else {
        output.data(&rules)
    }
}

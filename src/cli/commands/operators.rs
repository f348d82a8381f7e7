//! Operators command implementation
//!
//! Lists the registered operators and the configured per-entity defaults.

use super::{exit_code_for, load_runtime_config, EXIT_OK};
use crate::anonymization::AnonymizerEngine;
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the operators command
#[derive(Args, Debug)]
pub struct OperatorsArgs {
    /// Print names as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl OperatorsArgs {
    /// Execute the operators command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_runtime_config(config_path, None) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "operators");
                eprintln!("Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };
        let engine = match config.build_engine() {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("{}", self.render(&engine, &config.anonymizer.operators)?);
        Ok(EXIT_OK)
    }

    fn render(
        &self,
        engine: &AnonymizerEngine,
        defaults: &std::collections::BTreeMap<String, crate::anonymization::OperatorConfig>,
    ) -> anyhow::Result<String> {
        let names = engine.supported_operators();
        if self.json {
            return Ok(serde_json::to_string(&names)?);
        }

        let mut lines = vec!["Registered operators:".to_string()];
        lines.extend(names.iter().map(|name| format!("  {name}")));
        if !defaults.is_empty() {
            lines.push(String::new());
            lines.push("Configured defaults:".to_string());
            lines.extend(
                defaults
                    .iter()
                    .map(|(entity, config)| format!("  {entity} -> {}", config.name)),
            );
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::OperatorConfig;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_json() {
        let args = OperatorsArgs { json: true };
        let rendered = args.render(&AnonymizerEngine::new(), &BTreeMap::new()).unwrap();
        let names: Vec<String> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            names,
            vec!["custom", "encrypt", "hash", "keep", "mask", "redact", "replace"]
        );
    }

    #[test]
    fn test_render_text_with_defaults() {
        let args = OperatorsArgs { json: false };
        let mut defaults = BTreeMap::new();
        defaults.insert("EMAIL_ADDRESS".to_string(), OperatorConfig::redact());
        let rendered = args.render(&AnonymizerEngine::new(), &defaults).unwrap();
        assert!(rendered.contains("  mask"));
        assert!(rendered.contains("EMAIL_ADDRESS -> redact"));
    }
}

//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Shroud configuration file.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates; the summary is printed only for a valid file.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!("{} ({})", config.logging.local_path, config.logging.local_rotation)
            } else {
                "disabled".to_string()
            }
        );
        println!("  Conflict Policy: {}", config.anonymizer.conflict_policy);
        println!("  Minimum Score: {}", config.anonymizer.min_score);
        println!(
            "  Whitespace Merging: {}",
            config.anonymizer.merge_whitespace_separated
        );
        for (entity, operator) in &config.anonymizer.operators {
            println!("  Operator {entity}: {}", operator.name);
        }
        println!(
            "  Context Scoring: {}",
            if config.context.enabled {
                format!("{} entity types", config.context.words.len())
            } else {
                "disabled".to_string()
            }
        );
        println!(
            "  Encryption Key: {}",
            if config.encryption_key().is_some() {
                "configured"
            } else {
                "not set"
            }
        );
        println!();
        Ok(EXIT_OK)
    }
}

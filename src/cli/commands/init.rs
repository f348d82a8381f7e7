//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "shroud.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Shroud configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your operator defaults", self.output);
                println!("  2. Set SHROUD_ENCRYPTION_KEY if you use the encrypt operator");
                println!("  3. Validate configuration: shroud validate-config");
                println!("  4. Anonymize: shroud anonymize --input request.json");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Shroud Configuration File

[application]
log_level = "info"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
json_format = true

[anonymizer]
conflict_policy = "select_winner"
merge_whitespace_separated = false
min_score = 0.0

[anonymizer.operators.EMAIL_ADDRESS]
name = "redact"

[context]
enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Shroud Configuration File
#
# Every section is optional. Values of the form ${VAR} are replaced with
# environment variables when the file is loaded; SHROUD_* variables
# override individual settings afterwards.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging
local_enabled = false

# Directory for log files
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"

# Write file logs as JSON lines
json_format = true

# ============================================================================
# Anonymizer
# ============================================================================
[anonymizer]
# How overlapping spans are reconciled:
# - select_winner: one span per overlap cluster (highest score, then longest)
# - merge_same_type: union overlapping spans of one entity type first
conflict_policy = "select_winner"

# With merge_same_type, also merge same-type spans separated only by whitespace
merge_whitespace_separated = false

# Drop spans scoring below this threshold (0.0 - 1.0)
min_score = 0.0

# Default operator per entity type. Entity types without an entry are
# replaced with <ENTITY_TYPE>. A DEFAULT entry applies to all others.

[anonymizer.operators.EMAIL_ADDRESS]
name = "redact"

[anonymizer.operators.CREDIT_CARD]
name = "mask"
params = { masking_char = "*", chars_to_mask = 12, from_end = true }

[anonymizer.operators.US_SSN]
name = "hash"
params = { hash_type = "sha256" }

[anonymizer.operators.PERSON]
name = "replace"
params = { new_value = "<PERSON>" }

# Reversible: requires [encryption] key or SHROUD_ENCRYPTION_KEY
# [anonymizer.operators.PHONE_NUMBER]
# name = "encrypt"

# ============================================================================
# Context Scoring
# ============================================================================
[context]
# Boost spans whose surrounding words match the lists below
enabled = true

# Words inspected before and after each span
prefix_words = 5
suffix_words = 0

# Score becomes max(min(score + boost, 1.0), min_score_with_context)
boost = 0.35
min_score_with_context = 0.4

[context.words]
PHONE_NUMBER = ["phone", "call", "tel", "mobile"]
CREDIT_CARD = ["card", "visa", "mastercard"]

# ============================================================================
# Encryption
# ============================================================================
[encryption]
# AES key of 16, 24 or 32 bytes (use an environment variable)
# key = "${SHROUD_KEY}"
"#
        .to_string()
    }
}

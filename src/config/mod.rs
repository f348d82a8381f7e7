//! Configuration management for Shroud.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Shroud uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SHROUD_*` environment variable overrides
//! - Default values for every section
//! - Validation that resolves every configured operator
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use shroud::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shroud.toml")?;
//! let engine = config.build_engine()?;
//! println!("Operators: {:?}", engine.supported_operators());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`LoggingConfig`] - Local file logging
//! - [`AnonymizerConfig`](crate::anonymization::AnonymizerConfig) - Conflict policy, thresholds, default operators
//! - [`ContextConfig`](crate::anonymization::ContextConfig) - Context word scoring
//! - [`EncryptionConfig`] - Key for `encrypt` and deanonymization
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymizer]
//! conflict_policy = "select_winner"
//! min_score = 0.3
//!
//! [anonymizer.operators.EMAIL_ADDRESS]
//! name = "redact"
//!
//! [anonymizer.operators.CREDIT_CARD]
//! name = "mask"
//! params = { masking_char = "*", chars_to_mask = 12, from_end = false }
//!
//! [context]
//! enabled = true
//!
//! [context.words]
//! PHONE_NUMBER = ["phone", "call", "tel"]
//!
//! [encryption]
//! key = "${SHROUD_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{ApplicationConfig, EncryptionConfig, LoggingConfig, ShroudConfig};
pub use secret::{secret_string, SecretString, SecretValue};

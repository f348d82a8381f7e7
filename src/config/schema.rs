//! Configuration schema types
//!
//! This module defines the configuration structure that maps to `shroud.toml`.

use crate::anonymization::config::{build_engine, AnonymizerConfig, ContextConfig};
use crate::anonymization::engine::AnonymizerEngine;
use crate::config::SecretString;
use crate::domain::Result;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Main Shroud configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShroudConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Overlap resolution and default operators
    #[serde(default)]
    pub anonymizer: AnonymizerConfig,

    /// Context-aware score adjustment
    #[serde(default)]
    pub context: ContextConfig,

    /// Key for `encrypt` and deanonymization
    #[serde(default)]
    pub encryption: EncryptionConfig,
}

impl ShroudConfig {
    /// Validates the configuration
    ///
    /// Every configured operator is resolved through a fresh registry, so an
    /// unknown operator name or bad parameter fails here rather than at the
    /// first anonymization call.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.logging.validate()?;
        self.encryption.validate()?;
        self.anonymizer
            .validate(self.encryption_key())
            .map_err(|e| format!("[anonymizer] {e}"))?;
        self.context
            .validate()
            .map_err(|e| format!("[context] {e}"))?;
        Ok(())
    }

    /// Configured encryption key, if any
    pub fn encryption_key(&self) -> Option<&str> {
        self.encryption
            .key
            .as_ref()
            .map(|key| key.expose_secret().as_ref())
    }

    /// Engine built from the `[anonymizer]` and `[context]` sections
    pub fn build_engine(&self) -> Result<AnonymizerEngine> {
        build_engine(&self.anonymizer, &self.context, self.encryption_key())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Write file logs as JSON lines
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must be set when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            json_format: true,
        }
    }
}

/// Encryption configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// AES key as a UTF-8 string of 16, 24 or 32 bytes
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub key: Option<SecretString>,
}

impl EncryptionConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(key) = &self.key {
            let length = key.expose_secret().as_ref().len();
            if !matches!(length, 16 | 24 | 32) {
                return Err(format!(
                    "encryption.key must be 16, 24 or 32 bytes, got {length}"
                ));
            }
        }
        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

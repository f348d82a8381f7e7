//! CLI command implementations
//!
//! Every command returns an exit code:
//! - `0` success
//! - `2` configuration error
//! - `3` input or transformation error
//! - `5` fatal error

pub mod anonymize;
pub mod batch;
pub mod deanonymize;
pub mod init;
pub mod operators;
pub mod validate;

use crate::config::{load_config, secret_string, ShroudConfig};
use crate::domain::{Result, ShroudError};
use std::io::{Read, Write};
use std::path::Path;

pub const EXIT_OK: i32 = 0;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_INPUT: i32 = 3;
pub const EXIT_FATAL: i32 = 5;

/// Exit code for a library error
pub fn exit_code_for(error: &ShroudError) -> i32 {
    match error {
        ShroudError::Configuration(_) | ShroudError::InvalidKey { .. } => EXIT_CONFIG,
        ShroudError::Io(_) => EXIT_FATAL,
        _ => EXIT_INPUT,
    }
}

/// Load `config_path`, or defaults if the file does not exist
///
/// A key given on the command line replaces the configured one and the
/// result is re-validated.
pub(crate) fn load_runtime_config(
    config_path: &str,
    encryption_key: Option<&str>,
) -> Result<ShroudConfig> {
    let mut config = if Path::new(config_path).exists() {
        load_config(config_path)?
    } else {
        tracing::debug!(config_path = %config_path, "Configuration file not found, using defaults");
        ShroudConfig::default()
    };

    if let Some(key) = encryption_key {
        config.encryption.key = Some(secret_string(key.to_string()));
        config
            .validate()
            .map_err(|e| ShroudError::Configuration(format!("Configuration validation failed: {e}")))?;
    }

    Ok(config)
}

/// Read a file, or stdin when no path is given
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            ShroudError::Io(format!("Failed to read {}: {}", path.display(), e))
        }),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Write to a file, or stdout when no path is given
pub(crate) fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents).map_err(|e| {
            ShroudError::Io(format!("Failed to write {}: {}", path.display(), e))
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

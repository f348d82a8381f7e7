//! Deanonymize command implementation
//!
//! Reads `{"text", "mapping"}` JSON, as written by `anonymize`, and writes
//! `{"text"}` with every encrypted range restored.

use super::{exit_code_for, load_runtime_config, read_input, write_output, EXIT_OK};
use crate::anonymization::{Deanonymizer, EncryptionKey, MappingStore};
use crate::domain::{Result, ShroudError};
use crate::{log_error_with_context, log_operation_complete};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

/// Anonymized text plus the mapping needed to restore it
#[derive(Debug, Clone, Deserialize)]
pub struct DeanonymizeRequest {
    pub text: String,
    pub mapping: MappingStore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeanonymizeResponse {
    pub text: String,
}

/// Arguments for the deanonymize command
#[derive(Args, Debug)]
pub struct DeanonymizeArgs {
    /// Input JSON file (stdin if omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Key used when the text was encrypted
    #[arg(long, env = "SHROUD_ENCRYPTION_KEY", hide_env_values = true)]
    pub encryption_key: Option<String>,
}

impl DeanonymizeArgs {
    /// Execute the deanonymize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let start_time = Instant::now();

        match self.run(config_path) {
            Ok(entries) => {
                log_operation_complete!("deanonymize", entries, start_time.elapsed());
                Ok(EXIT_OK)
            }
            Err(e) => {
                log_error_with_context!(&e, "deanonymize");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    fn run(&self, config_path: &str) -> Result<usize> {
        let config = load_runtime_config(config_path, self.encryption_key.as_deref())?;
        let key = config.encryption_key().ok_or_else(|| {
            ShroudError::Configuration(
                "No encryption key: pass --encryption-key, set SHROUD_ENCRYPTION_KEY or [encryption] key"
                    .to_string(),
            )
        })?;
        let key = EncryptionKey::from_str_key(key)?;

        let request: DeanonymizeRequest =
            serde_json::from_str(&read_input(self.input.as_deref())?)?;
        let text = Deanonymizer::deanonymize(&request.text, &request.mapping, &key)?;

        let json = serde_json::to_string(&DeanonymizeResponse { text })?;
        write_output(self.output.as_deref(), &json)?;

        Ok(request.mapping.len())
    }
}

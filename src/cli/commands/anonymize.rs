//! Anonymize command implementation
//!
//! Reads `{"text", "spans", "operators"?}` JSON and writes
//! `{"text", "items", "mapping"}` JSON.

use super::{exit_code_for, load_runtime_config, read_input, write_output, EXIT_OK};
use crate::anonymization::{
    AnonymizationOutput, AnonymizerEngine, ItemResult, MappingStore, OperatorOverrides, Span,
};
use crate::domain::Result;
use crate::{log_error_with_context, log_operation_complete};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

/// One anonymization request
#[derive(Debug, Clone, Deserialize)]
pub struct AnonymizeRequest {
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    /// Per-call operator overrides keyed by entity type
    #[serde(default)]
    pub operators: OperatorOverrides,
}

/// One anonymization response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizeResponse {
    pub text: String,
    pub items: Vec<ItemResult>,
    pub mapping: MappingStore,
}

impl From<AnonymizationOutput> for AnonymizeResponse {
    fn from(output: AnonymizationOutput) -> Self {
        Self {
            text: output.result.text,
            items: output.result.items,
            mapping: output.mapping,
        }
    }
}

/// Run one request through `engine`
///
/// `encrypt` overrides without a `key` parameter use `encryption_key`.
pub fn process_request(
    engine: &AnonymizerEngine,
    request: AnonymizeRequest,
    encryption_key: Option<&str>,
) -> Result<AnonymizeResponse> {
    let overrides: OperatorOverrides = match encryption_key {
        Some(key) => request
            .operators
            .into_iter()
            .map(|(entity_type, config)| (entity_type, config.with_default_key(key)))
            .collect(),
        None => request.operators,
    };
    let overrides = (!overrides.is_empty()).then_some(&overrides);

    engine
        .anonymize(&request.text, &request.spans, overrides)
        .map(AnonymizeResponse::from)
}

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Input JSON file (stdin if omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Key for the encrypt operator (16, 24 or 32 bytes)
    #[arg(long, env = "SHROUD_ENCRYPTION_KEY", hide_env_values = true)]
    pub encryption_key: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pub pretty: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let start_time = Instant::now();

        match self.run(config_path) {
            Ok(items) => {
                log_operation_complete!("anonymize", items, start_time.elapsed());
                Ok(EXIT_OK)
            }
            Err(e) => {
                log_error_with_context!(&e, "anonymize");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    fn run(&self, config_path: &str) -> Result<usize> {
        let config = load_runtime_config(config_path, self.encryption_key.as_deref())?;
        let engine = config.build_engine()?;

        let request: AnonymizeRequest = serde_json::from_str(&read_input(self.input.as_deref())?)?;
        let response = process_request(&engine, request, config.encryption_key())?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        write_output(self.output.as_deref(), &json)?;

        Ok(response.items.len())
    }
}

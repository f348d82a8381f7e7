//! Batch command implementation
//!
//! Anonymizes a JSONL file of independent requests. Documents are fanned out
//! over blocking worker threads with bounded concurrency; output lines keep
//! input order. A failing line produces an error record and does not stop
//! the rest.

use super::anonymize::{process_request, AnonymizeRequest, AnonymizeResponse};
use super::{exit_code_for, load_runtime_config, read_input, write_output, EXIT_INPUT, EXIT_OK};
use crate::domain::{Result, ShroudError};
use crate::{log_batch_processing, log_error_with_context, log_operation_complete};
use clap::Args;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// One output line
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchRecord {
    Anonymized(AnonymizeResponse),
    Failed { line: usize, error: String },
}

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input JSONL file, one request per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output JSONL file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum documents processed at once
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Key for the encrypt operator (16, 24 or 32 bytes)
    #[arg(long, env = "SHROUD_ENCRYPTION_KEY", hide_env_values = true)]
    pub encryption_key: Option<String>,
}

impl BatchArgs {
    /// Execute the batch command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let start_time = Instant::now();

        match self.run(config_path).await {
            Ok((total, 0)) => {
                log_operation_complete!("batch", total, start_time.elapsed());
                Ok(EXIT_OK)
            }
            Ok((total, failed)) => {
                tracing::warn!(total, failed, "Batch completed with failures");
                eprintln!("{failed} of {total} documents failed");
                Ok(EXIT_INPUT)
            }
            Err(e) => {
                log_error_with_context!(&e, "batch");
                eprintln!("Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    /// Returns (documents, failed documents)
    async fn run(&self, config_path: &str) -> Result<(usize, usize)> {
        let config = load_runtime_config(config_path, self.encryption_key.as_deref())?;
        let engine = Arc::new(config.build_engine()?);
        let key: Option<Arc<str>> = config.encryption_key().map(Arc::from);

        let input = read_input(Some(self.input.as_path()))?;
        let lines: Vec<(usize, String)> = input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| (index + 1, line.to_string()))
            .collect();
        let total = lines.len();

        tracing::info!(
            documents = total,
            concurrency = self.concurrency,
            "Starting batch anonymization"
        );

        let records: Vec<BatchRecord> = stream::iter(lines)
            .map(|(line, raw)| {
                let engine = Arc::clone(&engine);
                let key = key.clone();
                async move {
                    let outcome = tokio::task::spawn_blocking(move || -> Result<AnonymizeResponse> {
                        let request: AnonymizeRequest = serde_json::from_str(&raw)?;
                        process_request(&engine, request, key.as_deref())
                    })
                    .await
                    .unwrap_or_else(|e| Err(ShroudError::Io(format!("Worker task failed: {e}"))));

                    match outcome {
                        Ok(response) => BatchRecord::Anonymized(response),
                        Err(e) => {
                            tracing::debug!(line, error = %e, "Document failed");
                            BatchRecord::Failed {
                                line,
                                error: e.to_string(),
                            }
                        }
                    }
                }
            })
            .buffered(usize::from(self.concurrency))
            .enumerate()
            .map(|(done, record)| {
                log_batch_processing!(done + 1, total);
                record
            })
            .collect()
            .await;

        let failed = records
            .iter()
            .filter(|record| matches!(record, BatchRecord::Failed { .. }))
            .count();

        let output = records
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .join("\n");
        write_output(self.output.as_deref(), &output)?;

        Ok((total, failed))
    }
}

//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Shroud using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Shroud - span resolution and reversible anonymization
#[derive(Parser, Debug)]
#[command(name = "shroud")]
#[command(version, about, long_about = None)]
#[command(author = "Shroud Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "shroud.toml", env = "SHROUD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SHROUD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize one JSON request of text plus detector spans
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Restore encrypted ranges from an anonymize response
    Deanonymize(commands::deanonymize::DeanonymizeArgs),

    /// Anonymize a JSONL file of requests concurrently
    Batch(commands::batch::BatchArgs),

    /// List registered operators
    Operators(commands::operators::OperatorsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Run the selected command and return its exit code
    pub async fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Anonymize(args) => args.execute(&self.config).await,
            Commands::Deanonymize(args) => args.execute(&self.config).await,
            Commands::Batch(args) => args.execute(&self.config).await,
            Commands::Operators(args) => args.execute(&self.config).await,
            Commands::ValidateConfig(args) => args.execute(&self.config).await,
            Commands::Init(args) => args.execute().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_anonymize() {
        let cli = Cli::parse_from(["shroud", "anonymize", "--input", "request.json"]);
        assert_eq!(cli.config, "shroud.toml");
        match cli.command {
            Commands::Anonymize(args) => {
                assert_eq!(args.input.unwrap().to_string_lossy(), "request.json");
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["shroud", "--config", "custom.toml", "operators"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Operators(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["shroud", "--log-level", "debug", "operators"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_batch() {
        let cli = Cli::parse_from([
            "shroud",
            "batch",
            "--input",
            "docs.jsonl",
            "--concurrency",
            "16",
        ]);
        match cli.command {
            Commands::Batch(args) => assert_eq!(args.concurrency, 16),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_concurrency() {
        let result = Cli::try_parse_from(["shroud", "batch", "--input", "a", "--concurrency", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_deanonymize_with_key() {
        let cli = Cli::parse_from([
            "shroud",
            "deanonymize",
            "--encryption-key",
            "0123456789abcdef",
        ]);
        assert!(matches!(cli.command, Commands::Deanonymize(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["shroud", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["shroud", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(args) if args.force));
    }
}

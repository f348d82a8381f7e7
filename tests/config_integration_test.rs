//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use shroud::anonymization::{ConflictPolicy, Span};
use shroud::config::load_config;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("SHROUD_APPLICATION_LOG_LEVEL");
    std::env::remove_var("SHROUD_LOGGING_LOCAL_ENABLED");
    std::env::remove_var("SHROUD_LOGGING_LOCAL_PATH");
    std::env::remove_var("SHROUD_ANONYMIZER_CONFLICT_POLICY");
    std::env::remove_var("SHROUD_ANONYMIZER_MIN_SCORE");
    std::env::remove_var("SHROUD_ENCRYPTION_KEY");
    std::env::remove_var("TEST_SHROUD_KEY");
    std::env::remove_var("TEST_SHROUD_TOKEN");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[logging]
local_enabled = false
local_path = "/tmp/shroud"
local_rotation = "hourly"
json_format = false

[anonymizer]
conflict_policy = "merge_same_type"
merge_whitespace_separated = true
min_score = 0.25

[anonymizer.operators.DEFAULT]
name = "replace"
params = { new_value = "[REDACTED]" }

[anonymizer.operators.PHONE_NUMBER]
name = "mask"
params = { masking_char = "*", chars_to_mask = 4, from_end = true }

[anonymizer.operators.PERSON]
name = "encrypt"

[context]
enabled = true
prefix_words = 3
suffix_words = 1
boost = 0.3
min_score_with_context = 0.5

[context.words]
PHONE_NUMBER = ["phone", "tel"]

[encryption]
key = "WmZq4t7w!z%C&F)J"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");

    assert_eq!(config.logging.local_path, "/tmp/shroud");
    assert_eq!(config.logging.local_rotation, "hourly");
    assert!(!config.logging.json_format);

    assert_eq!(config.anonymizer.conflict_policy, ConflictPolicy::MergeSameType);
    assert!(config.anonymizer.merge_whitespace_separated);
    assert_eq!(config.anonymizer.min_score, 0.25);
    assert_eq!(config.anonymizer.operators.len(), 3);

    assert!(config.context.enabled);
    assert_eq!(config.context.prefix_words, 3);
    assert_eq!(config.context.suffix_words, 1);
    assert_eq!(config.context.words["PHONE_NUMBER"], vec!["phone", "tel"]);

    assert_eq!(config.encryption_key(), Some("WmZq4t7w!z%C&F)J"));

    // The configured engine applies the defaults
    let engine = config.build_engine().unwrap();
    let text = "Dr Smith, tel 5551234567, room 12";
    let spans = vec![
        Span::new("PERSON", 3, 8, 0.9).unwrap(),
        Span::new("PHONE_NUMBER", 14, 24, 0.3).unwrap(),
        Span::new("LOCATION", 26, 33, 0.6).unwrap(),
    ];
    let output = engine.anonymize(text, &spans, None).unwrap();
    assert!(output.is_reversible());
    assert!(output.text().contains("555123****"));
    assert!(output.text().ends_with("[REDACTED]"));
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[application]\n");
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert!(!config.logging.local_enabled);
    assert_eq!(config.anonymizer.conflict_policy, ConflictPolicy::SelectWinner);
    assert_eq!(config.anonymizer.min_score, 0.0);
    assert!(config.anonymizer.operators.is_empty());
    assert!(!config.context.enabled);
    assert!(config.encryption_key().is_none());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_SHROUD_KEY", "0123456789abcdef");
    std::env::set_var("TEST_SHROUD_TOKEN", "<hidden>");

    let temp_file = write_config(
        r#"
[anonymizer.operators.DEFAULT]
name = "replace"
params = { new_value = "${TEST_SHROUD_TOKEN}" }

[encryption]
key = "${TEST_SHROUD_KEY}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.encryption_key(), Some("0123456789abcdef"));
    assert_eq!(
        config.anonymizer.operators["DEFAULT"].param_str("new_value"),
        Some("<hidden>")
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[encryption]\nkey = \"${TEST_SHROUD_KEY}\"\n");
    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("TEST_SHROUD_KEY"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("SHROUD_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("SHROUD_ANONYMIZER_CONFLICT_POLICY", "merge_same_type");
    std::env::set_var("SHROUD_ANONYMIZER_MIN_SCORE", "0.6");
    std::env::set_var("SHROUD_ENCRYPTION_KEY", "fedcba9876543210");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[anonymizer]
conflict_policy = "select_winner"
min_score = 0.1
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.anonymizer.conflict_policy, ConflictPolicy::MergeSameType);
    assert_eq!(config.anonymizer.min_score, 0.6);
    assert_eq!(config.encryption_key(), Some("fedcba9876543210"));

    cleanup_env_vars();
}

#[test]
fn test_invalid_policy_override() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("SHROUD_ANONYMIZER_CONFLICT_POLICY", "first_wins");

    let temp_file = write_config("[application]\n");
    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("SHROUD_ANONYMIZER_CONFLICT_POLICY"));

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    for content in [
        "[application]\nlog_level = \"invalid_level\"\n",
        "[anonymizer]\nconflict_policy = \"first_wins\"\n",
        "[anonymizer]\nmin_score = 2.0\n",
        "[anonymizer.operators.PERSON]\nname = \"scramble\"\n",
        "[anonymizer.operators.PERSON]\nname = \"encrypt\"\n",
        "[context]\nenabled = true\n",
        "[encryption]\nkey = \"too-short\"\n",
    ] {
        let temp_file = write_config(content);
        assert!(
            load_config(temp_file.path()).is_err(),
            "accepted invalid config: {content}"
        );
    }
}

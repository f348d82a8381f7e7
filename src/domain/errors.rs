//! Domain error types
//!
//! This module defines the error hierarchy for Shroud. Every failure of the
//! anonymization core is surfaced synchronously to the caller with enough
//! structured detail (offending span, operator name, output offsets) to log it
//! without re-deriving state. None of these errors are transient, so nothing
//! in the crate retries them.

use thiserror::Error;

/// Main Shroud error type
#[derive(Debug, Error)]
pub enum ShroudError {
    /// Malformed or out-of-range span. Rejects the whole batch.
    #[error("Invalid span {entity_type} [{start}, {end}): {reason}")]
    InvalidSpan {
        entity_type: String,
        start: usize,
        end: usize,
        reason: String,
    },

    /// Operator name not present in the registry
    #[error("Unknown operator: {name}")]
    UnknownOperator { name: String },

    /// An operator's precondition failed, either while validating its
    /// parameters or while producing a replacement
    #[error("Operator '{operator}' failed for entity {entity_type}: {reason}")]
    OperatorApplication {
        operator: String,
        entity_type: String,
        reason: String,
    },

    /// Wrong key, corrupt or tampered reversal payload
    #[error("Decryption failed for output range [{output_start}, {output_end}): {reason}")]
    Decryption {
        output_start: usize,
        output_end: usize,
        reason: String,
    },

    /// A mapping entry no longer fits the supplied text
    #[error(
        "Mapping entry [{output_start}, {output_end}) does not fit text of length {text_len}: {reason}"
    )]
    MappingMismatch {
        output_start: usize,
        output_end: usize,
        text_len: usize,
        reason: String,
    },

    /// A reversible mapping entry carries no payload at all
    #[error("Mapping entry [{output_start}, {output_end}) has no reversal payload")]
    MissingPayload {
        output_start: usize,
        output_end: usize,
    },

    /// Encryption key of unsupported length
    #[error("Invalid encryption key length: {length} bytes (expected 16, 24 or 32)")]
    InvalidKey { length: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ShroudError {
    /// Builds an [`ShroudError::InvalidSpan`] from span coordinates
    pub fn invalid_span(
        entity_type: impl Into<String>,
        start: usize,
        end: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSpan {
            entity_type: entity_type.into(),
            start,
            end,
            reason: reason.into(),
        }
    }

    /// Builds an [`ShroudError::OperatorApplication`]
    pub fn operator(
        operator: impl Into<String>,
        entity_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::OperatorApplication {
            operator: operator.into(),
            entity_type: entity_type.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while reversing a transformation
    pub fn is_deanonymization_error(&self) -> bool {
        matches!(
            self,
            Self::Decryption { .. } | Self::MappingMismatch { .. } | Self::MissingPayload { .. }
        )
    }
}

impl From<std::io::Error> for ShroudError {
    fn from(err: std::io::Error) -> Self {
        ShroudError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ShroudError {
    fn from(err: serde_json::Error) -> Self {
        ShroudError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ShroudError {
    fn from(err: toml::de::Error) -> Self {
        ShroudError::Configuration(format!("TOML parse error: {err}"))
    }
}

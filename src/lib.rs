// Shroud - span resolution and reversible anonymization
// Copyright (c) 2026 Shroud Contributors
// Licensed under the MIT License

//! # Shroud
//!
//! Shroud turns text plus candidate PII spans from upstream detectors into
//! anonymized text. It does not detect anything itself.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** overlapping, possibly conflicting spans into a deterministic
//!   non-overlapping set
//! - **Transforming** each span with a configurable operator (`redact`,
//!   `replace`, `mask`, `hash`, `encrypt`, `keep`, `custom`)
//! - **Reporting** every transformed span at its position in the output text
//! - **Reversing** `encrypt` transformations with authenticated decryption
//!
//! ## Architecture
//!
//! - [`anonymization`] - Resolver, operators, registry, engine, deanonymizer
//! - [`domain`] - Error taxonomy and `Result` alias
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust
//! use shroud::anonymization::{AnonymizerEngine, OperatorConfig, OperatorOverrides, Span};
//!
//! # fn main() -> Result<(), shroud::domain::ShroudError> {
//! let text = "card 4111111111111111";
//! let spans = vec![Span::new("CREDIT_CARD", 5, 21, 0.9)?];
//!
//! let mut overrides = OperatorOverrides::new();
//! overrides.insert("CREDIT_CARD".to_string(), OperatorConfig::mask('*', 12, true));
//!
//! let output = AnonymizerEngine::new().anonymize(text, &spans, Some(&overrides))?;
//! assert_eq!(output.text(), "card 4111************");
//! # Ok(())
//! # }
//! ```
//!
//! ## Reversible Anonymization
//!
//! ```rust
//! use shroud::anonymization::{
//!     AnonymizerEngine, Deanonymizer, EncryptionKey, OperatorConfig, OperatorOverrides, Span,
//! };
//!
//! # fn main() -> Result<(), shroud::domain::ShroudError> {
//! let key = "WmZq4t7w!z%C&F)J";
//! let mut overrides = OperatorOverrides::new();
//! overrides.insert("DEFAULT".to_string(), OperatorConfig::encrypt(key));
//!
//! let text = "Jane called";
//! let output = AnonymizerEngine::new()
//!     .anonymize(text, &[Span::new("PERSON", 0, 4, 0.9)?], Some(&overrides))?;
//!
//! let restored =
//!     Deanonymizer::deanonymize(output.text(), &output.mapping, &EncryptionKey::from_str_key(key)?)?;
//! assert_eq!(restored, text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`domain::ShroudError`]; nothing is retried and no
//! partially anonymized text is ever returned.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;

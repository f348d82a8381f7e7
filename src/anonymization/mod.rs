//! Span resolution and anonymization
//!
//! Takes text plus candidate PII spans from upstream detectors and produces
//! anonymized text, a per-span report, and, when `encrypt` is used, a mapping
//! that allows the original to be restored.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Context scoring** (optional): boosts spans with nearby context words
//! - **Overlap resolution**: deterministic reduction to non-overlapping spans
//! - **Operator resolution**: per-call overrides, configured defaults, system default
//! - **Transformation**: right-to-left splicing with output-positioned results
//! - **Deanonymization**: authenticated decryption of `encrypt` ranges
//!
//! Detection itself is out of scope; spans come from the caller.
//!
//! # Usage
//!
//! ```
//! use shroud::anonymization::{AnonymizerEngine, Span};
//!
//! let engine = AnonymizerEngine::new();
//! let output = engine.anonymize("Hi John", &[Span::new("PERSON", 3, 7, 0.9)?], None)?;
//! assert_eq!(output.text(), "Hi <PERSON>");
//! # Ok::<(), shroud::domain::ShroudError>(())
//! ```

pub mod config;
pub mod context;
pub mod crypto;
pub mod deanonymizer;
pub mod engine;
pub mod models;
pub mod operators;
pub mod registry;
pub mod resolver;

// Re-export main types
pub use config::{AnonymizerConfig, ContextConfig};
pub use context::{ContextScorer, KeywordContextScorer};
pub use crypto::EncryptionKey;
pub use deanonymizer::Deanonymizer;
pub use engine::{AnonymizerEngine, TransformationEngine};
pub use models::{
    AnonymizationOutput, ItemResult, MappingEntry, MappingStore, ResolvedSpans, Span,
    TransformationResult,
};
pub use operators::{Operator, OperatorConfig};
pub use registry::{OperatorOverrides, OperatorRegistry};
pub use resolver::{ConflictPolicy, OverlapResolver};

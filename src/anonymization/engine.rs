//! Transformation engine
//!
//! This module provides [`TransformationEngine`], which applies operators to
//! resolved spans, and [`AnonymizerEngine`], the facade that runs context
//! scoring, overlap resolution and transformation in one call.
//!
//! # Architecture
//!
//! One call runs three sequential stages:
//! - **Scoring** (optional): a [`ContextScorer`] re-scores spans from nearby words
//! - **Resolution**: [`OverlapResolver`] reduces raw spans to a non-overlapping set
//! - **Transformation**: operators are resolved, applied, and spliced right-to-left
//!
//! The engine holds no mutable state. Independent texts can be processed on
//! any number of threads by sharing one engine behind an `Arc`.
//!
//! # Examples
//!
//! ```
//! use shroud::anonymization::engine::AnonymizerEngine;
//! use shroud::anonymization::models::Span;
//! use shroud::anonymization::operators::OperatorConfig;
//! use shroud::anonymization::registry::OperatorOverrides;
//!
//! let engine = AnonymizerEngine::new();
//! let text = "My name is John Doe and my email is john@example.com";
//! let spans = vec![
//!     Span::new("PERSON", 11, 19, 0.85)?,
//!     Span::new("EMAIL_ADDRESS", 36, 52, 0.95)?,
//! ];
//!
//! let mut overrides = OperatorOverrides::new();
//! overrides.insert("PERSON".to_string(), OperatorConfig::replace(None));
//! overrides.insert("EMAIL_ADDRESS".to_string(), OperatorConfig::redact());
//!
//! let output = engine.anonymize(text, &spans, Some(&overrides))?;
//! assert_eq!(output.text(), "My name is <PERSON> and my email is ");
//! assert_eq!(output.items()[0].start, 11);
//! assert_eq!(output.items()[0].end, 19);
//! # Ok::<(), shroud::domain::ShroudError>(())
//! ```

use crate::anonymization::{
    context::ContextScorer,
    models::{
        AnonymizationOutput, ItemResult, MappingEntry, MappingStore, ResolvedSpans, Span,
        TransformationResult,
    },
    operators::{Operated, OperatorContext},
    registry::{OperatorOverrides, OperatorRegistry},
    resolver::OverlapResolver,
};
use crate::domain::Result;
use std::sync::Arc;
use std::time::Instant;

/// Applies resolved operators to resolved spans
///
/// Replacements are computed for every span before the text is touched, so
/// an operator failure leaves nothing half-anonymized. Splicing runs in
/// descending `start` order: each splice lands strictly before every span
/// already processed, so recorded offsets stay valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformationEngine;

impl TransformationEngine {
    /// Transform `text` at every span in `spans`
    ///
    /// # Errors
    ///
    /// - [`UnknownOperator`](crate::domain::ShroudError::UnknownOperator) or
    ///   [`OperatorApplication`](crate::domain::ShroudError::OperatorApplication)
    ///   from operator resolution, before any operator runs
    /// - [`OperatorApplication`](crate::domain::ShroudError::OperatorApplication)
    ///   if an operator fails while producing a replacement
    /// - [`InvalidSpan`](crate::domain::ShroudError::InvalidSpan) if a span
    ///   does not fit `text`
    pub fn apply(
        text: &str,
        spans: &ResolvedSpans,
        registry: &OperatorRegistry,
        overrides: Option<&OperatorOverrides>,
    ) -> Result<AnonymizationOutput> {
        for span in spans {
            span.check_bounds(text)?;
        }

        // Resolve every operator up front so a bad batch fails before any work
        let configs = registry.resolve_all(spans.iter().map(Span::entity_type), overrides)?;

        let mut replacements: Vec<(Operated, &str, bool)> = Vec::with_capacity(spans.len());
        for span in spans {
            let entity_type = span.entity_type();
            let fallback;
            let config = match configs.get(entity_type) {
                Some(config) => config,
                None => {
                    fallback = registry.resolve(entity_type, overrides)?;
                    &fallback
                }
            };
            let operator = registry.operator(&config.name)?;
            let operated = operator.operate(
                span.slice(text),
                config,
                OperatorContext { entity_type },
            )?;
            replacements.push((operated, operator.name(), operator.is_reversible()));
        }

        let mut output = text.to_string();
        for (span, (operated, _, _)) in spans.iter().zip(&replacements).rev() {
            output.replace_range(span.start()..span.end(), &operated.text);
        }

        let mut items = Vec::with_capacity(spans.len());
        let mut mapping = MappingStore::new();
        let mut input_cursor = 0usize;
        let mut output_cursor = 0usize;

        for (span, (operated, operator_name, reversible)) in spans.iter().zip(replacements) {
            let start = output_cursor + (span.start() - input_cursor);
            let end = start + operated.text.len();
            input_cursor = span.end();
            output_cursor = end;

            if reversible {
                mapping.push(MappingEntry {
                    output_start: start,
                    output_end: end,
                    operator_name: operator_name.to_string(),
                    entity_type: span.entity_type().to_string(),
                    payload: operated.payload.unwrap_or_default(),
                });
            }

            items.push(ItemResult {
                operator_name: operator_name.to_string(),
                entity_type: span.entity_type().to_string(),
                start,
                end,
                text: operated.text,
            });
        }

        tracing::debug!(
            spans = spans.len(),
            operators = configs.len(),
            reversible_entries = mapping.len(),
            input_len = text.len(),
            output_len = output.len(),
            "Applied transformations"
        );

        Ok(AnonymizationOutput {
            result: TransformationResult {
                text: output,
                items,
            },
            mapping,
        })
    }
}

/// Main anonymization engine
///
/// Orchestrates context scoring, overlap resolution and transformation for
/// plain text with detector-supplied spans.
///
/// # Thread Safety
///
/// The engine is immutable after construction and can be shared across
/// threads and async tasks using `Arc`.
#[derive(Clone, Default)]
pub struct AnonymizerEngine {
    registry: OperatorRegistry,
    resolver: OverlapResolver,
    scorer: Option<Arc<dyn ContextScorer>>,
}

impl AnonymizerEngine {
    /// Engine with built-in operators, default resolver and no context scoring
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(mut self, registry: OperatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_resolver(mut self, resolver: OverlapResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_context_scorer(mut self, scorer: Arc<dyn ContextScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &OverlapResolver {
        &self.resolver
    }

    /// Names of all registered operators
    pub fn supported_operators(&self) -> Vec<&str> {
        self.registry.operator_names()
    }

    /// Score, resolve and transform one text
    ///
    /// # Arguments
    ///
    /// * `text` - Source text; never modified
    /// * `spans` - Raw detector output, possibly overlapping
    /// * `overrides` - Per-call operator configuration keyed by entity type
    ///
    /// # Returns
    ///
    /// The anonymized text, one item per transformed span (positioned in the
    /// output), and the reversible mapping for any `encrypt` applications.
    pub fn anonymize(
        &self,
        text: &str,
        spans: &[Span],
        overrides: Option<&OperatorOverrides>,
    ) -> Result<AnonymizationOutput> {
        let start_time = Instant::now();

        let resolved = match &self.scorer {
            Some(scorer) => {
                let scored = scorer.enhance(text, spans.to_vec());
                self.resolver.resolve(text, &scored)?
            }
            None => self.resolver.resolve(text, spans)?,
        };

        let output = TransformationEngine::apply(text, &resolved, &self.registry, overrides)?;

        tracing::debug!(
            input_spans = spans.len(),
            resolved_spans = resolved.len(),
            duration_us = start_time.elapsed().as_micros() as u64,
            "Anonymized text"
        );

        Ok(output)
    }

    /// Anonymize many independent documents sequentially
    ///
    /// Returns one result per document in input order. A failing document
    /// does not stop the others; the caller decides what to do with errors.
    pub fn anonymize_batch<'a, I>(
        &self,
        documents: I,
        overrides: Option<&OperatorOverrides>,
    ) -> Vec<Result<AnonymizationOutput>>
    where
        I: IntoIterator<Item = (&'a str, &'a [Span])>,
    {
        let results: Vec<Result<AnonymizationOutput>> = documents
            .into_iter()
            .map(|(text, spans)| self.anonymize(text, spans, overrides))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::debug!(documents = results.len(), failed, "Anonymized batch");

        results
    }
}

impl std::fmt::Debug for AnonymizerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizerEngine")
            .field("registry", &self.registry)
            .field("resolver", &self.resolver)
            .field("context_scoring", &self.scorer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::context::KeywordContextScorer;
    use crate::anonymization::operators::OperatorConfig;
    use crate::domain::ShroudError;

    const TEXT: &str = "My name is John Doe and my email is john@example.com";

    fn overrides(pairs: &[(&str, OperatorConfig)]) -> OperatorOverrides {
        pairs
            .iter()
            .map(|(entity, config)| (entity.to_string(), config.clone()))
            .collect()
    }

    #[test]
    fn test_replace_and_redact_scenario() {
        let spans = vec![
            Span::new("PERSON", 11, 19, 0.85).unwrap(),
            Span::new("EMAIL_ADDRESS", 36, 52, 0.95).unwrap(),
        ];
        let overrides = overrides(&[
            ("PERSON", OperatorConfig::replace(None)),
            ("EMAIL_ADDRESS", OperatorConfig::redact()),
        ]);

        let output = AnonymizerEngine::new()
            .anonymize(TEXT, &spans, Some(&overrides))
            .unwrap();

        assert_eq!(output.text(), "My name is <PERSON> and my email is ");
        let items = output.items();
        assert_eq!(items.len(), 2);
        assert_eq!((items[0].start, items[0].end), (11, 19));
        assert_eq!(items[0].operator_name, "replace");
        assert_eq!((items[1].start, items[1].end), (36, 36));
        assert_eq!(items[1].operator_name, "redact");
        assert!(!output.is_reversible());
    }

    #[test]
    fn test_items_track_length_drift() {
        let text = "a John b Jane c";
        let spans = ResolvedSpans::from_sorted(vec![
            Span::new("PERSON", 2, 6, 0.9).unwrap(),
            Span::new("PERSON", 9, 13, 0.9).unwrap(),
        ])
        .unwrap();
        let overrides = overrides(&[("PERSON", OperatorConfig::replace(Some("<SOMEBODY>")))]);

        let output =
            TransformationEngine::apply(text, &spans, &OperatorRegistry::new(), Some(&overrides))
                .unwrap();

        assert_eq!(output.text(), "a <SOMEBODY> b <SOMEBODY> c");
        for item in output.items() {
            assert_eq!(&output.text()[item.start..item.end], item.text);
        }
        assert_eq!(output.items()[1].start, 15);
    }

    #[test]
    fn test_operator_failure_is_atomic() {
        let spans = vec![
            Span::new("PERSON", 11, 19, 0.85).unwrap(),
            Span::new("EMAIL_ADDRESS", 36, 52, 0.95).unwrap(),
        ];
        let overrides = overrides(&[(
            "EMAIL_ADDRESS",
            OperatorConfig::custom(|_| Err("detector offline".to_string())),
        )]);

        let result = AnonymizerEngine::new().anonymize(TEXT, &spans, Some(&overrides));
        assert!(matches!(
            result,
            Err(ShroudError::OperatorApplication { operator, .. }) if operator == "custom"
        ));
    }

    #[test]
    fn test_missing_key_fails_before_apply() {
        let spans = vec![Span::new("PERSON", 11, 19, 0.85).unwrap()];
        let overrides = overrides(&[("PERSON", OperatorConfig::new("encrypt"))]);
        let result = AnonymizerEngine::new().anonymize(TEXT, &spans, Some(&overrides));
        assert!(matches!(result, Err(ShroudError::OperatorApplication { .. })));
    }

    #[test]
    fn test_encrypt_emits_mapping_entry() {
        let spans = vec![Span::new("PERSON", 11, 19, 0.85).unwrap()];
        let overrides = overrides(&[("PERSON", OperatorConfig::encrypt("WmZq4t7w!z%C&F)J"))]);

        let output = AnonymizerEngine::new()
            .anonymize(TEXT, &spans, Some(&overrides))
            .unwrap();

        assert_eq!(output.mapping.len(), 1);
        let entry = &output.mapping.entries()[0];
        let item = &output.items()[0];
        assert_eq!((entry.output_start, entry.output_end), (item.start, item.end));
        assert_eq!(entry.operator_name, "encrypt");
        assert!(!entry.payload.is_empty());
    }

    #[test]
    fn test_empty_spans_return_text_unchanged() {
        let output = AnonymizerEngine::new().anonymize(TEXT, &[], None).unwrap();
        assert_eq!(output.text(), TEXT);
        assert!(output.items().is_empty());
    }

    #[test]
    fn test_context_scorer_runs_before_resolution() {
        let text = "call 5551234567 now";
        let spans = vec![
            Span::new("PHONE_NUMBER", 5, 15, 0.3).unwrap(),
            Span::new("US_BANK_NUMBER", 5, 15, 0.5).unwrap(),
        ];
        let scorer = KeywordContextScorer::new().with_words("PHONE_NUMBER", ["call"]);

        let plain = AnonymizerEngine::new().anonymize(text, &spans, None).unwrap();
        assert_eq!(plain.text(), "call <US_BANK_NUMBER> now");

        let scored = AnonymizerEngine::new()
            .with_context_scorer(Arc::new(scorer))
            .anonymize(text, &spans, None)
            .unwrap();
        assert_eq!(scored.text(), "call <PHONE_NUMBER> now");
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let good = vec![Span::new("PERSON", 0, 4, 0.9).unwrap()];
        let bad = vec![Span::new("PERSON", 0, 40, 0.9).unwrap()];
        let docs: Vec<(&str, &[Span])> = vec![
            ("John went home", good.as_slice()),
            ("Jane", bad.as_slice()),
            ("Paul stayed", good.as_slice()),
        ];

        let results = AnonymizerEngine::new().anonymize_batch(docs, None);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().text(), "<PERSON> went home");
        assert!(matches!(results[1], Err(ShroudError::InvalidSpan { .. })));
        assert_eq!(results[2].as_ref().unwrap().text(), "<PERSON> stayed");
    }
}

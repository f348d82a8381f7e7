//! Anonymization configuration
//!
//! The `[anonymizer]` and `[context]` sections of `shroud.toml`, plus the
//! conversions that turn them into a ready [`AnonymizerEngine`].

use crate::anonymization::{
    context::KeywordContextScorer,
    engine::AnonymizerEngine,
    operators::OperatorConfig,
    registry::OperatorRegistry,
    resolver::{ConflictPolicy, OverlapResolver},
};
use crate::domain::{Result, ShroudError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Overlap resolution and default operator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// How overlapping spans are reconciled
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Merge same-type spans separated only by whitespace (`merge_same_type` only)
    #[serde(default)]
    pub merge_whitespace_separated: bool,

    /// Spans scoring below this are dropped before resolution
    #[serde(default)]
    pub min_score: f64,

    /// Default operator per entity type; `DEFAULT` applies to all others
    #[serde(default)]
    pub operators: BTreeMap<String, OperatorConfig>,
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::default(),
            merge_whitespace_separated: false,
            min_score: 0.0,
            operators: BTreeMap::new(),
        }
    }
}

impl AnonymizerConfig {
    /// Validate thresholds and every configured operator
    pub fn validate(&self, encryption_key: Option<&str>) -> Result<()> {
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err(ShroudError::Configuration(format!(
                "anonymizer.min_score must be within [0.0, 1.0], got {}",
                self.min_score
            )));
        }
        self.build_registry(encryption_key)?;
        Ok(())
    }

    /// Registry with the configured per-entity defaults
    ///
    /// `encrypt` entries without a `key` parameter use `encryption_key`.
    pub fn build_registry(&self, encryption_key: Option<&str>) -> Result<OperatorRegistry> {
        self.operators
            .iter()
            .try_fold(OperatorRegistry::new(), |registry, (entity_type, config)| {
                let config = match encryption_key {
                    Some(key) => config.clone().with_default_key(key),
                    None => config.clone(),
                };
                registry.with_default(entity_type.as_str(), config)
            })
    }

    pub fn build_resolver(&self) -> OverlapResolver {
        OverlapResolver::new()
            .with_policy(self.conflict_policy)
            .with_whitespace_merging(self.merge_whitespace_separated)
            .with_min_score(self.min_score)
    }
}

/// Keyword context scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_prefix_words")]
    pub prefix_words: usize,

    #[serde(default)]
    pub suffix_words: usize,

    #[serde(default = "default_boost")]
    pub boost: f64,

    #[serde(default = "default_min_score_with_context")]
    pub min_score_with_context: f64,

    /// Context words per entity type
    #[serde(default)]
    pub words: BTreeMap<String, Vec<String>>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix_words: default_prefix_words(),
            suffix_words: 0,
            boost: default_boost(),
            min_score_with_context: default_min_score_with_context(),
            words: BTreeMap::new(),
        }
    }
}

impl ContextConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("boost", self.boost),
            ("min_score_with_context", self.min_score_with_context),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ShroudError::Configuration(format!(
                    "context.{name} must be within [0.0, 1.0], got {value}"
                )));
            }
        }
        if self.enabled && self.words.is_empty() {
            return Err(ShroudError::Configuration(
                "context scoring enabled but context.words is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Scorer for this configuration, or `None` when disabled
    pub fn build_scorer(&self) -> Option<KeywordContextScorer> {
        if !self.enabled {
            return None;
        }
        let scorer = self.words.iter().fold(
            KeywordContextScorer::new()
                .with_window(self.prefix_words, self.suffix_words)
                .with_boost(self.boost, self.min_score_with_context),
            |scorer, (entity_type, words)| scorer.with_words(entity_type.as_str(), words),
        );
        Some(scorer)
    }
}

/// Build an engine from the `[anonymizer]` and `[context]` sections
pub fn build_engine(
    anonymizer: &AnonymizerConfig,
    context: &ContextConfig,
    encryption_key: Option<&str>,
) -> Result<AnonymizerEngine> {
    let engine = AnonymizerEngine::new()
        .with_registry(anonymizer.build_registry(encryption_key)?)
        .with_resolver(anonymizer.build_resolver());

    Ok(match context.build_scorer() {
        Some(scorer) => engine.with_context_scorer(Arc::new(scorer)),
        None => engine,
    })
}

fn default_prefix_words() -> usize {
    5
}

fn default_boost() -> f64 {
    0.35
}

fn default_min_score_with_context() -> f64 {
    0.4
}

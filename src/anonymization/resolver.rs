//! Overlap resolution
//!
//! Turns an unordered collection of candidate spans into a [`ResolvedSpans`]
//! set: non-overlapping, ascending by start, deterministic regardless of input
//! order.
//!
//! # Algorithm
//!
//! 1. Validate every span against the text (bounds, char boundaries).
//! 2. Drop spans below the configured minimum score.
//! 3. Optionally merge same-type spans ([`ConflictPolicy::MergeSameType`]).
//! 4. Sort by start ascending, end descending, score descending.
//! 5. Sweep into overlap clusters; a span joins the current cluster if it
//!    starts before the furthest end seen so far, so chains of pairwise
//!    overlaps collapse into one cluster.
//! 6. Pick one winner per cluster: highest score, then longest, then lowest
//!    start, then smallest entity type, then smallest recognizer id.

use crate::anonymization::models::{ResolvedSpans, Span};
use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How conflicting spans are reconciled before winner selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// One winner per overlap cluster
    #[default]
    SelectWinner,
    /// Union overlapping spans of the same entity type first, then select
    /// one winner per cluster
    MergeSameType,
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectWinner => write!(f, "select_winner"),
            Self::MergeSameType => write!(f, "merge_same_type"),
        }
    }
}

impl std::str::FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "select_winner" => Ok(Self::SelectWinner),
            "merge_same_type" => Ok(Self::MergeSameType),
            other => Err(format!(
                "Invalid conflict policy '{other}'. Must be one of: select_winner, merge_same_type"
            )),
        }
    }
}

/// Overlap resolver
///
/// # Examples
///
/// ```
/// use shroud::anonymization::models::Span;
/// use shroud::anonymization::resolver::OverlapResolver;
///
/// let text = "My name is John Doe";
/// let spans = vec![
///     Span::new("PERSON", 11, 19, 0.6)?,
///     Span::new("PERSON", 11, 15, 0.9)?,
/// ];
/// let resolved = OverlapResolver::new().resolve(text, &spans)?;
/// assert_eq!(resolved.len(), 1);
/// assert_eq!(resolved.as_slice()[0].end(), 15);
/// # Ok::<(), shroud::domain::ShroudError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OverlapResolver {
    policy: ConflictPolicy,
    merge_whitespace_separated: bool,
    min_score: f64,
}

impl OverlapResolver {
    /// Resolver with the default [`ConflictPolicy::SelectWinner`] policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Under [`ConflictPolicy::MergeSameType`], also merge same-type spans
    /// separated only by whitespace
    pub fn with_whitespace_merging(mut self, enabled: bool) -> Self {
        self.merge_whitespace_separated = enabled;
        self
    }

    /// Drop spans scoring below `min_score` before clustering
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score.clamp(0.0, 1.0);
        self
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Resolve candidate spans over `text`
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidSpan`](crate::domain::ShroudError::InvalidSpan)
    /// if any span exceeds the text or splits a UTF-8 character. One bad span
    /// rejects the whole collection.
    pub fn resolve(&self, text: &str, spans: &[Span]) -> Result<ResolvedSpans> {
        for span in spans {
            span.check_bounds(text)?;
        }

        let mut candidates: Vec<Span> = spans
            .iter()
            .filter(|span| span.score() >= self.min_score)
            .cloned()
            .collect();

        if self.policy == ConflictPolicy::MergeSameType {
            candidates = merge_same_type(text, candidates, self.merge_whitespace_separated);
        }

        candidates.sort_by(sweep_order);

        let clusters = cluster(candidates);
        let cluster_count = clusters.len();

        let mut winners: Vec<Span> = clusters
            .into_iter()
            .filter_map(|cluster| cluster.into_iter().max_by(winner_order))
            .collect();
        winners.sort_by_key(|span| span.start());

        tracing::debug!(
            candidates = spans.len(),
            clusters = cluster_count,
            resolved = winners.len(),
            policy = %self.policy,
            "Resolved overlapping spans"
        );

        Ok(ResolvedSpans::new_unchecked(winners))
    }
}

/// Start ascending, end descending, score descending
fn sweep_order(a: &Span, b: &Span) -> Ordering {
    a.start()
        .cmp(&b.start())
        .then_with(|| b.end().cmp(&a.end()))
        .then_with(|| b.score().total_cmp(&a.score()))
}

/// Greater means "better winner"
fn winner_order(a: &Span, b: &Span) -> Ordering {
    a.score()
        .total_cmp(&b.score())
        .then_with(|| a.len().cmp(&b.len()))
        .then_with(|| b.start().cmp(&a.start()))
        .then_with(|| b.entity_type().cmp(a.entity_type()))
        .then_with(|| b.recognizer_id().cmp(&a.recognizer_id()))
}

/// Partition spans sorted by [`sweep_order`] into transitive overlap clusters
fn cluster(sorted: Vec<Span>) -> Vec<Vec<Span>> {
    let mut clusters: Vec<Vec<Span>> = Vec::new();
    let mut cluster_end = 0usize;

    for span in sorted {
        match clusters.last_mut() {
            Some(current) if span.start() < cluster_end => {
                cluster_end = cluster_end.max(span.end());
                current.push(span);
            }
            _ => {
                cluster_end = span.end();
                clusters.push(vec![span]);
            }
        }
    }

    clusters
}

/// Union same-type spans that overlap, or that are separated only by
/// whitespace when `bridge_whitespace` is set
fn merge_same_type(text: &str, mut spans: Vec<Span>, bridge_whitespace: bool) -> Vec<Span> {
    spans.sort_by(|a, b| {
        a.entity_type()
            .cmp(b.entity_type())
            .then_with(|| sweep_order(a, b))
            .then_with(|| a.recognizer_id().cmp(&b.recognizer_id()))
    });

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(previous)
                if previous.entity_type() == span.entity_type()
                    && mergeable(text, previous, &span, bridge_whitespace) =>
            {
                *previous = previous.union(&span);
            }
            _ => merged.push(span),
        }
    }
    merged
}

fn mergeable(text: &str, previous: &Span, next: &Span, bridge_whitespace: bool) -> bool {
    if next.start() < previous.end() {
        return true;
    }
    bridge_whitespace && text[previous.end()..next.start()].chars().all(char::is_whitespace)
}

//! Resolved span set

use super::Span;
use crate::domain::{Result, ShroudError};
use serde::Serialize;

/// Non-overlapping spans in ascending order
///
/// For every adjacent pair `(a, b)`, `a.end() <= b.start()`. This is the only
/// span representation the transformation engine accepts. Instances come from
/// [`OverlapResolver::resolve`](crate::anonymization::resolver::OverlapResolver::resolve)
/// or from [`ResolvedSpans::from_sorted`], which re-checks the invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedSpans(Vec<Span>);

impl ResolvedSpans {
    /// Wrap spans that are already known to be sorted and disjoint
    pub(crate) fn new_unchecked(spans: Vec<Span>) -> Self {
        debug_assert!(spans.windows(2).all(|w| w[0].end() <= w[1].start()));
        Self(spans)
    }

    /// Build a resolved set from caller-ordered spans, checking the invariant
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidSpan`] naming the first span that
    /// overlaps or precedes its predecessor.
    pub fn from_sorted(spans: Vec<Span>) -> Result<Self> {
        for pair in spans.windows(2) {
            if pair[0].end() > pair[1].start() {
                return Err(ShroudError::invalid_span(
                    pair[1].entity_type(),
                    pair[1].start(),
                    pair[1].end(),
                    format!(
                        "overlaps or precedes previous span [{}, {})",
                        pair[0].start(),
                        pair[0].end()
                    ),
                ));
            }
        }
        Ok(Self(spans))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Span] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Span> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ResolvedSpans {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

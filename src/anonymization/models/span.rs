//! Span data model
//!
//! A [`Span`] tags a region of text with an entity type and a confidence score.
//! Offsets are UTF-8 byte offsets into the source text.

use crate::domain::{Result, ShroudError};
use serde::{Deserialize, Serialize};

/// Candidate or resolved region of text naming a sensitive entity
///
/// Spans are immutable once constructed. Construction enforces
/// `start < end`, a non-empty entity type and a finite score in `[0, 1]`;
/// bounds against a concrete text are checked by the resolver.
///
/// # Examples
///
/// ```
/// use shroud::anonymization::models::Span;
///
/// let span = Span::new("PERSON", 11, 19, 0.85)?.with_recognizer("spacy");
/// assert_eq!(span.len(), 8);
/// assert_eq!(span.recognizer_id(), Some("spacy"));
/// # Ok::<(), shroud::domain::ShroudError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpanRecord")]
pub struct Span {
    entity_type: String,
    start: usize,
    end: usize,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    recognizer_id: Option<String>,
}

/// Wire shape of a span before validation
#[derive(Debug, Deserialize)]
struct SpanRecord {
    entity_type: String,
    start: usize,
    end: usize,
    score: f64,
    #[serde(default)]
    recognizer_id: Option<String>,
}

impl TryFrom<SpanRecord> for Span {
    type Error = ShroudError;

    fn try_from(record: SpanRecord) -> Result<Self> {
        let span = Span::new(record.entity_type, record.start, record.end, record.score)?;
        Ok(match record.recognizer_id {
            Some(id) => span.with_recognizer(id),
            None => span,
        })
    }
}

impl Span {
    /// Create a new span
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidSpan`] if the entity type is empty, the
    /// range is empty or reversed, or the score is not a finite value in `[0, 1]`.
    pub fn new(
        entity_type: impl Into<String>,
        start: usize,
        end: usize,
        score: f64,
    ) -> Result<Self> {
        let entity_type = entity_type.into();

        if entity_type.trim().is_empty() {
            return Err(ShroudError::invalid_span(
                entity_type,
                start,
                end,
                "entity type must not be empty",
            ));
        }
        if start >= end {
            return Err(ShroudError::invalid_span(
                entity_type,
                start,
                end,
                "start must be strictly before end",
            ));
        }
        check_score(&entity_type, start, end, score)?;

        Ok(Self {
            entity_type,
            start,
            end,
            score,
            recognizer_id: None,
        })
    }

    /// Attach the id of the recognizer that produced this span
    pub fn with_recognizer(mut self, recognizer_id: impl Into<String>) -> Self {
        self.recognizer_id = Some(recognizer_id.into());
        self
    }

    /// Copy of this span with a different confidence score
    pub fn with_score(&self, score: f64) -> Result<Self> {
        check_score(&self.entity_type, self.start, self.end, score)?;
        Ok(Self {
            score,
            ..self.clone()
        })
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn recognizer_id(&self) -> Option<&str> {
        self.recognizer_id.as_deref()
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; empty spans cannot be constructed
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Half-open range intersection
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `other` lies entirely within this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check this span against the text it refers to
    ///
    /// Requires `end <= text.len()` and both offsets on UTF-8 char boundaries.
    pub fn check_bounds(&self, text: &str) -> Result<()> {
        if self.end > text.len() {
            return Err(ShroudError::invalid_span(
                &self.entity_type,
                self.start,
                self.end,
                format!("end exceeds text length {}", text.len()),
            ));
        }
        if !text.is_char_boundary(self.start) || !text.is_char_boundary(self.end) {
            return Err(ShroudError::invalid_span(
                &self.entity_type,
                self.start,
                self.end,
                "offsets must fall on UTF-8 character boundaries",
            ));
        }
        Ok(())
    }

    /// Slice of `text` covered by this span
    ///
    /// Callers must have checked bounds first.
    pub(crate) fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// Merge two spans of the same entity type into their union
    ///
    /// The union keeps the higher score and that span's recognizer id.
    pub(crate) fn union(&self, other: &Span) -> Span {
        let (score, recognizer_id) = if other.score > self.score {
            (other.score, other.recognizer_id.clone())
        } else {
            (self.score, self.recognizer_id.clone())
        };
        Span {
            entity_type: self.entity_type.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            score,
            recognizer_id,
        }
    }
}

fn check_score(entity_type: &str, start: usize, end: usize, score: f64) -> Result<()> {
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(ShroudError::invalid_span(
            entity_type,
            start,
            end,
            format!("score {score} is outside [0, 1]"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_span_creation() {
        let span = Span::new("PERSON", 11, 19, 0.85).unwrap();
        assert_eq!(span.entity_type(), "PERSON");
        assert_eq!(span.start(), 11);
        assert_eq!(span.end(), 19);
        assert_eq!(span.len(), 8);
        assert!(span.recognizer_id().is_none());
    }

    #[test_case("PERSON", 5, 5, 0.5 ; "zero length")]
    #[test_case("PERSON", 6, 5, 0.5 ; "reversed")]
    #[test_case("", 0, 5, 0.5 ; "empty entity type")]
    #[test_case("PERSON", 0, 5, 1.5 ; "score above one")]
    #[test_case("PERSON", 0, 5, -0.1 ; "negative score")]
    #[test_case("PERSON", 0, 5, f64::NAN ; "nan score")]
    fn test_span_rejected(entity_type: &str, start: usize, end: usize, score: f64) {
        let result = Span::new(entity_type, start, end, score);
        assert!(matches!(result, Err(ShroudError::InvalidSpan { .. })));
    }

    #[test]
    fn test_bounds_at_text_end_accepted() {
        let text = "hello world";
        let span = Span::new("WORD", 6, text.len(), 0.5).unwrap();
        assert!(span.check_bounds(text).is_ok());
    }

    #[test]
    fn test_bounds_past_text_end_rejected() {
        let text = "hello world";
        let span = Span::new("WORD", 6, text.len() + 1, 0.5).unwrap();
        assert!(matches!(
            span.check_bounds(text),
            Err(ShroudError::InvalidSpan { .. })
        ));
    }

    #[test]
    fn test_bounds_inside_multibyte_char_rejected() {
        let text = "café au lait";
        // 'é' occupies bytes 3..5
        let span = Span::new("WORD", 0, 4, 0.5).unwrap();
        assert!(span.check_bounds(text).is_err());
    }

    #[test]
    fn test_intersects_and_contains() {
        let outer = Span::new("PERSON", 0, 10, 0.5).unwrap();
        let inner = Span::new("PERSON", 2, 4, 0.9).unwrap();
        let touching = Span::new("PERSON", 10, 12, 0.9).unwrap();
        assert!(outer.intersects(&inner));
        assert!(outer.contains(&inner));
        assert!(!outer.intersects(&touching));
    }

    #[test]
    fn test_with_score_is_copy() {
        let span = Span::new("PHONE", 0, 10, 0.3).unwrap();
        let boosted = span.with_score(0.65).unwrap();
        assert_eq!(span.score(), 0.3);
        assert_eq!(boosted.score(), 0.65);
        assert!(span.with_score(2.0).is_err());
    }

    #[test]
    fn test_union_keeps_higher_score() {
        let a = Span::new("PERSON", 0, 4, 0.4).unwrap().with_recognizer("a");
        let b = Span::new("PERSON", 2, 9, 0.8).unwrap().with_recognizer("b");
        let merged = a.union(&b);
        assert_eq!((merged.start(), merged.end()), (0, 9));
        assert_eq!(merged.score(), 0.8);
        assert_eq!(merged.recognizer_id(), Some("b"));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Span =
            serde_json::from_str(r#"{"entity_type":"PERSON","start":1,"end":3,"score":0.5}"#)
                .unwrap();
        assert_eq!(ok.len(), 2);

        let bad = serde_json::from_str::<Span>(
            r#"{"entity_type":"PERSON","start":3,"end":3,"score":0.5}"#,
        );
        assert!(bad.is_err());
    }
}

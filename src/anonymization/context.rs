//! Context-aware score adjustment
//!
//! Optional step that runs before overlap resolution. Recognizers often emit
//! low-confidence spans for ambiguous patterns (a bare 10-digit number may or
//! may not be a phone number); seeing "phone" or "call" just before the span
//! raises confidence.

use crate::anonymization::models::Span;
use std::collections::HashMap;

/// Adjusts span confidence from surrounding text
pub trait ContextScorer: Send + Sync {
    /// Return re-scored copies of `spans`; never fails and never drops spans
    fn enhance(&self, text: &str, spans: Vec<Span>) -> Vec<Span>;
}

/// Keyword window scorer
///
/// Looks at up to `prefix_words` words before and `suffix_words` words after
/// each span. If any of them matches a context word registered for the span's
/// entity type, the score becomes
/// `max(min(score + boost, 1.0), min_score_with_context)`.
///
/// # Examples
///
/// ```
/// use shroud::anonymization::context::{ContextScorer, KeywordContextScorer};
/// use shroud::anonymization::models::Span;
///
/// let scorer = KeywordContextScorer::new().with_words("PHONE_NUMBER", ["phone", "call"]);
/// let text = "please call 555 123 4567";
/// let spans = vec![Span::new("PHONE_NUMBER", 12, 24, 0.3)?];
/// let enhanced = scorer.enhance(text, spans);
/// assert!((enhanced[0].score() - 0.65).abs() < 1e-9);
/// # Ok::<(), shroud::domain::ShroudError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KeywordContextScorer {
    words: HashMap<String, Vec<String>>,
    prefix_words: usize,
    suffix_words: usize,
    boost: f64,
    min_score_with_context: f64,
}

impl KeywordContextScorer {
    pub fn new() -> Self {
        Self {
            words: HashMap::new(),
            prefix_words: 5,
            suffix_words: 0,
            boost: 0.35,
            min_score_with_context: 0.4,
        }
    }

    /// Register context words for an entity type (matched case-insensitively)
    pub fn with_words<I, S>(mut self, entity_type: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .entry(entity_type.into())
            .or_default()
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn with_window(mut self, prefix_words: usize, suffix_words: usize) -> Self {
        self.prefix_words = prefix_words;
        self.suffix_words = suffix_words;
        self
    }

    pub fn with_boost(mut self, boost: f64, min_score_with_context: f64) -> Self {
        self.boost = boost.clamp(0.0, 1.0);
        self.min_score_with_context = min_score_with_context.clamp(0.0, 1.0);
        self
    }

    fn has_context(&self, text: &str, span: &Span) -> bool {
        let Some(words) = self.words.get(span.entity_type()) else {
            return false;
        };
        // Spans are bounds-checked later by the resolver; skip ones that would panic here
        if span.check_bounds(text).is_err() {
            return false;
        }

        let before = tokens(&text[..span.start()]);
        let after = tokens(&text[span.end()..]);

        before
            .iter()
            .rev()
            .take(self.prefix_words)
            .chain(after.iter().take(self.suffix_words))
            .any(|token| words.iter().any(|w| w == token))
    }
}

impl Default for KeywordContextScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextScorer for KeywordContextScorer {
    fn enhance(&self, text: &str, spans: Vec<Span>) -> Vec<Span> {
        let mut boosted = 0usize;
        let enhanced: Vec<Span> = spans
            .into_iter()
            .map(|span| {
                if !self.has_context(text, &span) {
                    return span;
                }
                let score = (span.score() + self.boost)
                    .min(1.0)
                    .max(self.min_score_with_context);
                match span.with_score(score) {
                    Ok(rescored) => {
                        boosted += 1;
                        rescored
                    }
                    Err(_) => span,
                }
            })
            .collect();

        tracing::trace!(spans = enhanced.len(), boosted, "Applied context scoring");
        enhanced
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

//! Reversal of `encrypt` transformations
//!
//! Every mapping entry is checked against the supplied text before anything is
//! spliced, so a stale or edited text is reported as a whole rather than
//! half-restored. An `encrypt` range must still hold the exact token the
//! engine wrote. Entries are then restored in descending output offset, the
//! same order the engine spliced them in.

use crate::anonymization::crypto::EncryptionKey;
use crate::anonymization::models::{MappingEntry, MappingStore};
use crate::anonymization::operators::ENCRYPT;
use crate::domain::{Result, ShroudError};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Restores original text from an anonymized text and its mapping store
#[derive(Debug, Clone, Copy, Default)]
pub struct Deanonymizer;

impl Deanonymizer {
    /// Decrypt every mapped range of `text` and splice the plaintext back in
    ///
    /// # Errors
    ///
    /// - [`ShroudError::MappingMismatch`] if an entry lies outside `text`, off a
    ///   char boundary, overlaps another entry, or no longer covers its token
    /// - [`ShroudError::MissingPayload`] if an entry has no payload
    /// - [`ShroudError::UnknownOperator`] if an entry was not produced by `encrypt`
    /// - [`ShroudError::Decryption`] on a wrong key or a corrupt payload
    ///
    /// # Examples
    ///
    /// ```
    /// use shroud::anonymization::crypto::EncryptionKey;
    /// use shroud::anonymization::deanonymizer::Deanonymizer;
    /// use shroud::anonymization::engine::AnonymizerEngine;
    /// use shroud::anonymization::models::Span;
    /// use shroud::anonymization::operators::OperatorConfig;
    /// use shroud::anonymization::registry::OperatorOverrides;
    ///
    /// let key = "WmZq4t7w!z%C&F)J";
    /// let text = "Call John at home";
    /// let spans = vec![Span::new("PERSON", 5, 9, 0.9)?];
    /// let mut overrides = OperatorOverrides::new();
    /// overrides.insert("PERSON".to_string(), OperatorConfig::encrypt(key));
    ///
    /// let output = AnonymizerEngine::new().anonymize(text, &spans, Some(&overrides))?;
    /// let restored = Deanonymizer::deanonymize(
    ///     output.text(),
    ///     &output.mapping,
    ///     &EncryptionKey::from_str_key(key)?,
    /// )?;
    /// assert_eq!(restored, text);
    /// # Ok::<(), shroud::domain::ShroudError>(())
    /// ```
    pub fn deanonymize(text: &str, mapping: &MappingStore, key: &EncryptionKey) -> Result<String> {
        let mut entries: Vec<&MappingEntry> = mapping.entries().iter().collect();
        entries.sort_by(|a, b| {
            b.output_start
                .cmp(&a.output_start)
                .then(b.output_end.cmp(&a.output_end))
        });

        check_entries(text, &entries)?;

        let mut restored = text.to_string();
        for entry in &entries {
            let plaintext = reverse(entry, key)?;
            restored.replace_range(entry.output_start..entry.output_end, &plaintext);
        }

        tracing::debug!(
            mapping_id = %mapping.id,
            entries = entries.len(),
            input_len = text.len(),
            output_len = restored.len(),
            "Deanonymized text"
        );

        Ok(restored)
    }
}

/// Validate entries sorted by descending output offset
fn check_entries(text: &str, entries: &[&MappingEntry]) -> Result<()> {
    let mismatch = |entry: &MappingEntry, reason: &str| ShroudError::MappingMismatch {
        output_start: entry.output_start,
        output_end: entry.output_end,
        text_len: text.len(),
        reason: reason.to_string(),
    };

    let mut next_start: Option<usize> = None;
    for entry in entries {
        if entry.output_start > entry.output_end {
            return Err(mismatch(entry, "start is after end"));
        }
        if entry.output_end > text.len() {
            return Err(mismatch(entry, "range extends past end of text"));
        }
        if !text.is_char_boundary(entry.output_start) || !text.is_char_boundary(entry.output_end)
        {
            return Err(mismatch(entry, "range is not on a character boundary"));
        }
        if let Some(next_start) = next_start {
            if entry.output_end > next_start {
                return Err(mismatch(entry, "range overlaps another entry"));
            }
        }
        if entry.operator_name == ENCRYPT
            && !entry.payload.is_empty()
            && text[entry.output_start..entry.output_end] != STANDARD.encode(&entry.payload)
        {
            return Err(mismatch(
                entry,
                "text at range no longer matches the encrypted token",
            ));
        }
        next_start = Some(entry.output_start);
    }
    Ok(())
}

fn reverse(entry: &MappingEntry, key: &EncryptionKey) -> Result<String> {
    if entry.payload.is_empty() {
        return Err(ShroudError::MissingPayload {
            output_start: entry.output_start,
            output_end: entry.output_end,
        });
    }
    if entry.operator_name != ENCRYPT {
        return Err(ShroudError::UnknownOperator {
            name: entry.operator_name.clone(),
        });
    }

    let decryption = |reason: String| ShroudError::Decryption {
        output_start: entry.output_start,
        output_end: entry.output_end,
        reason,
    };

    let plaintext = key.open(&entry.payload).map_err(decryption)?;
    String::from_utf8(plaintext).map_err(|_| decryption("plaintext is not valid UTF-8".to_string()))
}

//! Transformation results and the reversible mapping store

use crate::domain::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One transformed span, positioned in the OUTPUT text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResult {
    /// Operator applied
    pub operator_name: String,
    /// Entity type of the source span
    pub entity_type: String,
    /// Start offset in the output text
    pub start: usize,
    /// End offset in the output text
    pub end: usize,
    /// Replacement text written at `[start, end)`
    pub text: String,
}

/// Anonymized text plus one item per transformed span
///
/// Items are ascending and non-overlapping; together with the gaps between
/// them they cover the whole output text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationResult {
    pub text: String,
    pub items: Vec<ItemResult>,
}

impl TransformationResult {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Items produced by a given operator
    pub fn items_for_operator<'a>(
        &'a self,
        operator_name: &'a str,
    ) -> impl Iterator<Item = &'a ItemResult> + 'a {
        self.items
            .iter()
            .filter(move |item| item.operator_name == operator_name)
    }
}

/// Record needed to undo one reversible transformation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub output_start: usize,
    pub output_end: usize,
    /// Operator that produced the entry (e.g. `encrypt`)
    pub operator_name: String,
    pub entity_type: String,
    /// Opaque bytes the reversing operator consumes (nonce ‖ ciphertext for `encrypt`)
    #[serde(default, with = "payload_base64")]
    pub payload: Vec<u8>,
}

/// Ordered reversible mapping for one anonymization call
///
/// The engine never persists this; the caller owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingStore {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub entries: Vec<MappingEntry>,
}

impl MappingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: MappingEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a store previously produced by [`MappingStore::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for MappingStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one anonymization call hands back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationOutput {
    pub result: TransformationResult,
    pub mapping: MappingStore,
}

impl AnonymizationOutput {
    pub fn text(&self) -> &str {
        &self.result.text
    }

    pub fn items(&self) -> &[ItemResult] {
        &self.result.items
    }

    /// True if any reversible operator was applied
    pub fn is_reversible(&self) -> bool {
        !self.mapping.is_empty()
    }
}

mod payload_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

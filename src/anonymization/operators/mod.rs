//! Anonymization operators
//!
//! An operator is a named transformation from an original substring to its
//! replacement, plus a parameter validator and a reversibility flag. Operators
//! are registered by name in the [`OperatorRegistry`](crate::anonymization::registry::OperatorRegistry);
//! there is no inheritance chain.
//!
//! | Operator | Params | Reversible |
//! |---|---|---|
//! | `redact` | none | no |
//! | `replace` | `new_value` (optional) | no |
//! | `mask` | `masking_char`, `chars_to_mask`, `from_end` | no |
//! | `hash` | `hash_type` (`sha256`/`sha512`), `salt` (optional) | no |
//! | `encrypt` | `key` (16, 24 or 32 bytes) | yes |
//! | `keep` | none | no |
//! | `custom` | closure attached with [`OperatorConfig::custom`] | no |

pub mod custom;
pub mod encrypt;
pub mod hash;
pub mod keep;
pub mod mask;
pub mod redact;
pub mod replace;

use crate::domain::{Result, ShroudError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

pub const REDACT: &str = "redact";
pub const REPLACE: &str = "replace";
pub const MASK: &str = "mask";
pub const HASH: &str = "hash";
pub const ENCRYPT: &str = "encrypt";
pub const KEEP: &str = "keep";
pub const CUSTOM: &str = "custom";

/// Caller-supplied pure transformation for the `custom` operator
pub type CustomFn = Arc<dyn Fn(&str) -> std::result::Result<String, String> + Send + Sync>;

/// Per-span context handed to an operator
#[derive(Debug, Clone, Copy)]
pub struct OperatorContext<'a> {
    pub entity_type: &'a str,
}

/// Output of one operator application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operated {
    /// Replacement written into the output text
    pub text: String,
    /// Reversal payload, present only for reversible operators
    pub payload: Option<Vec<u8>>,
}

impl Operated {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: None,
        }
    }
}

/// Capability interface every operator implements
pub trait Operator: Send + Sync {
    /// Registry name
    fn name(&self) -> &str;

    /// Check `config.params` eagerly, before any text is touched
    fn validate(&self, config: &OperatorConfig, entity_type: &str) -> Result<()>;

    /// Produce the replacement for `original`
    fn operate(
        &self,
        original: &str,
        config: &OperatorConfig,
        ctx: OperatorContext<'_>,
    ) -> Result<Operated>;

    /// Whether applications emit a reversible mapping entry
    fn is_reversible(&self) -> bool {
        false
    }
}

/// Named operator plus its parameters
///
/// # Examples
///
/// ```
/// use shroud::anonymization::operators::OperatorConfig;
///
/// let mask = OperatorConfig::mask('*', 12, true);
/// assert_eq!(mask.name, "mask");
/// assert_eq!(mask.param_u64("chars_to_mask"), Some(12));
///
/// // Keys are hidden from Debug output
/// let encrypt = OperatorConfig::encrypt("WmZq4t7w!z%C&F)J");
/// assert!(!format!("{encrypt:?}").contains("WmZq"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub name: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(skip)]
    custom: Option<CustomFn>,
}

impl OperatorConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Map::new(),
            custom: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn redact() -> Self {
        Self::new(REDACT)
    }

    /// `replace` with an explicit token; `None` yields `<ENTITY_TYPE>`
    pub fn replace(new_value: Option<&str>) -> Self {
        let config = Self::new(REPLACE);
        match new_value {
            Some(value) => config.with_param("new_value", value),
            None => config,
        }
    }

    pub fn mask(masking_char: char, chars_to_mask: usize, from_end: bool) -> Self {
        Self::new(MASK)
            .with_param("masking_char", masking_char.to_string())
            .with_param("chars_to_mask", chars_to_mask as u64)
            .with_param("from_end", from_end)
    }

    pub fn hash(hash_type: hash::HashType) -> Self {
        Self::new(HASH).with_param("hash_type", hash_type.to_string())
    }

    pub fn encrypt(key: &str) -> Self {
        Self::new(ENCRYPT).with_param("key", key)
    }

    pub fn keep() -> Self {
        Self::new(KEEP)
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        Self {
            custom: Some(Arc::new(f)),
            ..Self::new(CUSTOM)
        }
    }

    /// Supply `key` to an `encrypt` configuration that has none
    ///
    /// Any other configuration is returned unchanged.
    pub fn with_default_key(self, key: &str) -> Self {
        if self.name == ENCRYPT && self.param("key").is_none() {
            self.with_param("key", key)
        } else {
            self
        }
    }

    pub fn custom_fn(&self) -> Option<&CustomFn> {
        self.custom.as_ref()
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    pub fn param_u64(&self, key: &str) -> Option<u64> {
        self.params.get(key).and_then(Value::as_u64)
    }

    pub fn param_bool(&self, key: &str) -> Option<bool> {
        self.params.get(key).and_then(Value::as_bool)
    }

    /// Error for a bad or missing parameter of this operator
    pub(crate) fn invalid(&self, entity_type: &str, reason: impl Into<String>) -> ShroudError {
        ShroudError::operator(&self.name, entity_type, reason)
    }

    /// Optional string parameter; present but non-string is an error
    pub(crate) fn optional_str(&self, key: &str, entity_type: &str) -> Result<Option<&str>> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.invalid(entity_type, format!("parameter '{key}' must be a string"))),
        }
    }
}

impl fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Map<String, Value> = self
            .params
            .iter()
            .map(|(k, v)| {
                let shown = if k == "key" {
                    Value::String("[REDACTED]".to_string())
                } else {
                    v.clone()
                };
                (k.clone(), shown)
            })
            .collect();

        f.debug_struct("OperatorConfig")
            .field("name", &self.name)
            .field("params", &params)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Built-in operators in registration order
pub fn builtin_operators() -> Vec<Arc<dyn Operator>> {
    vec![
        Arc::new(redact::Redact),
        Arc::new(replace::Replace),
        Arc::new(mask::Mask),
        Arc::new(hash::Hash),
        Arc::new(encrypt::Encrypt),
        Arc::new(keep::Keep),
        Arc::new(custom::Custom),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let names: Vec<String> = builtin_operators()
            .iter()
            .map(|op| op.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["redact", "replace", "mask", "hash", "encrypt", "keep", "custom"]
        );
    }

    #[test]
    fn test_only_encrypt_is_reversible() {
        let reversible: Vec<String> = builtin_operators()
            .iter()
            .filter(|op| op.is_reversible())
            .map(|op| op.name().to_string())
            .collect();
        assert_eq!(reversible, vec!["encrypt"]);
    }

    #[test]
    fn test_config_deserialize() {
        let config: OperatorConfig = serde_json::from_str(
            r##"{"name":"mask","params":{"masking_char":"#","chars_to_mask":4}}"##,
        )
        .unwrap();
        assert_eq!(config.name, "mask");
        assert_eq!(config.param_str("masking_char"), Some("#"));
        assert!(config.custom_fn().is_none());
    }

    #[test]
    fn test_with_default_key() {
        let filled = OperatorConfig::new(ENCRYPT).with_default_key("0123456789abcdef");
        assert_eq!(filled.param_str("key"), Some("0123456789abcdef"));

        let explicit = OperatorConfig::encrypt("fedcba9876543210").with_default_key("0123456789abcdef");
        assert_eq!(explicit.param_str("key"), Some("fedcba9876543210"));

        let other = OperatorConfig::redact().with_default_key("0123456789abcdef");
        assert!(other.params.is_empty());
    }

    #[test]
    fn test_optional_str_type_check() {
        let config = OperatorConfig::new("replace").with_param("new_value", 5);
        assert!(config.optional_str("new_value", "PERSON").is_err());
        assert_eq!(
            OperatorConfig::replace(None)
                .optional_str("new_value", "PERSON")
                .unwrap(),
            None
        );
    }
}

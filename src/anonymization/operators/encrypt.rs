//! Reversible encryption operator

use super::{Operated, Operator, OperatorConfig, OperatorContext, ENCRYPT};
use crate::anonymization::crypto::EncryptionKey;
use crate::domain::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// AES-GCM encrypts the span
///
/// The replacement is the base64 encoding of `nonce ‖ ciphertext ‖ tag`; the
/// same bytes become the mapping entry's reversal payload. The key is read
/// from the `key` parameter on every application and never retained.
pub struct Encrypt;

impl Encrypt {
    fn key(config: &OperatorConfig, entity_type: &str) -> Result<EncryptionKey> {
        let raw = config
            .optional_str("key", entity_type)?
            .ok_or_else(|| config.invalid(entity_type, "missing encryption key"))?;
        EncryptionKey::from_str_key(raw).map_err(|e| config.invalid(entity_type, e.to_string()))
    }
}

impl Operator for Encrypt {
    fn name(&self) -> &str {
        ENCRYPT
    }

    fn validate(&self, config: &OperatorConfig, entity_type: &str) -> Result<()> {
        Self::key(config, entity_type).map(|_| ())
    }

    fn operate(
        &self,
        original: &str,
        config: &OperatorConfig,
        ctx: OperatorContext<'_>,
    ) -> Result<Operated> {
        let key = Self::key(config, ctx.entity_type)?;
        let payload = key
            .seal(original.as_bytes())
            .map_err(|e| config.invalid(ctx.entity_type, e.to_string()))?;

        Ok(Operated {
            text: STANDARD.encode(&payload),
            payload: Some(payload),
        })
    }

    fn is_reversible(&self) -> bool {
        true
    }
}

//! Masking operator

use super::{Operated, Operator, OperatorConfig, OperatorContext, MASK};
use crate::domain::Result;
use serde_json::Value;

/// Overwrites characters with a masking character, preserving length
///
/// Counts Unicode characters, not bytes. Masking more characters than the
/// span holds masks all of them.
pub struct Mask;

/// Validated mask parameters
struct MaskParams {
    masking_char: char,
    chars_to_mask: usize,
    from_end: bool,
}

impl Mask {
    fn params(config: &OperatorConfig, entity_type: &str) -> Result<MaskParams> {
        let masking_char = match config.param_str("masking_char") {
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(config.invalid(
                            entity_type,
                            format!("masking_char must be exactly one character, got '{s}'"),
                        ))
                    }
                }
            }
            None => return Err(config.invalid(entity_type, "missing string parameter 'masking_char'")),
        };

        let chars_to_mask = config
            .param_u64("chars_to_mask")
            .ok_or_else(|| config.invalid(entity_type, "chars_to_mask must be a non-negative integer"))?;
        let chars_to_mask = usize::try_from(chars_to_mask).unwrap_or(usize::MAX);

        let from_end = match config.param("from_end") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => return Err(config.invalid(entity_type, "from_end must be a boolean")),
        };

        Ok(MaskParams {
            masking_char,
            chars_to_mask,
            from_end,
        })
    }
}

impl Operator for Mask {
    fn name(&self) -> &str {
        MASK
    }

    fn validate(&self, config: &OperatorConfig, entity_type: &str) -> Result<()> {
        Self::params(config, entity_type).map(|_| ())
    }

    fn operate(
        &self,
        original: &str,
        config: &OperatorConfig,
        ctx: OperatorContext<'_>,
    ) -> Result<Operated> {
        let params = Self::params(config, ctx.entity_type)?;
        let total = original.chars().count();
        let masked = params.chars_to_mask.min(total);
        let mask = |_| params.masking_char;

        let text: String = if params.from_end {
            original
                .chars()
                .take(total - masked)
                .chain((0..masked).map(mask))
                .collect()
        } else {
            (0..masked)
                .map(mask)
                .chain(original.chars().skip(masked))
                .collect()
        };

        Ok(Operated::text(text))
    }
}

//! Replacement operator

use super::{Operated, Operator, OperatorConfig, OperatorContext, REPLACE};
use crate::domain::Result;

/// Replaces the span with a fixed token
///
/// Uses `new_value` when set and non-empty, otherwise `<ENTITY_TYPE>`.
pub struct Replace;

impl Replace {
    /// Placeholder used when no `new_value` is configured
    pub fn placeholder(entity_type: &str) -> String {
        format!("<{entity_type}>")
    }
}

impl Operator for Replace {
    fn name(&self) -> &str {
        REPLACE
    }

    fn validate(&self, config: &OperatorConfig, entity_type: &str) -> Result<()> {
        config.optional_str("new_value", entity_type)?;
        Ok(())
    }

    fn operate(
        &self,
        _original: &str,
        config: &OperatorConfig,
        ctx: OperatorContext<'_>,
    ) -> Result<Operated> {
        let token = match config.optional_str("new_value", ctx.entity_type)? {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => Self::placeholder(ctx.entity_type),
        };
        Ok(Operated::text(token))
    }
}

//! Caller-supplied operator

use super::{Operated, Operator, OperatorConfig, OperatorContext, CUSTOM};
use crate::domain::Result;

/// Applies the closure attached with [`OperatorConfig::custom`]
pub struct Custom;

impl Operator for Custom {
    fn name(&self) -> &str {
        CUSTOM
    }

    fn validate(&self, config: &OperatorConfig, entity_type: &str) -> Result<()> {
        if config.custom_fn().is_none() {
            return Err(config.invalid(entity_type, "no function attached to custom operator"));
        }
        Ok(())
    }

    fn operate(
        &self,
        original: &str,
        config: &OperatorConfig,
        ctx: OperatorContext<'_>,
    ) -> Result<Operated> {
        let f = config
            .custom_fn()
            .ok_or_else(|| config.invalid(ctx.entity_type, "no function attached to custom operator"))?;
        let replacement = f(original).map_err(|reason| config.invalid(ctx.entity_type, reason))?;
        Ok(Operated::text(replacement))
    }
}

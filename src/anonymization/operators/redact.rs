//! Redaction operator

use super::{Operated, Operator, OperatorConfig, OperatorContext, REDACT};
use crate::domain::Result;

/// Removes the span entirely
pub struct Redact;

impl Operator for Redact {
    fn name(&self) -> &str {
        REDACT
    }

    fn validate(&self, _config: &OperatorConfig, _entity_type: &str) -> Result<()> {
        Ok(())
    }

    fn operate(
        &self,
        _original: &str,
        _config: &OperatorConfig,
        _ctx: OperatorContext<'_>,
    ) -> Result<Operated> {
        Ok(Operated::text(""))
    }
}

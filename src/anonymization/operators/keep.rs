//! Pass-through operator

use super::{Operated, Operator, OperatorConfig, OperatorContext, KEEP};
use crate::domain::Result;

/// Leaves the original substring in place while still reporting an item
pub struct Keep;

impl Operator for Keep {
    fn name(&self) -> &str {
        KEEP
    }

    fn validate(&self, _config: &OperatorConfig, _entity_type: &str) -> Result<()> {
        Ok(())
    }

    fn operate(
        &self,
        original: &str,
        _config: &OperatorConfig,
        _ctx: OperatorContext<'_>,
    ) -> Result<Operated> {
        Ok(Operated::text(original))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_returns_original() {
        let ctx = OperatorContext { entity_type: "NRP" };
        let result = Keep.operate("Dutch", &OperatorConfig::keep(), ctx).unwrap();
        assert_eq!(result.text, "Dutch");
    }
}

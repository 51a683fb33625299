use super::{ConstraintExtractionContext, ConstraintExtractor};
use crate::error::Result;
use crate::introspection::{Constraint, ConstraintKind};

/// Count -> `minItems` / `maxItems`
#[derive(Debug, Clone, Copy, Default)]
pub struct CountConstraintExtractor;

impl ConstraintExtractor for CountConstraintExtractor {
    fn name(&self) -> &'static str {
        "CountConstraintExtractor"
    }

    fn supports_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint.kind, ConstraintKind::Count { .. })
    }

    fn extract_constraint(
        &self,
        constraint: &Constraint,
        context: &mut ConstraintExtractionContext,
    ) -> Result<()> {
        self.assert_supports_constraint(constraint)?;
        if let ConstraintKind::Count { min, max } = constraint.kind {
            let property = context.property_schema();
            if min.is_some() {
                property.min_items = min;
            }
            if max.is_some() {
                property.max_items = max;
            }
        }
        Ok(())
    }
}

use super::{ConstraintExtractionContext, ConstraintExtractor};
use crate::error::Result;
use crate::introspection::{Constraint, ConstraintKind};

/// Range -> `minimum` / `maximum`
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeConstraintExtractor;

impl ConstraintExtractor for RangeConstraintExtractor {
    fn name(&self) -> &'static str {
        "RangeConstraintExtractor"
    }

    fn supports_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint.kind, ConstraintKind::Range { .. })
    }

    fn extract_constraint(
        &self,
        constraint: &Constraint,
        context: &mut ConstraintExtractionContext,
    ) -> Result<()> {
        self.assert_supports_constraint(constraint)?;
        if let ConstraintKind::Range { min, max } = &constraint.kind {
            let property = context.property_schema();
            if let Some(min) = min {
                property.minimum = Some(min.clone());
            }
            if let Some(max) = max {
                property.maximum = Some(max.clone());
            }
        }
        Ok(())
    }
}

use super::{ConstraintExtractionContext, ConstraintExtractor};
use crate::error::Result;
use crate::introspection::{Constraint, ConstraintKind};

/// Length -> `minLength` / `maxLength`
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthConstraintExtractor;

impl ConstraintExtractor for LengthConstraintExtractor {
    fn name(&self) -> &'static str {
        "LengthConstraintExtractor"
    }

    fn supports_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint.kind, ConstraintKind::Length { .. })
    }

    fn extract_constraint(
        &self,
        constraint: &Constraint,
        context: &mut ConstraintExtractionContext,
    ) -> Result<()> {
        self.assert_supports_constraint(constraint)?;
        if let ConstraintKind::Length { min, max } = constraint.kind {
            let property = context.property_schema();
            if min.is_some() {
                property.min_length = min;
            }
            if max.is_some() {
                property.max_length = max;
            }
        }
        Ok(())
    }
}

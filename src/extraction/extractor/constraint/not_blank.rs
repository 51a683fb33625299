use super::{ConstraintExtractionContext, ConstraintExtractor};
use crate::error::Result;
use crate::introspection::{Constraint, ConstraintKind};

/// Format marker of properties that must not be blank
pub const NOT_EMPTY_FORMAT: &str = "not empty";

/// NotBlank -> property listed in the owner's `required`, format marker when unset
#[derive(Debug, Clone, Copy, Default)]
pub struct NotBlankConstraintExtractor;

impl ConstraintExtractor for NotBlankConstraintExtractor {
    fn name(&self) -> &'static str {
        "NotBlankConstraintExtractor"
    }

    fn supports_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint.kind, ConstraintKind::NotBlank)
    }

    fn extract_constraint(
        &self,
        constraint: &Constraint,
        context: &mut ConstraintExtractionContext,
    ) -> Result<()> {
        self.assert_supports_constraint(constraint)?;
        context.class_schema.add_required(&context.property_name);
        context
            .property_schema()
            .format
            .get_or_insert_with(|| NOT_EMPTY_FORMAT.to_string());
        Ok(())
    }
}

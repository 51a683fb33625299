use super::{ConstraintExtractionContext, ConstraintExtractor};
use crate::error::Result;
use crate::introspection::{Constraint, ConstraintKind};

/// Choice -> appends every allowed value to `enum`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChoiceConstraintExtractor;

impl ConstraintExtractor for ChoiceConstraintExtractor {
    fn name(&self) -> &'static str {
        "ChoiceConstraintExtractor"
    }

    fn supports_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint.kind, ConstraintKind::Choice(_))
    }

    fn extract_constraint(
        &self,
        constraint: &Constraint,
        context: &mut ConstraintExtractionContext,
    ) -> Result<()> {
        self.assert_supports_constraint(constraint)?;
        if let ConstraintKind::Choice(choices) = &constraint.kind {
            let property = context.property_schema();
            for choice in choices {
                property.push_enum(choice.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Any, Schema};
    use serde_json::json;

    #[test]
    fn test_appends_to_existing_enum() {
        let mut schema = Schema::object();
        let mut status = Schema::typed("string");
        status.push_enum("draft");
        schema.set_property("status", status);

        let mut context = ConstraintExtractionContext {
            class_schema: &mut schema,
            property_name: "status".to_string(),
        };
        ChoiceConstraintExtractor
            .extract_constraint(
                &Constraint::new(ConstraintKind::Choice(vec![Any::from("open"), Any::new(3)])),
                &mut context,
            )
            .unwrap();

        assert_eq!(
            serde_json::to_value(schema.property("status").unwrap()).unwrap(),
            json!({"type": "string", "enum": ["draft", "open", 3]})
        );
    }
}

//! Validation constraints refining property schemas.
//!
//! Each constraint kind has its own small [`ConstraintExtractor`]. The generic
//! [`ConstraintSchemaExtractor`] turns one of them into a regular [`Extractor`]: it
//! finds the constrained properties of a class that are present on the schema, keeps
//! the constraints of the requested validation groups and hands each one over with a
//! [`ConstraintExtractionContext`] pointing at the property.

mod choice;
mod count;
mod length;
mod not_blank;
mod range;

pub use choice::ChoiceConstraintExtractor;
pub use count::CountConstraintExtractor;
pub use length::LengthConstraintExtractor;
pub use not_blank::NotBlankConstraintExtractor;
pub use range::RangeConstraintExtractor;

use crate::error::{Error, Result};
use crate::extraction::{ExtractionContext, Extractor, Source, SourceKind, Target, TargetKind};
use crate::introspection::{
    ClassDescriptor, Constraint, PropertyNamingStrategy, SerializedNameStrategy, TypeIntrospector,
    ValidationMetadataProvider, DEFAULT_VALIDATION_GROUP,
};
use crate::schema::Schema;
use log::debug;
use std::collections::BTreeSet;
use std::rc::Rc;

/// The property a constraint is being applied to
pub struct ConstraintExtractionContext<'c> {
    /// Schema of the class owning the property
    pub class_schema: &'c mut Schema,
    /// Wire name of the property
    pub property_name: String,
}

impl ConstraintExtractionContext<'_> {
    pub fn property_schema(&mut self) -> &mut Schema {
        self.class_schema.property_entry(&self.property_name)
    }
}

pub trait ConstraintExtractor {
    fn name(&self) -> &'static str;

    fn supports_constraint(&self, constraint: &Constraint) -> bool;

    /// Write the constraint into the property schema.
    ///
    /// Fails with [`Error::UnsupportedConstraint`] for kinds this extractor does not handle.
    fn extract_constraint(
        &self,
        constraint: &Constraint,
        context: &mut ConstraintExtractionContext,
    ) -> Result<()>;

    fn assert_supports_constraint(&self, constraint: &Constraint) -> Result<()> {
        if self.supports_constraint(constraint) {
            Ok(())
        } else {
            Err(Error::UnsupportedConstraint {
                extractor: self.name(),
                constraint: constraint.kind_name(),
            })
        }
    }
}

/// Adapts a [`ConstraintExtractor`] to the class/schema extraction
pub struct ConstraintSchemaExtractor<C> {
    constraint_extractor: C,
    introspector: Rc<dyn TypeIntrospector>,
    validation: Rc<dyn ValidationMetadataProvider>,
    naming: Rc<dyn PropertyNamingStrategy>,
}

impl<C: ConstraintExtractor> ConstraintSchemaExtractor<C> {
    pub fn new(
        constraint_extractor: C,
        introspector: Rc<dyn TypeIntrospector>,
        validation: Rc<dyn ValidationMetadataProvider>,
    ) -> Self {
        Self {
            constraint_extractor,
            introspector,
            validation,
            naming: Rc::new(SerializedNameStrategy),
        }
    }

    pub fn with_naming_strategy(mut self, naming: Rc<dyn PropertyNamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    fn requested_groups(context: &ExtractionContext) -> BTreeSet<String> {
        context
            .effective_model_context()
            .and_then(|model_context| model_context.validation_groups.clone())
            .unwrap_or_else(|| [DEFAULT_VALIDATION_GROUP.to_string()].into())
    }

    /// Constraints to apply, grouped by wire name of properties present on the schema
    fn applicable<'s>(
        &'s self,
        class: &'s ClassDescriptor,
        schema: &Schema,
        context: &ExtractionContext,
    ) -> Vec<(String, Vec<&'s Constraint>)> {
        let groups = Self::requested_groups(context);
        let mut chain = self.introspector.ancestors(&class.name);
        chain.reverse();
        chain.push(class);

        let mut applicable = Vec::new();
        for descriptor in chain {
            for entry in self.validation.constraints(&descriptor.name) {
                let wire_name = match descriptor.property(&entry.property) {
                    Some(property) => self.naming.translate(property),
                    None => self.naming.translate_name(&entry.property, None),
                };
                if !schema.has_property(&wire_name) {
                    continue;
                }

                let constraints: Vec<&Constraint> = entry
                    .constraints
                    .iter()
                    .filter(|constraint| constraint.in_groups(&groups))
                    .filter(|constraint| self.constraint_extractor.supports_constraint(constraint))
                    .collect();
                if !constraints.is_empty() {
                    applicable.push((wire_name, constraints));
                }
            }
        }
        applicable
    }
}

impl<C: ConstraintExtractor> Extractor for ConstraintSchemaExtractor<C> {
    fn name(&self) -> &'static str {
        self.constraint_extractor.name()
    }

    fn supports(&self) -> (SourceKind, TargetKind) {
        (SourceKind::Class, TargetKind::Schema)
    }

    fn can_extract(&self, source: &Source, target: &Target, context: &ExtractionContext) -> bool {
        match (source, target) {
            (Source::Class(class), Target::Schema(schema)) => {
                !self.applicable(class, schema, context).is_empty()
            }
            _ => false,
        }
    }

    fn extract(
        &self,
        source: &Source,
        target: &mut Target,
        context: &mut ExtractionContext,
    ) -> Result<()> {
        self.assert_can_extract(source, target, context)?;
        let (Source::Class(class), Target::Schema(schema)) = (source, target) else {
            return Ok(());
        };

        for (property_name, constraints) in self.applicable(class, schema, context) {
            debug!(
                "{}: {} constraint(s) on {}.{}",
                self.name(),
                constraints.len(),
                class.name,
                property_name
            );
            let mut constraint_context = ConstraintExtractionContext {
                class_schema: &mut **schema,
                property_name,
            };
            for constraint in constraints {
                self.constraint_extractor
                    .extract_constraint(constraint, &mut constraint_context)?;
            }
        }
        Ok(())
    }
}

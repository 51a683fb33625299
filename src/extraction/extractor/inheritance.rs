use crate::error::Result;
use crate::extraction::{ExtractionContext, Extractor, Source, SourceKind, Target, TargetKind};
use crate::introspection::InheritanceMetadataProvider;
use crate::schema::{Any, Schema};
use log::debug;
use std::rc::Rc;

/// Description given to the discriminator property of subclasses
pub const DISCRIMINATOR_DESCRIPTION: &str = "Discriminator property";

/// Documents discriminated class hierarchies.
///
/// The root class gets the `discriminator` field, a required string property listing
/// every discriminator value, and all mapped subclasses are pulled into the
/// definitions. A subclass pins the discriminator property to its own value.
pub struct InheritanceExtractor {
    inheritance: Rc<dyn InheritanceMetadataProvider>,
}

impl InheritanceExtractor {
    pub fn new(inheritance: Rc<dyn InheritanceMetadataProvider>) -> Self {
        Self { inheritance }
    }
}

impl Extractor for InheritanceExtractor {
    fn name(&self) -> &'static str {
        "InheritanceExtractor"
    }

    fn supports(&self) -> (SourceKind, TargetKind) {
        (SourceKind::Class, TargetKind::Schema)
    }

    fn can_extract(&self, source: &Source, target: &Target, _context: &ExtractionContext) -> bool {
        match (source, target) {
            (Source::Class(class), Target::Schema(_)) => {
                self.inheritance.inheritance(&class.name).is_some()
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
        let Some(mapping) = self.inheritance.inheritance(&class.name) else {
            return Ok(());
        };
        let column = mapping.discriminator_column.as_str();

        if mapping.root {
            debug!(
                "{} is the root of a hierarchy of {} classes",
                class.name,
                mapping.discriminator_map.len()
            );
            schema.discriminator = Some(column.to_string());
            schema.add_required(column);

            for subclass in mapping.discriminator_map.values() {
                let mut throwaway = Schema::new();
                context.swagger().extract(
                    &Source::TypeName(subclass),
                    &mut Target::Schema(&mut throwaway),
                    context,
                )?;
            }

            let property = schema.property_entry(column);
            property.schema_type = Some("string".to_string());
            property.enum_values = Some(
                mapping
                    .discriminator_map
                    .keys()
                    .map(|value| Any::from(value.as_str()))
                    .collect(),
            );
        } else if let Some(property) = schema.property_mut(column) {
            property.description = Some(DISCRIMINATOR_DESCRIPTION.to_string());
            property.schema_type = Some("string".to_string());
            property.enum_values = mapping
                .value
                .as_ref()
                .map(|value| vec![Any::from(value.as_str())]);
        }
        Ok(())
    }
}

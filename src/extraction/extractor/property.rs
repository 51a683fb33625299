use crate::error::{Error, Result};
use crate::extraction::{ExtractionContext, Extractor, Source, SourceKind, Target, TargetKind};
use crate::introspection::{
    ClassDescriptor, ClassKind, PropertyDescriptor, PropertyNamingStrategy,
    SerializedNameStrategy, TypeDescriptor, TypeIntrospector,
};
use crate::schema::{AdditionalProperties, Any, Schema};
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Compare dotted version strings segment by segment.
///
/// Numeric segments compare as numbers, anything else as text; missing segments count
/// as zero, so `1.0` equals `1`.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let left: Vec<&str> = left.trim().split('.').collect();
    let right: Vec<&str> = right.trim().split('.').collect();

    for index in 0..left.len().max(right.len()) {
        let a = left.get(index).copied().unwrap_or("0");
        let b = right.get(index).copied().unwrap_or("0");
        let ordering = match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Fills an object schema with the properties of a class and its ancestors.
///
/// Properties can be excluded by serializer groups (from the effective model context)
/// and by their `since`/`until` versions when version exclusion is enabled.
pub struct PropertyExtractor {
    introspector: Rc<dyn TypeIntrospector>,
    naming: Rc<dyn PropertyNamingStrategy>,
}

impl PropertyExtractor {
    pub fn new(introspector: Rc<dyn TypeIntrospector>) -> Self {
        Self {
            introspector,
            naming: Rc::new(SerializedNameStrategy),
        }
    }

    pub fn with_naming_strategy(mut self, naming: Rc<dyn PropertyNamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    fn excluded_by_groups(property: &PropertyDescriptor, groups: Option<&BTreeSet<String>>) -> bool {
        match groups {
            Some(groups) if !property.groups.is_empty() => {
                !property.groups.iter().any(|group| groups.contains(group))
            }
            _ => false,
        }
    }

    fn excluded_by_version(property: &PropertyDescriptor, version: Option<&str>) -> bool {
        let Some(version) = version else {
            return false;
        };
        if let Some(since) = &property.since {
            if compare_versions(version, since) == Ordering::Less {
                return true;
            }
        }
        if let Some(until) = &property.until {
            if compare_versions(version, until) == Ordering::Greater {
                return true;
            }
        }
        false
    }

    fn type_schema(&self, type_ref: &TypeDescriptor, context: &mut ExtractionContext) -> Result<Schema> {
        match type_ref {
            TypeDescriptor::Named(name) => {
                let mut schema = Schema::new();
                context.swagger().extract(
                    &Source::TypeName(name),
                    &mut Target::Schema(&mut schema),
                    context,
                )?;
                Ok(schema)
            }
            TypeDescriptor::List(element) => {
                let mut schema = Schema::typed("array");
                schema.items = Some(Box::new(self.type_schema(element, context)?));
                Ok(schema)
            }
            TypeDescriptor::Map(key, value) if key.is_string() => {
                let mut schema = Schema::object();
                schema.additional_properties = Some(AdditionalProperties::Schema(Box::new(
                    self.type_schema(value, context)?,
                )));
                Ok(schema)
            }
            TypeDescriptor::Map(_, value) => {
                let mut schema = Schema::typed("array");
                schema.items = Some(Box::new(self.type_schema(value, context)?));
                Ok(schema)
            }
        }
    }

    /// Properties of the class chain, root ancestor first
    fn properties<'s>(&'s self, class: &'s ClassDescriptor) -> Vec<&'s PropertyDescriptor> {
        let ancestors = self.introspector.ancestors(&class.name);
        ancestors
            .into_iter()
            .rev()
            .chain(std::iter::once(class))
            .flat_map(|descriptor| descriptor.properties.iter())
            .collect()
    }
}

impl Extractor for PropertyExtractor {
    fn name(&self) -> &'static str {
        "PropertyExtractor"
    }

    fn supports(&self) -> (SourceKind, TargetKind) {
        (SourceKind::Class, TargetKind::Schema)
    }

    fn can_extract(&self, source: &Source, target: &Target, _context: &ExtractionContext) -> bool {
        matches!((source, target), (Source::Class(_), Target::Schema(_)))
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

        if let ClassKind::Enum(variants) = &class.kind {
            schema.schema_type = Some("string".to_string());
            schema.enum_values = Some(variants.iter().map(|v| Any::from(v.as_str())).collect());
            return Ok(());
        }

        let mut sub_context = context.sub_context();
        let groups = context
            .effective_model_context()
            .and_then(|model_context| model_context.serializer_groups.clone());

        let version = if context.version_exclusion {
            match context.root().api_version() {
                Some(version) => Some(version.to_string()),
                None => {
                    return Err(Error::Configuration(
                        "info.version must be set when version exclusion is enabled".to_string(),
                    ))
                }
            }
        } else {
            None
        };

        for property in self.properties(class) {
            if Self::excluded_by_groups(property, groups.as_ref())
                || Self::excluded_by_version(property, version.as_deref())
            {
                debug!("Skipping property {}.{}", class.name, property.name);
                continue;
            }

            let mut property_schema = self.type_schema(&property.type_ref, &mut sub_context)?;
            if property.read_only {
                property_schema.read_only = Some(true);
            }
            property_schema.description = property
                .summary
                .as_ref()
                .filter(|summary| !summary.trim().is_empty())
                .cloned();

            schema.set_property(self.naming.translate(property), property_schema);
        }
        Ok(())
    }
}

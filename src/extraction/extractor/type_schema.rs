use crate::cleaner::SUFFIX_SEPARATOR;
use crate::error::Result;
use crate::extraction::{ExtractionContext, Extractor, Source, SourceKind, Target, TargetKind};
use crate::introspection::{ClassDescriptor, TypeIntrospector};
use crate::schema::{Document, Schema};
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// Notation of an array of the preceding type
const ARRAY_MARKER: &str = "[]";

/// What a type name resolves to
enum ResolvedType<'a> {
    Primitive {
        schema_type: &'static str,
        format: Option<&'static str>,
    },
    Array(&'a str),
    Class(&'a ClassDescriptor),
}

fn primitive(name: &str) -> Option<(&'static str, Option<&'static str>)> {
    let resolved = match name {
        "int" | "integer" => ("integer", Some("int32")),
        "long" => ("integer", Some("int64")),
        "float" => ("number", Some("float")),
        "double" => ("number", Some("double")),
        "string" => ("string", None),
        "byte" => ("string", Some("byte")),
        "boolean" => ("boolean", None),
        "date" => ("string", Some("date")),
        "DateTime" | "dateTime" => ("string", Some("date-time")),
        "password" => ("string", Some("password")),
        "array" => ("array", None),
        _ => return None,
    };
    Some(resolved)
}

/// Resolves type names to schemas: primitives, `T[]` arrays and classes.
///
/// A class becomes a named definition, extracted once, and the target references it.
pub struct TypeSchemaExtractor {
    introspector: Rc<dyn TypeIntrospector>,
    aliases: HashMap<String, String>,
}

impl TypeSchemaExtractor {
    pub fn new(introspector: Rc<dyn TypeIntrospector>) -> Self {
        Self {
            introspector,
            aliases: HashMap::new(),
        }
    }

    /// Use `alias` instead of the class name for its definition
    pub fn register_definition_alias(&mut self, class: &str, alias: &str) {
        self.aliases.insert(class.to_string(), alias.to_string());
    }

    fn resolve<'s>(&'s self, name: &'s str) -> Option<ResolvedType<'s>> {
        if let Some(element) = name.strip_suffix(ARRAY_MARKER) {
            if element.is_empty() {
                return None;
            }
            return Some(ResolvedType::Array(element));
        }
        if let Some((schema_type, format)) = primitive(name) {
            return Some(ResolvedType::Primitive {
                schema_type,
                format,
            });
        }
        self.introspector.class(name).map(ResolvedType::Class)
    }

    /// Definition name of a class in the current context
    pub fn definition_name(&self, class: &ClassDescriptor, context: &ExtractionContext) -> String {
        let name = self
            .aliases
            .get(&class.name)
            .or(class.alias.as_ref())
            .unwrap_or(&class.name);

        let name = match context.effective_model_context() {
            Some(model_context) if !model_context.is_empty() => {
                format!("{}{}{}", name, SUFFIX_SEPARATOR, model_context.fingerprint())
            }
            _ => name.clone(),
        };
        name.replace("::", ".")
    }

    fn extract_class(
        &self,
        class: &ClassDescriptor,
        schema: &mut Schema,
        context: &mut ExtractionContext,
    ) -> Result<()> {
        let definition_name = self.definition_name(class, context);
        let known = context.root().has_definition(&definition_name);

        if !known {
            debug!("Extracting definition {} from class {}", definition_name, class.name);
            // Registered before recursing so cyclic references find it.
            context
                .root_mut()
                .add_definition(definition_name.clone(), Schema::object());

            let mut definition = Schema::object();
            context.swagger().extract(
                &Source::Class(class),
                &mut Target::Schema(&mut definition),
                context,
            )?;
            context
                .root_mut()
                .add_definition(definition_name.clone(), definition);
        }

        schema.reference = Some(Document::definition_reference(&definition_name));
        Ok(())
    }
}

impl Extractor for TypeSchemaExtractor {
    fn name(&self) -> &'static str {
        "TypeSchemaExtractor"
    }

    fn supports(&self) -> (SourceKind, TargetKind) {
        (SourceKind::TypeName, TargetKind::Schema)
    }

    fn can_extract(&self, source: &Source, target: &Target, _context: &ExtractionContext) -> bool {
        match (source, target) {
            (Source::TypeName(name), Target::Schema(_)) => self.resolve(name).is_some(),
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
        let (Source::TypeName(name), Target::Schema(schema)) = (source, target) else {
            return Ok(());
        };

        match self.resolve(name) {
            Some(ResolvedType::Primitive {
                schema_type,
                format,
            }) => {
                schema.schema_type = Some(schema_type.to_string());
                if schema_type == "array" {
                    schema.items = Some(Box::new(Schema::new()));
                }
                if let Some(format) = format {
                    schema.format = Some(format.to_string());
                }
            }
            Some(ResolvedType::Array(element)) => {
                schema.schema_type = Some("array".to_string());
                let mut items = Schema::new();
                context.swagger().extract(
                    &Source::TypeName(element),
                    &mut Target::Schema(&mut items),
                    context,
                )?;
                schema.items = Some(Box::new(items));
            }
            Some(ResolvedType::Class(class)) => self.extract_class(class, schema, context)?,
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ModelContext;
    use crate::introspection::{PropertyDescriptor, Registry, TypeDescriptor};
    use crate::extraction::extractor::PropertyExtractor;
    use crate::swagger::Swagger;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> Rc<Registry> {
        let mut registry = Registry::new();
        registry
            .register_class(
                ClassDescriptor::new("Author")
                    .with_property(PropertyDescriptor::new("name", TypeDescriptor::named("string")))
                    .with_property(PropertyDescriptor::new(
                        "books",
                        TypeDescriptor::list(TypeDescriptor::named("Book")),
                    )),
            )
            .register_class(
                ClassDescriptor::new("Book")
                    .with_property(PropertyDescriptor::new("author", TypeDescriptor::named("Author"))),
            )
            .register_class(ClassDescriptor::new("app::models::Tag"));
        Rc::new(registry)
    }

    fn swagger(registry: Rc<Registry>) -> Swagger {
        let mut swagger = Swagger::new();
        swagger.register_extractor(Box::new(PropertyExtractor::new(registry.clone())));
        swagger.register_extractor(Box::new(TypeSchemaExtractor::new(registry)));
        swagger
    }

    fn extract(swagger: &Swagger, context: &mut ExtractionContext, type_name: &str) -> Schema {
        let mut schema = Schema::new();
        swagger
            .extract(&Source::TypeName(type_name), &mut Target::Schema(&mut schema), context)
            .unwrap();
        schema
    }

    #[test]
    fn test_primitive_aliases() {
        let swagger = swagger(registry());
        let mut context = swagger.create_context(Document::new());

        let cases = [
            ("int", json!({"type": "integer", "format": "int32"})),
            ("integer", json!({"type": "integer", "format": "int32"})),
            ("long", json!({"type": "integer", "format": "int64"})),
            ("float", json!({"type": "number", "format": "float"})),
            ("double", json!({"type": "number", "format": "double"})),
            ("string", json!({"type": "string"})),
            ("byte", json!({"type": "string", "format": "byte"})),
            ("boolean", json!({"type": "boolean"})),
            ("date", json!({"type": "string", "format": "date"})),
            ("DateTime", json!({"type": "string", "format": "date-time"})),
            ("dateTime", json!({"type": "string", "format": "date-time"})),
            ("password", json!({"type": "string", "format": "password"})),
            ("array", json!({"type": "array", "items": {}})),
        ];
        for (type_name, expected) in cases {
            let schema = extract(&swagger, &mut context, type_name);
            assert_eq!(serde_json::to_value(&schema).unwrap(), expected, "{}", type_name);
        }
    }

    #[test]
    fn test_array_notation() {
        let swagger = swagger(registry());
        let mut context = swagger.create_context(Document::new());

        let schema = extract(&swagger, &mut context, "long[][]");
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"type": "array", "items": {"type": "array", "items": {"type": "integer", "format": "int64"}}})
        );
    }

    #[test]
    fn test_unknown_types_are_not_handled() {
        let registry = registry();
        let extractor = TypeSchemaExtractor::new(registry);
        let swagger = Swagger::new();
        let context = swagger.create_context(Document::new());
        let mut schema = Schema::new();

        for name in ["Unknown", "[]", "mixed"] {
            assert!(!extractor.can_extract(&Source::TypeName(name), &Target::Schema(&mut schema), &context));
        }
    }

    #[test]
    fn test_cyclic_classes_terminate_with_one_definition_each() {
        let swagger = swagger(registry());
        let mut context = swagger.create_context(Document::new());

        let schema = extract(&swagger, &mut context, "Author");
        assert_eq!(schema.reference.as_deref(), Some("#/definitions/Author"));

        let document = context.into_document();
        let definitions = document.definitions.as_ref().unwrap();
        assert_eq!(definitions.keys().collect::<Vec<_>>(), vec!["Author", "Book"]);
        assert_eq!(
            serde_json::to_value(&definitions["Book"]).unwrap(),
            json!({"type": "object", "properties": {"author": {"$ref": "#/definitions/Author"}}})
        );
        assert_eq!(
            serde_json::to_value(&definitions["Author"]).unwrap(),
            json!({"type": "object", "properties": {
                "name": {"type": "string"},
                "books": {"type": "array", "items": {"$ref": "#/definitions/Book"}}
            }})
        );
    }

    #[test]
    fn test_definition_names_with_alias_namespace_and_model_context() {
        let registry = registry();
        let mut extractor = TypeSchemaExtractor::new(registry.clone());
        extractor.register_definition_alias("Book", "Volume");
        let swagger = Swagger::new();
        let mut context = swagger.create_context(Document::new());

        let book = registry.class("Book").unwrap();
        let tag = registry.class("app::models::Tag").unwrap();
        assert_eq!(extractor.definition_name(book, &context), "Volume");
        assert_eq!(extractor.definition_name(tag, &context), "app.models.Tag");

        let model_context = ModelContext::new().with_serializer_groups(["public"]);
        let hash = model_context.fingerprint();
        context.model_context = Some(model_context);
        assert_eq!(extractor.definition_name(book, &context), format!("Volume?{}", hash));
    }

    #[test]
    fn test_existing_definition_is_reused() {
        let swagger = swagger(registry());
        let mut document = Document::new();
        document.add_definition("Book", Schema::typed("string"));
        let mut context = swagger.create_context(document);

        let schema = extract(&swagger, &mut context, "Book");
        assert_eq!(schema.reference.as_deref(), Some("#/definitions/Book"));
        assert_eq!(context.root().definition("Book"), Some(&Schema::typed("string")));
    }
}

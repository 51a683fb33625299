use crate::error::{Error, Result};
use crate::extraction::{
    Direction, ExtractionContext, Extractor, Source, SourceKind, Target, TargetKind,
};
use crate::introspection::{DocTag, MethodDescriptor, TypeIntrospector};
use crate::schema::{Operation, Parameter, Response, Schema};
use log::{debug, warn};
use std::rc::Rc;

/// Return type meaning "no content"
const VOID: &str = "void";
const DEFAULT_SUCCESS_STATUS: u16 = 200;
const NO_CONTENT_STATUS: u16 = 204;
const DEFAULT_ERROR_STATUS: u16 = 500;
const NO_RETURN_DESCRIPTION: &str = "Success";

#[derive(Debug, Clone)]
struct ExceptionResponseCode {
    class: String,
    code: u16,
    message: Option<String>,
}

/// Builds an operation from the documentation of a method.
///
/// `@return` tags become success responses, `@throws` tags become error responses
/// with the status registered for the exception class, and `@param` tags fill in
/// whatever the parameters (or the properties of the body schema) are missing.
pub struct DocOperationExtractor {
    introspector: Rc<dyn TypeIntrospector>,
    exception_codes: Vec<ExceptionResponseCode>,
}

impl DocOperationExtractor {
    pub fn new(introspector: Rc<dyn TypeIntrospector>) -> Self {
        Self {
            introspector,
            exception_codes: Vec::new(),
        }
    }

    /// Document `class` and its subclasses as a `code` response.
    ///
    /// Mappings are checked in registration order; the first one naming the thrown
    /// class or one of its ancestors is used.
    pub fn register_exception_response_code(
        &mut self,
        class: &str,
        code: u16,
        message: Option<&str>,
    ) {
        self.exception_codes.push(ExceptionResponseCode {
            class: class.to_string(),
            code,
            message: message.map(str::to_string),
        });
    }

    fn type_context<'a>(
        context: &ExtractionContext<'a>,
        method: &MethodDescriptor,
        direction: Direction,
    ) -> ExtractionContext<'a> {
        let mut sub = context.sub_context();
        sub.direction = Some(direction);
        sub.method = Some(method.qualified_name());
        sub
    }

    fn extract_type(
        type_name: &str,
        schema: &mut Schema,
        context: &mut ExtractionContext,
    ) -> Result<()> {
        context
            .swagger()
            .extract(&Source::TypeName(type_name), &mut Target::Schema(&mut *schema), context)?;
        if *schema == Schema::new() {
            warn!("Unresolved type {} in {}", type_name, context.method.as_deref().unwrap_or("?"));
        }
        Ok(())
    }

    fn extract_returns(
        &self,
        method: &MethodDescriptor,
        operation: &mut Operation,
        context: &ExtractionContext,
    ) -> Result<()> {
        let mut documented = false;
        for tag in &method.doc.tags {
            let DocTag::Return { types, description } = tag else {
                continue;
            };
            documented = true;

            if types.iter().any(|type_name| type_name == VOID) {
                if types.len() > 1 {
                    return Err(Error::Configuration(format!(
                        "{}: void cannot be combined with other return types",
                        method.qualified_name()
                    )));
                }
                operation.set_response(
                    NO_CONTENT_STATUS.to_string(),
                    Response::new(description.clone()),
                );
                continue;
            }

            for type_name in types {
                let mut sub = Self::type_context(context, method, Direction::Out);
                sub.response_status = None;
                let mut schema = Schema::new();
                Self::extract_type(type_name, &mut schema, &mut sub)?;

                let status = sub.response_status.unwrap_or(DEFAULT_SUCCESS_STATUS);
                let mut response = Response::new(description.clone());
                response.schema = Some(schema);
                operation.set_response(status.to_string(), response);
            }
        }

        if !documented {
            operation.set_response(
                NO_CONTENT_STATUS.to_string(),
                Response::new(Some(NO_RETURN_DESCRIPTION.to_string())),
            );
        }
        Ok(())
    }

    fn exception_response(&self, type_name: &str) -> (u16, Option<String>) {
        let mut chain = vec![type_name];
        chain.extend(
            self.introspector
                .ancestors(type_name)
                .into_iter()
                .map(|class| class.name.as_str()),
        );

        self.exception_codes
            .iter()
            .find(|mapping| chain.contains(&mapping.class.as_str()))
            .map(|mapping| (mapping.code, mapping.message.clone()))
            .unwrap_or((DEFAULT_ERROR_STATUS, None))
    }

    fn extract_throws(&self, method: &MethodDescriptor, operation: &mut Operation) {
        for tag in &method.doc.tags {
            let DocTag::Throws {
                type_name,
                description,
            } = tag
            else {
                continue;
            };

            let class = self.introspector.class(type_name);
            if class.is_none() {
                warn!("Unknown exception {} thrown by {}", type_name, method.qualified_name());
            }
            let (code, message) = self.exception_response(type_name);
            let description = description
                .clone()
                .or(message)
                .or_else(|| class.and_then(|class| class.summary.clone()));

            debug!("{} throws {} as {}", method.qualified_name(), type_name, code);
            operation.set_response(code.to_string(), Response::new(description));
        }
    }

    fn extract_params(
        &self,
        method: &MethodDescriptor,
        operation: &mut Operation,
        context: &ExtractionContext,
    ) -> Result<()> {
        for tag in &method.doc.tags {
            let DocTag::Param {
                name,
                type_name,
                description,
            } = tag
            else {
                continue;
            };

            if let Some(parameter) = operation.parameter_mut(name) {
                if parameter.description().is_none() {
                    parameter.set_description(description.clone());
                }
                let Some(type_name) = type_name else {
                    continue;
                };
                let mut sub = Self::type_context(context, method, Direction::In);
                match parameter {
                    Parameter::Body(body) => {
                        if body.schema.is_none() {
                            let mut schema = Schema::new();
                            Self::extract_type(type_name, &mut schema, &mut sub)?;
                            body.schema = Some(schema);
                        }
                    }
                    Parameter::Path(general)
                    | Parameter::Query(general)
                    | Parameter::Header(general)
                    | Parameter::FormData(general) => {
                        if general.schema_type.is_none() {
                            let mut schema = Schema::new();
                            Self::extract_type(type_name, &mut schema, &mut sub)?;
                            general.schema_type = schema.schema_type;
                            general.format = schema.format;
                            general.items = schema.items;
                        }
                    }
                }
                continue;
            }

            let property = operation
                .body_parameter_mut()
                .and_then(|body| body.schema.as_mut())
                .and_then(|schema| schema.property_mut(name));
            if let Some(property) = property {
                if property.description.is_none() {
                    property.description = description.clone();
                }
                if let Some(type_name) = type_name {
                    if property.schema_type.is_none() && property.reference.is_none() {
                        let mut sub = Self::type_context(context, method, Direction::In);
                        Self::extract_type(type_name, property, &mut sub)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Extractor for DocOperationExtractor {
    fn name(&self) -> &'static str {
        "DocOperationExtractor"
    }

    fn supports(&self) -> (SourceKind, TargetKind) {
        (SourceKind::Method, TargetKind::Operation)
    }

    fn can_extract(&self, source: &Source, target: &Target, _context: &ExtractionContext) -> bool {
        matches!((source, target), (Source::Method(_), Target::Operation(_)))
    }

    fn extract(
        &self,
        source: &Source,
        target: &mut Target,
        context: &mut ExtractionContext,
    ) -> Result<()> {
        self.assert_can_extract(source, target, context)?;
        let (Source::Method(method), Target::Operation(operation)) = (source, target) else {
            return Ok(());
        };
        let doc = &method.doc;

        if operation.summary.is_none() {
            operation.summary = doc.summary.clone();
        }
        if operation.description.is_none() {
            operation.description = doc.description.clone();
        }
        if doc.is_deprecated() {
            operation.deprecated = Some(true);
        }

        self.extract_returns(method, operation, context)?;
        self.extract_throws(method, operation);
        self.extract_params(method, operation, context)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::extractor::{PropertyExtractor, TypeSchemaExtractor};
    use crate::introspection::{ClassDescriptor, DocBlock, PropertyDescriptor, Registry, TypeDescriptor};
    use crate::schema::{BodyParameter, Document, ParameterLocation};
    use crate::swagger::Swagger;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> Rc<Registry> {
        let mut registry = Registry::new();
        registry
            .register_class(
                ClassDescriptor::new("Foo")
                    .with_property(PropertyDescriptor::new("id", TypeDescriptor::named("int"))),
            )
            .register_class(ClassDescriptor::new("Exception").with_summary("Something failed"))
            .register_class(
                ClassDescriptor::new("NotFoundException")
                    .with_parent("Exception")
                    .with_summary("No such resource"),
            )
            .register_class(
                ClassDescriptor::new("GoneException")
                    .with_parent("NotFoundException")
                    .with_summary("The resource is gone"),
            )
            .register_class(ClassDescriptor::new("ConflictException").with_summary("Conflicting state"));
        Rc::new(registry)
    }

    fn swagger(configure: impl FnOnce(&mut DocOperationExtractor)) -> Swagger {
        let registry = registry();
        let mut doc_operation = DocOperationExtractor::new(registry.clone());
        configure(&mut doc_operation);

        let mut swagger = Swagger::new();
        swagger.register_extractor(Box::new(PropertyExtractor::new(registry.clone())));
        swagger.register_extractor(Box::new(TypeSchemaExtractor::new(registry)));
        swagger.register_extractor_at(Box::new(doc_operation), 999, "default");
        swagger
    }

    fn run(swagger: &Swagger, doc: &str, operation: &mut Operation) -> Result<Document> {
        let mut method = MethodDescriptor::new("show", DocBlock::parse(doc));
        method.class = Some("FooController".to_string());
        let mut context = swagger.create_context(Document::new());
        swagger.extract(&Source::Method(&method), &mut Target::Operation(operation), &mut context)?;
        Ok(context.into_document())
    }

    #[test]
    fn test_return_and_mapped_exception() {
        let swagger = swagger(|extractor| {
            extractor.register_exception_response_code("NotFoundException", 404, None)
        });
        let mut operation = Operation::new();
        let document = run(
            &swagger,
            "Show a foo.\n\nLoads it from storage.\n\n@return Foo\n@throws NotFoundException",
            &mut operation,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&operation).unwrap(),
            json!({
                "summary": "Show a foo.",
                "description": "Loads it from storage.",
                "responses": {
                    "200": {"schema": {"$ref": "#/definitions/Foo"}},
                    "404": {"description": "No such resource"}
                }
            })
        );
        assert!(document.has_definition("Foo"));
    }

    /// Marks every resolved type as a creation response
    struct CreatedStatusExtractor;

    impl Extractor for CreatedStatusExtractor {
        fn name(&self) -> &'static str {
            "CreatedStatusExtractor"
        }

        fn supports(&self) -> (SourceKind, TargetKind) {
            (SourceKind::TypeName, TargetKind::Schema)
        }

        fn can_extract(&self, source: &Source, target: &Target, _context: &ExtractionContext) -> bool {
            matches!((source, target), (Source::TypeName(_), Target::Schema(_)))
        }

        fn extract(
            &self,
            source: &Source,
            target: &mut Target,
            context: &mut ExtractionContext,
        ) -> Result<()> {
            self.assert_can_extract(source, target, context)?;
            context.response_status = Some(201);
            Ok(())
        }
    }

    #[test]
    fn test_type_extractors_choose_the_response_status() {
        let mut swagger = swagger(|_| {});
        swagger.register_extractor_at(Box::new(CreatedStatusExtractor), 1, "default");

        let mut method = MethodDescriptor::new("create", DocBlock::parse("@return Foo Created"));
        method.class = Some("FooController".to_string());
        let mut operation = Operation::new();
        let mut context = swagger.create_context(Document::new());
        swagger
            .extract(&Source::Method(&method), &mut Target::Operation(&mut operation), &mut context)
            .unwrap();

        let response = operation.response("201").unwrap();
        assert_eq!(response.description.as_deref(), Some("Created"));
        assert_eq!(
            serde_json::to_value(&response.schema).unwrap(),
            json!({"$ref": "#/definitions/Foo"})
        );
        assert!(operation.response("200").is_none());
        assert_eq!(context.response_status, None);
    }

    #[test]
    fn test_void_and_missing_return() {
        let swagger = swagger(|_| {});

        let mut operation = Operation::new();
        run(&swagger, "@return void Nothing to see", &mut operation).unwrap();
        let response = operation.response("204").unwrap();
        assert_eq!(response.description.as_deref(), Some("Nothing to see"));
        assert!(response.schema.is_none());

        let mut operation = Operation::new();
        run(&swagger, "Just a summary.", &mut operation).unwrap();
        assert_eq!(
            operation.response("204").unwrap().description.as_deref(),
            Some("Success")
        );
        assert_eq!(operation.responses.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_void_cannot_be_combined() {
        let swagger = swagger(|_| {});
        let mut operation = Operation::new();
        let err = run(&swagger, "@return Foo|void", &mut operation).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_exception_mapping_precedence() {
        let swagger = swagger(|extractor| {
            extractor.register_exception_response_code("NotFoundException", 404, Some("Not found"));
            extractor.register_exception_response_code("GoneException", 410, None);
        });

        let mut operation = Operation::new();
        run(
            &swagger,
            "@return Foo\n@throws GoneException\n@throws ConflictException Already taken\n@throws Mystery",
            &mut operation,
        )
        .unwrap();

        let responses = operation.responses.as_ref().unwrap();
        assert_eq!(responses.keys().collect::<Vec<_>>(), vec!["200", "404", "500"]);
        assert_eq!(responses["404"].description.as_deref(), Some("Not found"));
        assert_eq!(responses["500"].description, None);
    }

    #[test]
    fn test_summary_and_description_are_not_overwritten() {
        let swagger = swagger(|_| {});
        let mut operation = Operation::new();
        operation.summary = Some("Given".to_string());
        run(&swagger, "From docs.\n\n@deprecated use another one", &mut operation).unwrap();

        assert_eq!(operation.summary.as_deref(), Some("Given"));
        assert_eq!(operation.deprecated, Some(true));
    }

    #[test]
    fn test_params_fill_parameters_and_body_properties() {
        let swagger = swagger(|_| {});
        let mut operation = Operation::new();
        operation.add_parameter(Parameter::new(ParameterLocation::Path, "id"));
        operation.add_parameter(Parameter::new(ParameterLocation::Query, "tags"));
        let mut body = BodyParameter::new();
        let mut body_schema = Schema::object();
        body_schema.set_property("name", Schema::new());
        body_schema.set_property("size", Schema::typed("integer"));
        body.schema = Some(body_schema);
        operation.add_parameter(Parameter::Body(body));

        run(
            &swagger,
            "@param int $id The identifier\n@param string[] $tags\n@param string $name Display name\n@param string $size Size\n@param int $unknown",
            &mut operation,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(operation.parameters.as_ref().unwrap()).unwrap(),
            json!([
                {"in": "path", "name": "id", "required": true, "description": "The identifier", "type": "integer", "format": "int32"},
                {"in": "query", "name": "tags", "type": "array", "items": {"type": "string"}},
                {"in": "body", "name": "body", "schema": {"type": "object", "properties": {
                    "name": {"type": "string", "description": "Display name"},
                    "size": {"type": "integer", "description": "Size"}
                }}}
            ])
        );
    }

    #[test]
    fn test_body_parameter_schema_from_param_type() {
        let swagger = swagger(|_| {});
        let mut operation = Operation::new();
        operation.add_parameter(Parameter::new(ParameterLocation::Body, "payload"));

        run(&swagger, "@param Foo $payload", &mut operation).unwrap();

        let Some(Parameter::Body(body)) = operation.parameter("payload") else {
            panic!("body parameter expected");
        };
        assert_eq!(
            body.schema.as_ref().unwrap().reference.as_deref(),
            Some("#/definitions/Foo")
        );
    }
}

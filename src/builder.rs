use crate::extraction::extractor::{
    ChoiceConstraintExtractor, ConstraintExtractor, ConstraintSchemaExtractor,
    CountConstraintExtractor, DocOperationExtractor, InheritanceExtractor,
    LengthConstraintExtractor, NotBlankConstraintExtractor, ParameterAnnotationExtractor,
    PropertyExtractor, RangeConstraintExtractor, TagAnnotationExtractor, TypeSchemaExtractor,
};
use crate::extraction::Extractor;
use crate::introspection::{
    InheritanceMetadataProvider, PropertyNamingStrategy, Registry, SerializedNameStrategy,
    TypeIntrospector, ValidationMetadataProvider,
};
use crate::swagger::{Swagger, DEFAULT_SECTION};
use log::debug;
use std::rc::Rc;

/// Position of the doc operation extractor, after every annotation extractor
const DOC_OPERATION_POSITION: i32 = 999;

/// Assembles a [`Swagger`] engine with the built-in extractors.
///
/// Constraint extractors are only registered when validation metadata is configured,
/// the inheritance extractor only when inheritance metadata is.
///
/// # Example
///
/// ```no_run
/// use swagger_from_source::builder::Builder;
/// use swagger_from_source::introspection::Registry;
/// use std::rc::Rc;
///
/// let swagger = Builder::from_registry(Rc::new(Registry::new()))
///     .register_exception_response_code("NotFound", 404, Some("Not found"))
///     .clean_on_dump(true)
///     .build();
/// println!("{:?}", swagger.extractor_names());
/// ```
pub struct Builder {
    introspector: Rc<dyn TypeIntrospector>,
    validation: Option<Rc<dyn ValidationMetadataProvider>>,
    inheritance: Option<Rc<dyn InheritanceMetadataProvider>>,
    naming: Rc<dyn PropertyNamingStrategy>,
    definition_aliases: Vec<(String, String)>,
    exception_codes: Vec<(String, u16, Option<String>)>,
    register_defaults: bool,
    clean_on_dump: bool,
}

impl Builder {
    pub fn new(introspector: Rc<dyn TypeIntrospector>) -> Self {
        Self {
            introspector,
            validation: None,
            inheritance: None,
            naming: Rc::new(SerializedNameStrategy),
            definition_aliases: Vec::new(),
            exception_codes: Vec::new(),
            register_defaults: true,
            clean_on_dump: false,
        }
    }

    /// Use one registry for types, validation and inheritance metadata
    pub fn from_registry(registry: Rc<Registry>) -> Self {
        Self::new(registry.clone())
            .validation_metadata(registry.clone())
            .inheritance_metadata(registry)
    }

    pub fn validation_metadata(mut self, validation: Rc<dyn ValidationMetadataProvider>) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn inheritance_metadata(mut self, inheritance: Rc<dyn InheritanceMetadataProvider>) -> Self {
        self.inheritance = Some(inheritance);
        self
    }

    pub fn naming_strategy(mut self, naming: Rc<dyn PropertyNamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    pub fn register_definition_alias(mut self, class: &str, alias: &str) -> Self {
        self.definition_aliases
            .push((class.to_string(), alias.to_string()));
        self
    }

    pub fn register_exception_response_code(
        mut self,
        class: &str,
        code: u16,
        message: Option<&str>,
    ) -> Self {
        self.exception_codes
            .push((class.to_string(), code, message.map(str::to_string)));
        self
    }

    /// Whether to register the built-in extractors at all
    pub fn register_defaults(mut self, register_defaults: bool) -> Self {
        self.register_defaults = register_defaults;
        self
    }

    pub fn clean_on_dump(mut self, clean_on_dump: bool) -> Self {
        self.clean_on_dump = clean_on_dump;
        self
    }

    fn constraint_extractor<C: ConstraintExtractor + 'static>(
        &self,
        constraint_extractor: C,
        validation: &Rc<dyn ValidationMetadataProvider>,
    ) -> Box<dyn Extractor> {
        Box::new(
            ConstraintSchemaExtractor::new(
                constraint_extractor,
                self.introspector.clone(),
                validation.clone(),
            )
            .with_naming_strategy(self.naming.clone()),
        )
    }

    pub fn build(self) -> Swagger {
        let mut swagger = Swagger::new();
        swagger.set_clean_on_dump(self.clean_on_dump);
        if !self.register_defaults {
            return swagger;
        }

        swagger.register_extractor(Box::new(
            PropertyExtractor::new(self.introspector.clone()).with_naming_strategy(self.naming.clone()),
        ));

        if let Some(validation) = &self.validation {
            swagger.register_extractor(self.constraint_extractor(LengthConstraintExtractor, validation));
            swagger.register_extractor(self.constraint_extractor(RangeConstraintExtractor, validation));
            swagger.register_extractor(self.constraint_extractor(CountConstraintExtractor, validation));
            swagger.register_extractor(self.constraint_extractor(ChoiceConstraintExtractor, validation));
            swagger.register_extractor(self.constraint_extractor(NotBlankConstraintExtractor, validation));
        }

        swagger.register_extractor(Box::new(TagAnnotationExtractor));
        swagger.register_extractor(Box::new(ParameterAnnotationExtractor));

        let mut type_schema = TypeSchemaExtractor::new(self.introspector.clone());
        for (class, alias) in &self.definition_aliases {
            type_schema.register_definition_alias(class, alias);
        }
        swagger.register_extractor(Box::new(type_schema));

        if let Some(inheritance) = &self.inheritance {
            swagger.register_extractor(Box::new(InheritanceExtractor::new(inheritance.clone())));
        }

        let mut doc_operation = DocOperationExtractor::new(self.introspector.clone());
        for (class, code, message) in &self.exception_codes {
            doc_operation.register_exception_response_code(class, *code, message.as_deref());
        }
        swagger.register_extractor_at(Box::new(doc_operation), DOC_OPERATION_POSITION, DEFAULT_SECTION);

        debug!("Built engine with extractors {:?}", swagger.extractor_names());
        swagger
    }
}

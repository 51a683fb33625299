use crate::error::Result;
use crate::extraction::{ExtractionContext, Extractor, Source, SourceKind, Target, TargetKind};
use crate::introspection::Annotation;

/// Appends every parameter annotation of a method to the operation
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterAnnotationExtractor;

impl Extractor for ParameterAnnotationExtractor {
    fn name(&self) -> &'static str {
        "ParameterAnnotationExtractor"
    }

    fn supports(&self) -> (SourceKind, TargetKind) {
        (SourceKind::Method, TargetKind::Operation)
    }

    fn can_extract(&self, source: &Source, target: &Target, _context: &ExtractionContext) -> bool {
        match (source, target) {
            (Source::Method(method), Target::Operation(_)) => method
                .annotations
                .iter()
                .any(|annotation| matches!(annotation, Annotation::Parameter(_))),
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
        let (Source::Method(method), Target::Operation(operation)) = (source, target) else {
            return Ok(());
        };
        for annotation in &method.annotations {
            if let Annotation::Parameter(parameter) = annotation {
                operation.add_parameter(parameter.clone());
            }
        }
        Ok(())
    }
}

/// Appends every tag annotation of a method to the operation
#[derive(Debug, Clone, Copy, Default)]
pub struct TagAnnotationExtractor;

impl Extractor for TagAnnotationExtractor {
    fn name(&self) -> &'static str {
        "TagAnnotationExtractor"
    }

    fn supports(&self) -> (SourceKind, TargetKind) {
        (SourceKind::Method, TargetKind::Operation)
    }

    fn can_extract(&self, source: &Source, target: &Target, _context: &ExtractionContext) -> bool {
        match (source, target) {
            (Source::Method(method), Target::Operation(_)) => method
                .annotations
                .iter()
                .any(|annotation| matches!(annotation, Annotation::Tag(_))),
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
        let (Source::Method(method), Target::Operation(operation)) = (source, target) else {
            return Ok(());
        };
        for annotation in &method.annotations {
            if let Annotation::Tag(name) = annotation {
                operation.add_tag(name.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::introspection::{DocBlock, MethodDescriptor};
    use crate::schema::{
        Document, HttpMethod, Operation, Parameter, ParameterLocation, ParameterOrRef, Schema,
    };
    use crate::swagger::Swagger;
    use pretty_assertions::assert_eq;

    fn method() -> MethodDescriptor {
        MethodDescriptor::new("list", DocBlock::default())
            .with_annotation(Annotation::Tag("users".to_string()))
            .with_annotation(Annotation::Parameter(Parameter::new(ParameterLocation::Query, "page")))
            .with_annotation(Annotation::Route {
                method: HttpMethod::Get,
                path: "/users".to_string(),
            })
            .with_annotation(Annotation::Tag("users".to_string()))
    }

    #[test]
    fn test_annotations_are_appended_without_dedup() {
        let mut swagger = Swagger::new();
        swagger.register_extractor(Box::new(TagAnnotationExtractor));
        swagger.register_extractor(Box::new(ParameterAnnotationExtractor));

        let method = method();
        let mut operation = Operation::new();
        operation.add_tag("admin");
        let mut context = swagger.create_context(Document::new());
        swagger
            .extract(&Source::Method(&method), &mut Target::Operation(&mut operation), &mut context)
            .unwrap();

        assert_eq!(operation.tags, Some(vec!["admin".to_string(), "users".to_string(), "users".to_string()]));
        assert_eq!(
            operation.parameters,
            Some(vec![ParameterOrRef::from(Parameter::new(ParameterLocation::Query, "page"))])
        );
    }

    #[test]
    fn test_rejects_other_targets() {
        let swagger = Swagger::new();
        let method = method();
        let mut context = swagger.create_context(Document::new());
        let mut schema = Schema::new();

        assert!(!TagAnnotationExtractor.can_extract(&Source::Method(&method), &Target::Schema(&mut schema), &context));
        let err = ParameterAnnotationExtractor
            .extract(&Source::Method(&method), &mut Target::Schema(&mut schema), &mut context)
            .unwrap_err();
        assert!(matches!(err, Error::ExtractionImpossible { extractor: "ParameterAnnotationExtractor" }));
    }
}

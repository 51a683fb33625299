use crate::error::Result;
use crate::extraction::{ExtractionContext, Extractor, Source, SourceKind, Target, TargetKind};
use crate::schema::{Document, SWAGGER_VERSION};
use log::debug;
use serde_json::Value;

/// Loads an existing Swagger 2.0 JSON document into the root document.
///
/// Text that is not JSON, not an object or not declared as version 2.0 is simply not
/// handled by this extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwaggerSchemaExtractor;

impl SwaggerSchemaExtractor {
    fn parse(raw: &str) -> Option<Value> {
        let value: Value = serde_json::from_str(raw).ok()?;
        match value.get("swagger") {
            Some(Value::String(version)) if version == SWAGGER_VERSION => Some(value),
            _ => None,
        }
    }
}

impl Extractor for SwaggerSchemaExtractor {
    fn name(&self) -> &'static str {
        "SwaggerSchemaExtractor"
    }

    fn supports(&self) -> (SourceKind, TargetKind) {
        (SourceKind::Raw, TargetKind::Document)
    }

    fn can_extract(&self, source: &Source, target: &Target, _context: &ExtractionContext) -> bool {
        match (source, target) {
            (Source::Raw(raw), Target::Document) => Self::parse(raw).is_some(),
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
        let Source::Raw(raw) = source else {
            return Ok(());
        };
        let document: Document = serde_json::from_str(raw)?;
        debug!(
            "Loaded base document with {} paths and {} definitions",
            document.paths.as_ref().map_or(0, |paths| paths.len()),
            document.definitions.as_ref().map_or(0, |definitions| definitions.len())
        );
        context.replace_root(document);
        Ok(())
    }
}

//! The extraction engine.
//!
//! [`Swagger`] owns the registered extractors and runs every applicable one, in a
//! stable order, against a source/target pair. It also validates, cleans and
//! serializes finished documents.

use crate::cleaner::SchemaCleaner;
use crate::error::{Error, Result};
use crate::extraction::extractor::SwaggerSchemaExtractor;
use crate::extraction::{ExtractionContext, Extractor, Source, Target};
use crate::schema::Document;
use crate::serializer;
use log::debug;
use std::cell::OnceCell;

/// Section extractors land in unless another one is given
pub const DEFAULT_SECTION: &str = "default";

/// Section of the bootstrap extractor registered by [`Swagger::new`]
pub const SWAGGER_SECTION: &str = "swagger";

struct Registration {
    section: String,
    position: i32,
    extractor: Box<dyn Extractor>,
}

/// Extraction engine
pub struct Swagger {
    registrations: Vec<Registration>,
    /// Indexes into `registrations` in dispatch order
    sorted: OnceCell<Vec<usize>>,
    cleaner: SchemaCleaner,
    clean_on_dump: bool,
}

impl Swagger {
    /// Create an engine with only the bootstrap extractor registered
    pub fn new() -> Self {
        let mut swagger = Self {
            registrations: Vec::new(),
            sorted: OnceCell::new(),
            cleaner: SchemaCleaner::new(),
            clean_on_dump: false,
        };
        swagger.register_extractor_at(Box::new(SwaggerSchemaExtractor), -1, SWAGGER_SECTION);
        swagger
    }

    /// Register an extractor at position 0 of the default section
    pub fn register_extractor(&mut self, extractor: Box<dyn Extractor>) {
        self.register_extractor_at(extractor, 0, DEFAULT_SECTION);
    }

    /// Register an extractor at a position of a section.
    ///
    /// Sections run in the order they were first used, positions ascending inside a
    /// section, registration order breaking ties.
    pub fn register_extractor_at(
        &mut self,
        extractor: Box<dyn Extractor>,
        position: i32,
        section: &str,
    ) {
        debug!(
            "Registering extractor {} at position {} of section {}",
            extractor.name(),
            position,
            section
        );
        self.registrations.push(Registration {
            section: section.to_string(),
            position,
            extractor,
        });
        self.sorted = OnceCell::new();
    }

    pub fn set_clean_on_dump(&mut self, clean_on_dump: bool) {
        self.clean_on_dump = clean_on_dump;
    }

    pub fn clean_on_dump(&self) -> bool {
        self.clean_on_dump
    }

    fn sorted_indexes(&self) -> &[usize] {
        self.sorted.get_or_init(|| {
            let mut sections: Vec<&str> = Vec::new();
            for registration in &self.registrations {
                if !sections.contains(&registration.section.as_str()) {
                    sections.push(&registration.section);
                }
            }

            let mut indexes: Vec<usize> = (0..self.registrations.len()).collect();
            indexes.sort_by_key(|&index| {
                let registration = &self.registrations[index];
                let section = sections
                    .iter()
                    .position(|section| *section == registration.section)
                    .unwrap_or(sections.len());
                (section, registration.position, index)
            });
            indexes
        })
    }

    /// Names of the registered extractors in dispatch order
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.sorted_indexes()
            .iter()
            .map(|&index| self.registrations[index].extractor.name())
            .collect()
    }

    /// Run every applicable extractor against the source and target
    pub fn extract(
        &self,
        source: &Source,
        target: &mut Target,
        context: &mut ExtractionContext,
    ) -> Result<()> {
        let kinds = (source.kind(), target.kind());
        for &index in self.sorted_indexes() {
            let extractor = &self.registrations[index].extractor;
            if extractor.supports() != kinds {
                continue;
            }
            if !extractor.can_extract(source, target, context) {
                continue;
            }
            debug!("Running extractor {} on {:?}", extractor.name(), kinds);
            extractor.extract(source, target, context)?;
        }
        Ok(())
    }

    /// Extract a source into a fresh document
    pub fn extract_document(&self, source: &Source) -> Result<Document> {
        let mut context = self.create_context(Document::new());
        self.extract(source, &mut Target::Document, &mut context)?;
        Ok(context.into_document())
    }

    /// Root extraction context around a document
    pub fn create_context(&self, document: Document) -> ExtractionContext<'_> {
        ExtractionContext::new(self, document)
    }

    /// Check the structural constraints of a document, reporting every violation
    pub fn validate(&self, document: &Document) -> Result<()> {
        let violations = document.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(violations))
        }
    }

    fn prepare(&self, document: &Document, validate: bool) -> Result<Document> {
        let document = if self.clean_on_dump {
            self.cleaner.clean(document)
        } else {
            document.clone()
        };
        if validate {
            self.validate(&document)?;
        }
        Ok(document)
    }

    /// Serialize to JSON, cleaning first when clean-on-dump is enabled
    pub fn dump(&self, document: &Document, validate: bool) -> Result<String> {
        serializer::serialize_json(&self.prepare(document, validate)?)
    }

    /// Serialize to YAML, cleaning first when clean-on-dump is enabled
    pub fn dump_yaml(&self, document: &Document, validate: bool) -> Result<String> {
        serializer::serialize_yaml(&self.prepare(document, validate)?)
    }
}

impl Default for Swagger {
    fn default() -> Self {
        Self::new()
    }
}

//! The built-in extractors.
//!
//! # Extractors
//!
//! | Extractor | Source | Target |
//! |---|---|---|
//! | [`SwaggerSchemaExtractor`] | raw JSON | document |
//! | [`TypeSchemaExtractor`] | type name | schema |
//! | [`PropertyExtractor`] | class | schema |
//! | [`constraint::ConstraintSchemaExtractor`] | class | schema |
//! | [`InheritanceExtractor`] | class | schema |
//! | [`DocOperationExtractor`] | method | operation |
//! | [`ParameterAnnotationExtractor`], [`TagAnnotationExtractor`] | method | operation |
//!
//! Most of them recurse through [`crate::swagger::Swagger::extract`] for nested types,
//! so they only produce a complete result when registered together. The
//! [`crate::builder::Builder`] wires up the usual set.

mod annotation;
mod bootstrap;
pub mod constraint;
mod doc_operation;
mod inheritance;
mod property;
mod type_schema;

pub use annotation::{ParameterAnnotationExtractor, TagAnnotationExtractor};
pub use bootstrap::SwaggerSchemaExtractor;
pub use constraint::{
    ChoiceConstraintExtractor, ConstraintExtractionContext, ConstraintExtractor,
    ConstraintSchemaExtractor, CountConstraintExtractor, LengthConstraintExtractor,
    NotBlankConstraintExtractor, RangeConstraintExtractor,
};
pub use doc_operation::DocOperationExtractor;
pub use inheritance::{InheritanceExtractor, DISCRIMINATOR_DESCRIPTION};
pub use property::{compare_versions, PropertyExtractor};
pub use type_schema::TypeSchemaExtractor;

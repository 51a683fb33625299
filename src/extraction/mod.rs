//! Extraction contract shared by the engine and every extractor.
//!
//! An extraction takes a [`Source`] (a type name, a class, a documented method or raw
//! JSON text) and enriches a [`Target`] node of the document. Extractors are plugins:
//! each declares the source/target pair it handles, decides at runtime whether it
//! applies and then adds what it knows to the target. Several extractors usually
//! contribute to the same target.

pub mod context;
pub mod extractor;

pub use context::{Direction, ExtractionContext, ModelContext};

use crate::error::{Error, Result};
use crate::introspection::{ClassDescriptor, MethodDescriptor};
use crate::schema::{Operation, Schema};

/// What an extraction reads from
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// A primitive alias, a `T[]` array notation or a class name
    TypeName(&'a str),
    Class(&'a ClassDescriptor),
    Method(&'a MethodDescriptor),
    /// Raw document text
    Raw(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    TypeName,
    Class,
    Method,
    Raw,
}

impl Source<'_> {
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::TypeName(_) => SourceKind::TypeName,
            Source::Class(_) => SourceKind::Class,
            Source::Method(_) => SourceKind::Method,
            Source::Raw(_) => SourceKind::Raw,
        }
    }
}

/// The node an extraction writes into
#[derive(Debug)]
pub enum Target<'a> {
    Schema(&'a mut Schema),
    Operation(&'a mut Operation),
    /// The root document held by the extraction context
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Schema,
    Operation,
    Document,
}

impl Target<'_> {
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Schema(_) => TargetKind::Schema,
            Target::Operation(_) => TargetKind::Operation,
            Target::Document => TargetKind::Document,
        }
    }
}

/// A unit that enriches one kind of target from one kind of source.
///
/// The engine only consults an extractor whose [`supports`](Extractor::supports) pair
/// matches, then calls [`extract`](Extractor::extract) when
/// [`can_extract`](Extractor::can_extract) accepts the concrete values.
pub trait Extractor {
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    /// Source and target kinds this extractor handles
    fn supports(&self) -> (SourceKind, TargetKind);

    fn can_extract(&self, source: &Source, target: &Target, context: &ExtractionContext) -> bool;

    /// Add what this extractor knows about `source` to `target`.
    ///
    /// Fails with [`Error::ExtractionImpossible`] when `can_extract` rejects the pair.
    fn extract(
        &self,
        source: &Source,
        target: &mut Target,
        context: &mut ExtractionContext,
    ) -> Result<()>;

    fn assert_can_extract(
        &self,
        source: &Source,
        target: &Target,
        context: &ExtractionContext,
    ) -> Result<()> {
        if self.can_extract(source, target, context) {
            Ok(())
        } else {
            Err(Error::ExtractionImpossible {
                extractor: self.name(),
            })
        }
    }
}

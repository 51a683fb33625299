use crate::schema::Document;
use crate::swagger::Swagger;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Whether a type is being documented as input (request) or output (response)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

/// Serializer and validation groups a class projection is extracted for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelContext {
    pub serializer_groups: Option<BTreeSet<String>>,
    pub validation_groups: Option<BTreeSet<String>>,
}

impl ModelContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_serializer_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.serializer_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_validation_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validation_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.serializer_groups.is_none() && self.validation_groups.is_none()
    }

    /// Short stable hash of the groups, independent of their insertion order
    pub fn fingerprint(&self) -> String {
        let join = |groups: &Option<BTreeSet<String>>| match groups {
            Some(groups) => groups.iter().cloned().collect::<Vec<_>>().join(","),
            None => "~".to_string(),
        };
        let canonical = format!(
            "serializer_groups={};validation_groups={}",
            join(&self.serializer_groups),
            join(&self.validation_groups)
        );

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..8].to_string()
    }
}

/// State threaded through one extraction.
///
/// The root document is shared with every sub-context; all other fields are copied,
/// so a sub-context can be adjusted for a nested extraction without affecting its
/// parent.
#[derive(Clone)]
pub struct ExtractionContext<'a> {
    swagger: &'a Swagger,
    root: Rc<RefCell<Document>>,
    pub direction: Option<Direction>,
    pub model_context: Option<ModelContext>,
    pub in_model_context: Option<ModelContext>,
    pub out_model_context: Option<ModelContext>,
    /// Drop properties whose since/until range excludes `info.version`
    pub version_exclusion: bool,
    /// Qualified name of the method being documented
    pub method: Option<String>,
    /// Status code of the response being populated
    pub response_status: Option<u16>,
    parameters: BTreeMap<String, Value>,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(swagger: &'a Swagger, document: Document) -> Self {
        Self {
            swagger,
            root: Rc::new(RefCell::new(document)),
            direction: None,
            model_context: None,
            in_model_context: None,
            out_model_context: None,
            version_exclusion: false,
            method: None,
            response_status: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn swagger(&self) -> &'a Swagger {
        self.swagger
    }

    /// Copy of this context sharing the same root document
    pub fn sub_context(&self) -> Self {
        self.clone()
    }

    /// Borrow the root document. The borrow must end before any nested extraction.
    pub fn root(&self) -> Ref<'_, Document> {
        self.root.borrow()
    }

    pub fn root_mut(&self) -> RefMut<'_, Document> {
        self.root.borrow_mut()
    }

    pub fn replace_root(&self, document: Document) -> Document {
        self.root.replace(document)
    }

    /// Take the document out, cloning it when sub-contexts still share it
    pub fn into_document(self) -> Document {
        match Rc::try_unwrap(self.root) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().clone(),
        }
    }

    /// Model context of the current direction, falling back to the general one
    pub fn effective_model_context(&self) -> Option<&ModelContext> {
        let directed = match self.direction {
            Some(Direction::In) => self.in_model_context.as_ref(),
            Some(Direction::Out) => self.out_model_context.as_ref(),
            None => None,
        };
        directed.or(self.model_context.as_ref())
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameters.insert(name.into(), value.into());
    }
}

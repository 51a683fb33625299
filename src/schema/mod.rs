//! Typed Swagger 2.0 document model.
//!
//! Every object serializes with the OpenAPI field casing, omits absent fields and
//! carries its `x-*` vendor extensions. Maps keep insertion order so a document read
//! from JSON is written back in the same order.

pub mod any;
pub mod parameter;
pub mod validation;
pub mod vendor;

pub use any::Any;
pub use parameter::{BodyParameter, GeneralParameter, Parameter, ParameterLocation, ParameterOrRef};
pub use validation::Violation;
pub use vendor::VendorExtensions;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Value of the `swagger` field of every document this crate produces.
pub const SWAGGER_VERSION: &str = "2.0";

/// Prefix of every local reference to a definition.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

fn default_swagger_version() -> String {
    SWAGGER_VERSION.to_string()
}

/// Root Swagger document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Specification version, always `2.0`
    #[serde(default = "default_swagger_version")]
    pub swagger: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
    /// Path template -> operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<IndexMap<String, PathItem>>,
    /// Named schemas, referenced through `#/definitions/<name>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<IndexMap<String, Response>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_definitions: Option<IndexMap<String, SecurityScheme>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            swagger: default_swagger_version(),
            info: None,
            host: None,
            base_path: None,
            schemes: None,
            consumes: None,
            produces: None,
            paths: None,
            definitions: None,
            parameters: None,
            responses: None,
            security_definitions: None,
            security: None,
            tags: None,
            external_docs: None,
            vendor: VendorExtensions::default(),
        }
    }
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with the given info section and an empty path list
    pub fn with_info(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: Some(Info::new(title, version)),
            paths: Some(IndexMap::new()),
            ..Self::default()
        }
    }

    /// Reference string pointing at the named definition
    pub fn definition_reference(name: &str) -> String {
        format!("{}{}", DEFINITIONS_PREFIX, name)
    }

    /// Definition name targeted by a reference, if it is a local definition reference
    pub fn referenced_definition(reference: &str) -> Option<&str> {
        reference.strip_prefix(DEFINITIONS_PREFIX)
    }

    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions
            .as_ref()
            .map_or(false, |definitions| definitions.contains_key(name))
    }

    pub fn definition(&self, name: &str) -> Option<&Schema> {
        self.definitions.as_ref()?.get(name)
    }

    /// Add or replace a definition. Replacing keeps the original position.
    pub fn add_definition(&mut self, name: impl Into<String>, schema: Schema) {
        self.definitions
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
    }

    /// Path item for the template, created when missing
    pub fn path_item_mut(&mut self, path: &str) -> &mut PathItem {
        self.paths
            .get_or_insert_with(IndexMap::new)
            .entry(path.to_string())
            .or_default()
    }

    /// The API version declared in `info.version`, when non-blank
    pub fn api_version(&self) -> Option<&str> {
        self.info
            .as_ref()
            .map(|info| info.version.as_str())
            .filter(|version| !version.trim().is_empty())
    }
}

/// Info object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Xml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<bool>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

/// Security scheme object (`securityDefinitions` entries)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type", default)]
    pub scheme_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<IndexMap<String, String>>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

/// HTTP method of an operation inside a path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    /// All methods, in the order path items serialize them
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// PathItem object - all operations available on a single path
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// Parameters shared by every operation of the path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterOrRef>>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

impl PathItem {
    fn slot(&self, method: HttpMethod) -> &Option<Operation> {
        match method {
            HttpMethod::Get => &self.get,
            HttpMethod::Put => &self.put,
            HttpMethod::Post => &self.post,
            HttpMethod::Delete => &self.delete,
            HttpMethod::Options => &self.options,
            HttpMethod::Head => &self.head,
            HttpMethod::Patch => &self.patch,
        }
    }

    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
        }
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.slot(method).as_ref()
    }

    pub fn operation_mut(&mut self, method: HttpMethod) -> Option<&mut Operation> {
        self.slot_mut(method).as_mut()
    }

    /// Set the operation for a method, returning the one it replaced
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) -> Option<Operation> {
        self.slot_mut(method).replace(operation)
    }

    /// Defined operations in serialization order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |method| self.operation(method).map(|operation| (method, operation)))
    }

    pub fn operations_mut(&mut self) -> impl Iterator<Item = &mut Operation> {
        [
            &mut self.get,
            &mut self.put,
            &mut self.post,
            &mut self.delete,
            &mut self.options,
            &mut self.head,
            &mut self.patch,
        ]
        .into_iter()
        .filter_map(Option::as_mut)
    }
}

/// Operation object - a single API operation on a path
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Tags in insertion order, duplicates allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterOrRef>>,
    /// Status code (or `default`) -> response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<IndexMap<String, Response>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
    }

    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters
            .get_or_insert_with(Vec::new)
            .push(ParameterOrRef::Parameter(parameter));
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .as_ref()?
            .iter()
            .filter_map(ParameterOrRef::as_parameter)
            .find(|p| p.name() == name)
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters
            .as_mut()?
            .iter_mut()
            .filter_map(ParameterOrRef::as_parameter_mut)
            .find(|p| p.name() == name)
    }

    /// The body parameter, if the operation declares one
    pub fn body_parameter_mut(&mut self) -> Option<&mut BodyParameter> {
        self.parameters
            .as_mut()?
            .iter_mut()
            .filter_map(ParameterOrRef::as_parameter_mut)
            .find_map(|parameter| match parameter {
                Parameter::Body(body) => Some(body),
                _ => None,
            })
    }

    pub fn response(&self, status: &str) -> Option<&Response> {
        self.responses.as_ref()?.get(status)
    }

    /// Set the response for a status code, replacing any previous one
    pub fn set_response(&mut self, status: impl Into<String>, response: Response) {
        self.responses
            .get_or_insert_with(IndexMap::new)
            .insert(status.into(), response);
    }

    pub fn has_responses(&self) -> bool {
        self.responses
            .as_ref()
            .map_or(false, |responses| !responses.is_empty())
    }
}

/// Response object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Reference to a response declared under the document's `responses`
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, Header>>,
    /// Mime type -> example payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, Any>>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

impl Response {
    pub fn new(description: Option<String>) -> Self {
        Self {
            description,
            ..Default::default()
        }
    }
}

/// Header object of a response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Any>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Any>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

/// `additionalProperties` is either a flag or a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// Schema object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Forwarding reference, the node carries nothing else when set
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Any>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    /// Required property names, without duplicates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Any>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    /// Properties in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Any>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema with only `type` set
    pub fn typed(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Default::default()
        }
    }

    pub fn object() -> Self {
        Self::typed("object")
    }

    pub fn with_ref(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }

    pub fn is_type(&self, schema_type: &str) -> bool {
        self.schema_type.as_deref() == Some(schema_type)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties
            .as_ref()
            .map_or(false, |properties| properties.contains_key(name))
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.as_ref()?.get(name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Schema> {
        self.properties.as_mut()?.get_mut(name)
    }

    /// Property schema for the name, created empty when missing
    pub fn property_entry(&mut self, name: &str) -> &mut Schema {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .entry(name.to_string())
            .or_default()
    }

    pub fn set_property(&mut self, name: impl Into<String>, schema: Schema) {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
    }

    /// Add a required property name unless it is already listed
    pub fn add_required(&mut self, name: &str) {
        let required = self.required.get_or_insert_with(Vec::new);
        if !required.iter().any(|existing| existing == name) {
            required.push(name.to_string());
        }
    }

    pub fn push_enum(&mut self, value: impl Into<Any>) {
        self.enum_values
            .get_or_insert_with(Vec::new)
            .push(value.into());
    }
}

/// Nodes that may hold `$ref` strings, directly or in nested schemas.
///
/// Schema, parameter and response references are visited; path item references are not.
pub trait References {
    fn for_each_ref(&self, visit: &mut dyn FnMut(&str));

    fn for_each_ref_mut(&mut self, visit: &mut dyn FnMut(&mut String));
}

impl References for Schema {
    fn for_each_ref(&self, visit: &mut dyn FnMut(&str)) {
        if let Some(reference) = &self.reference {
            visit(reference);
        }
        if let Some(items) = &self.items {
            items.for_each_ref(visit);
        }
        for schema in self.all_of.iter().flatten() {
            schema.for_each_ref(visit);
        }
        for schema in self.properties.iter().flat_map(|p| p.values()) {
            schema.for_each_ref(visit);
        }
        if let Some(AdditionalProperties::Schema(schema)) = &self.additional_properties {
            schema.for_each_ref(visit);
        }
    }

    fn for_each_ref_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        if let Some(reference) = &mut self.reference {
            visit(reference);
        }
        if let Some(items) = &mut self.items {
            items.for_each_ref_mut(visit);
        }
        for schema in self.all_of.iter_mut().flatten() {
            schema.for_each_ref_mut(visit);
        }
        for schema in self.properties.iter_mut().flat_map(|p| p.values_mut()) {
            schema.for_each_ref_mut(visit);
        }
        if let Some(AdditionalProperties::Schema(schema)) = &mut self.additional_properties {
            schema.for_each_ref_mut(visit);
        }
    }
}

impl References for Parameter {
    fn for_each_ref(&self, visit: &mut dyn FnMut(&str)) {
        match self {
            Parameter::Body(body) => {
                if let Some(schema) = &body.schema {
                    schema.for_each_ref(visit);
                }
            }
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                if let Some(items) = &p.items {
                    items.for_each_ref(visit);
                }
            }
        }
    }

    fn for_each_ref_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        match self {
            Parameter::Body(body) => {
                if let Some(schema) = &mut body.schema {
                    schema.for_each_ref_mut(visit);
                }
            }
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                if let Some(items) = &mut p.items {
                    items.for_each_ref_mut(visit);
                }
            }
        }
    }
}

impl References for ParameterOrRef {
    fn for_each_ref(&self, visit: &mut dyn FnMut(&str)) {
        match self {
            ParameterOrRef::Reference { reference } => visit(reference),
            ParameterOrRef::Parameter(parameter) => parameter.for_each_ref(visit),
        }
    }

    fn for_each_ref_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        match self {
            ParameterOrRef::Reference { reference } => visit(reference),
            ParameterOrRef::Parameter(parameter) => parameter.for_each_ref_mut(visit),
        }
    }
}

impl References for Response {
    fn for_each_ref(&self, visit: &mut dyn FnMut(&str)) {
        if let Some(reference) = &self.reference {
            visit(reference);
        }
        if let Some(schema) = &self.schema {
            schema.for_each_ref(visit);
        }
        for header in self.headers.iter().flat_map(|h| h.values()) {
            if let Some(items) = &header.items {
                items.for_each_ref(visit);
            }
        }
    }

    fn for_each_ref_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        if let Some(reference) = &mut self.reference {
            visit(reference);
        }
        if let Some(schema) = &mut self.schema {
            schema.for_each_ref_mut(visit);
        }
        for header in self.headers.iter_mut().flat_map(|h| h.values_mut()) {
            if let Some(items) = &mut header.items {
                items.for_each_ref_mut(visit);
            }
        }
    }
}

impl References for Operation {
    fn for_each_ref(&self, visit: &mut dyn FnMut(&str)) {
        for parameter in self.parameters.iter().flatten() {
            parameter.for_each_ref(visit);
        }
        for response in self.responses.iter().flat_map(|r| r.values()) {
            response.for_each_ref(visit);
        }
    }

    fn for_each_ref_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        for parameter in self.parameters.iter_mut().flatten() {
            parameter.for_each_ref_mut(visit);
        }
        for response in self.responses.iter_mut().flat_map(|r| r.values_mut()) {
            response.for_each_ref_mut(visit);
        }
    }
}

impl References for PathItem {
    fn for_each_ref(&self, visit: &mut dyn FnMut(&str)) {
        for (_, operation) in self.operations() {
            operation.for_each_ref(visit);
        }
        for parameter in self.parameters.iter().flatten() {
            parameter.for_each_ref(visit);
        }
    }

    fn for_each_ref_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        for operation in self.operations_mut() {
            operation.for_each_ref_mut(visit);
        }
        for parameter in self.parameters.iter_mut().flatten() {
            parameter.for_each_ref_mut(visit);
        }
    }
}

impl References for Document {
    fn for_each_ref(&self, visit: &mut dyn FnMut(&str)) {
        for item in self.paths.iter().flat_map(|p| p.values()) {
            item.for_each_ref(visit);
        }
        for schema in self.definitions.iter().flat_map(|d| d.values()) {
            schema.for_each_ref(visit);
        }
        for parameter in self.parameters.iter().flat_map(|p| p.values()) {
            parameter.for_each_ref(visit);
        }
        for response in self.responses.iter().flat_map(|r| r.values()) {
            response.for_each_ref(visit);
        }
    }

    fn for_each_ref_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        for item in self.paths.iter_mut().flat_map(|p| p.values_mut()) {
            item.for_each_ref_mut(visit);
        }
        for schema in self.definitions.iter_mut().flat_map(|d| d.values_mut()) {
            schema.for_each_ref_mut(visit);
        }
        for parameter in self.parameters.iter_mut().flat_map(|p| p.values_mut()) {
            parameter.for_each_ref_mut(visit);
        }
        for response in self.responses.iter_mut().flat_map(|r| r.values_mut()) {
            response.for_each_ref_mut(visit);
        }
    }
}

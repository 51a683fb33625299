use crate::schema::{Any, Schema, VendorExtensions};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Swagger Parameter object, discriminated by its `in` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "in", rename_all = "camelCase")]
pub enum Parameter {
    Path(GeneralParameter),
    Query(GeneralParameter),
    Header(GeneralParameter),
    FormData(GeneralParameter),
    Body(BodyParameter),
}

/// Entry of a parameter list: an inline parameter or a reference to one declared
/// under the document's `parameters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Parameter(Parameter),
}

impl ParameterOrRef {
    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            ParameterOrRef::Parameter(parameter) => Some(parameter),
            ParameterOrRef::Reference { .. } => None,
        }
    }

    pub fn as_parameter_mut(&mut self) -> Option<&mut Parameter> {
        match self {
            ParameterOrRef::Parameter(parameter) => Some(parameter),
            ParameterOrRef::Reference { .. } => None,
        }
    }
}

impl From<Parameter> for ParameterOrRef {
    fn from(parameter: Parameter) -> Self {
        ParameterOrRef::Parameter(parameter)
    }
}

/// Parameter location, mirrors the `in` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    FormData,
    Body,
}

impl ParameterLocation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "formData" | "form_data" | "form" => Some(ParameterLocation::FormData),
            "body" => Some(ParameterLocation::Body),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Body => "body",
        }
    }
}

/// Fields shared by path, query, header and formData parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralParameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_empty_value: Option<bool>,
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

/// The payload parameter; its shape is described by a schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyParameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub vendor: VendorExtensions,
}

impl GeneralParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl BodyParameter {
    pub fn new() -> Self {
        Self {
            name: "body".to_string(),
            ..Default::default()
        }
    }
}

impl Parameter {
    /// Creates an empty parameter at the given location.
    ///
    /// Path parameters are always required, body parameters default to the name `body`.
    pub fn new(location: ParameterLocation, name: impl Into<String>) -> Self {
        let name = name.into();
        match location {
            ParameterLocation::Path => Parameter::Path(GeneralParameter {
                required: Some(true),
                ..GeneralParameter::new(name)
            }),
            ParameterLocation::Query => Parameter::Query(GeneralParameter::new(name)),
            ParameterLocation::Header => Parameter::Header(GeneralParameter::new(name)),
            ParameterLocation::FormData => Parameter::FormData(GeneralParameter::new(name)),
            ParameterLocation::Body => Parameter::Body(BodyParameter {
                name,
                ..BodyParameter::new()
            }),
        }
    }

    pub fn location(&self) -> ParameterLocation {
        match self {
            Parameter::Path(_) => ParameterLocation::Path,
            Parameter::Query(_) => ParameterLocation::Query,
            Parameter::Header(_) => ParameterLocation::Header,
            Parameter::FormData(_) => ParameterLocation::FormData,
            Parameter::Body(_) => ParameterLocation::Body,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Parameter::Body(body) => &body.name,
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                &p.name
            }
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Parameter::Body(body) => body.description.as_deref(),
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                p.description.as_deref()
            }
        }
    }

    pub fn set_description(&mut self, description: Option<String>) {
        match self {
            Parameter::Body(body) => body.description = description,
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                p.description = description
            }
        }
    }

    pub fn required(&self) -> Option<bool> {
        match self {
            Parameter::Body(body) => body.required,
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                p.required
            }
        }
    }

    pub fn set_required(&mut self, required: Option<bool>) {
        match self {
            Parameter::Body(body) => body.required = required,
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                p.required = required
            }
        }
    }

    /// The non-body fields, `None` for the body parameter.
    pub fn as_general_mut(&mut self) -> Option<&mut GeneralParameter> {
        match self {
            Parameter::Body(_) => None,
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                Some(p)
            }
        }
    }

    pub fn as_general(&self) -> Option<&GeneralParameter> {
        match self {
            Parameter::Body(_) => None,
            Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
                Some(p)
            }
        }
    }

    pub fn is_body(&self) -> bool {
        matches!(self, Parameter::Body(_))
    }
}

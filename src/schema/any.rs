use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An open-ended value (`default`, `example`, `enum` members, vendor extensions).
///
/// Serializes as exactly the wrapped JSON value and captures whatever raw value
/// was present when deserializing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Any(pub Value);

impl Any {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Any {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Any {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<String> for Any {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

//! Wire names of properties.

use crate::introspection::PropertyDescriptor;
use heck::{ToLowerCamelCase, ToSnakeCase};

/// Computes the name a property is exposed under
pub trait PropertyNamingStrategy {
    fn translate_name(&self, name: &str, serialized_name: Option<&str>) -> String;

    fn translate(&self, property: &PropertyDescriptor) -> String {
        self.translate_name(&property.name, property.serialized_name.as_deref())
    }
}

/// Explicit serialized name when present, snake_case of the identifier otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializedNameStrategy;

impl PropertyNamingStrategy for SerializedNameStrategy {
    fn translate_name(&self, name: &str, serialized_name: Option<&str>) -> String {
        match serialized_name {
            Some(serialized) => serialized.to_string(),
            None => name.to_snake_case(),
        }
    }
}

/// lowerCamelCase of the identifier, ignoring explicit names
#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCaseNamingStrategy;

impl PropertyNamingStrategy for CamelCaseNamingStrategy {
    fn translate_name(&self, name: &str, _serialized_name: Option<&str>) -> String {
        name.to_lower_camel_case()
    }
}

/// The identifier as declared
#[derive(Debug, Clone, Copy, Default)]
pub struct IdenticalNamingStrategy;

impl PropertyNamingStrategy for IdenticalNamingStrategy {
    fn translate_name(&self, name: &str, _serialized_name: Option<&str>) -> String {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::TypeDescriptor;

    #[test]
    fn test_serialized_name_wins() {
        let property = PropertyDescriptor::new("createdAt", TypeDescriptor::named("DateTime"));
        assert_eq!(SerializedNameStrategy.translate(&property), "created_at");

        let renamed = property.with_serialized_name("creation");
        assert_eq!(SerializedNameStrategy.translate(&renamed), "creation");
    }

    #[test]
    fn test_camel_case_and_identity() {
        assert_eq!(CamelCaseNamingStrategy.translate_name("first_name", None), "firstName");
        assert_eq!(IdenticalNamingStrategy.translate_name("first_name", Some("x")), "first_name");
    }
}

//! Structural validation of a document.

use crate::schema::{
    Document, Operation, Parameter, References, Response, Schema, SWAGGER_VERSION,
};
use std::fmt;

/// A single broken constraint, located by a dotted path inside the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl Document {
    /// Collect every structural violation of the document
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.swagger != SWAGGER_VERSION {
            violations.push(Violation::new(
                "swagger",
                format!("must be \"{}\", found \"{}\"", SWAGGER_VERSION, self.swagger),
            ));
        }

        match &self.info {
            None => violations.push(Violation::new("info", "is required")),
            Some(info) => {
                if info.title.trim().is_empty() {
                    violations.push(Violation::new("info.title", "must not be blank"));
                }
                if info.version.trim().is_empty() {
                    violations.push(Violation::new("info.version", "must not be blank"));
                }
            }
        }

        for (path, item) in self.paths.iter().flatten() {
            let location = format!("paths.{}", path);
            if !path.starts_with('/') {
                violations.push(Violation::new(&location, "path must start with '/'"));
            }
            for (index, parameter) in item.parameters.iter().flatten().enumerate() {
                let Some(parameter) = parameter.as_parameter() else {
                    continue;
                };
                check_parameter(
                    parameter,
                    &format!("{}.parameters[{}]", location, index),
                    &mut violations,
                );
            }
            for (method, operation) in item.operations() {
                check_operation(
                    operation,
                    &format!("{}.{}", location, method.as_str()),
                    &mut violations,
                );
            }
        }

        for (name, schema) in self.definitions.iter().flatten() {
            check_schema(schema, &format!("definitions.{}", name), &mut violations);
        }
        for (name, parameter) in self.parameters.iter().flatten() {
            check_parameter(parameter, &format!("parameters.{}", name), &mut violations);
        }
        for (status, response) in self.responses.iter().flatten() {
            check_response(response, &format!("responses.{}", status), &mut violations);
        }

        let mut dangling = Vec::new();
        self.for_each_ref(&mut |reference| {
            if let Some(name) = Document::referenced_definition(reference) {
                if !self.has_definition(name) && !dangling.iter().any(|d: &String| d == reference) {
                    dangling.push(reference.to_string());
                }
            }
        });
        for reference in dangling {
            violations.push(Violation::new(
                "$ref",
                format!("reference {} does not resolve to a definition", reference),
            ));
        }

        violations
    }
}

fn check_operation(operation: &Operation, location: &str, violations: &mut Vec<Violation>) {
    if !operation.has_responses() {
        violations.push(Violation::new(
            format!("{}.responses", location),
            "operation must declare at least one response",
        ));
    }
    for (index, parameter) in operation.parameters.iter().flatten().enumerate() {
        let Some(parameter) = parameter.as_parameter() else {
            continue;
        };
        check_parameter(
            parameter,
            &format!("{}.parameters[{}]", location, index),
            violations,
        );
    }
    for (status, response) in operation.responses.iter().flatten() {
        check_response(
            response,
            &format!("{}.responses.{}", location, status),
            violations,
        );
    }
}

fn check_parameter(parameter: &Parameter, location: &str, violations: &mut Vec<Violation>) {
    if parameter.name().trim().is_empty() {
        violations.push(Violation::new(
            format!("{}.name", location),
            "must not be blank",
        ));
    }
    match parameter {
        Parameter::Body(body) => match &body.schema {
            None => violations.push(Violation::new(
                format!("{}.schema", location),
                "body parameter requires a schema",
            )),
            Some(schema) => check_schema(schema, &format!("{}.schema", location), violations),
        },
        Parameter::Path(p) | Parameter::Query(p) | Parameter::Header(p) | Parameter::FormData(p) => {
            if matches!(parameter, Parameter::Path(_)) && p.required != Some(true) {
                violations.push(Violation::new(
                    format!("{}.required", location),
                    "path parameter must be required",
                ));
            }
            match p.schema_type.as_deref() {
                None => violations.push(Violation::new(
                    format!("{}.type", location),
                    "non-body parameter requires a type",
                )),
                Some("array") if p.items.is_none() => violations.push(Violation::new(
                    format!("{}.items", location),
                    "array parameter requires items",
                )),
                _ => {}
            }
        }
    }
}

fn check_response(response: &Response, location: &str, violations: &mut Vec<Violation>) {
    if let Some(schema) = &response.schema {
        check_schema(schema, &format!("{}.schema", location), violations);
    }
}

fn check_schema(schema: &Schema, location: &str, violations: &mut Vec<Violation>) {
    if schema.is_type("array") && schema.items.is_none() {
        violations.push(Violation::new(
            format!("{}.items", location),
            "array schema requires items",
        ));
    }
    if let Some(items) = &schema.items {
        check_schema(items, &format!("{}.items", location), violations);
    }
    for (index, part) in schema.all_of.iter().flatten().enumerate() {
        check_schema(part, &format!("{}.allOf[{}]", location, index), violations);
    }
    for (name, property) in schema.properties.iter().flatten() {
        check_schema(property, &format!("{}.properties.{}", location, name), violations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_document_has_no_violations() {
        let document = document(json!({
            "swagger": "2.0",
            "info": {"title": "API", "version": "1.0"},
            "paths": {"/users/{id}": {"get": {
                "parameters": [{"in": "path", "name": "id", "required": true, "type": "string"}],
                "responses": {"200": {"schema": {"$ref": "#/definitions/User"}}}
            }}},
            "definitions": {"User": {"type": "object"}}
        }));

        assert!(document.violations().is_empty());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let document = document(json!({
            "swagger": "2.0",
            "info": {"title": " ", "version": "1.0"},
            "paths": {"users": {"post": {
                "parameters": [
                    {"in": "path", "name": "id", "type": "string"},
                    {"in": "body", "name": "body"},
                    {"in": "query", "name": "q"}
                ],
                "responses": {}
            }}},
            "definitions": {"List": {"type": "array"}, "Box": {"$ref": "#/definitions/Missing"}}
        }));

        let paths: Vec<String> = document
            .violations()
            .into_iter()
            .map(|violation| violation.path)
            .collect();

        assert_eq!(
            paths,
            vec![
                "info.title",
                "paths.users",
                "paths.users.post.responses",
                "paths.users.post.parameters[0].required",
                "paths.users.post.parameters[1].schema",
                "paths.users.post.parameters[2].type",
                "definitions.List.items",
                "$ref",
            ]
        );
    }

    #[test]
    fn test_missing_info_is_reported() {
        let violations = document(json!({"swagger": "2.0"})).violations();
        assert_eq!(violations, vec![Violation::new("info", "is required")]);
    }
}

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use swagger_from_source::error::Error;
use swagger_from_source::extraction::Source;
use swagger_from_source::schema::{Document, Info};
use swagger_from_source::swagger::Swagger;

const PETSTORE: &str = include_str!("fixtures/petstore.json");

fn petstore(swagger: &Swagger) -> Document {
    swagger
        .extract_document(&Source::Raw(PETSTORE))
        .expect("Failed to load petstore document")
}

#[test]
fn test_base_document_survives_a_dump() {
    let swagger = Swagger::new();
    let document = petstore(&swagger);

    let dumped: Value = serde_json::from_str(&swagger.dump(&document, true).unwrap()).unwrap();
    let original: Value = serde_json::from_str(PETSTORE).unwrap();
    assert_eq!(dumped, original);
}

#[test]
fn test_clean_on_dump_merges_and_prunes() {
    let mut swagger = Swagger::new();
    swagger.set_clean_on_dump(true);
    let document = petstore(&swagger);

    let dumped: Value = serde_json::from_str(&swagger.dump(&document, true).unwrap()).unwrap();

    let definitions: Vec<&String> = dumped["definitions"].as_object().unwrap().keys().collect();
    assert_eq!(definitions, vec!["Pet", "Error"]);
    assert_eq!(
        dumped["paths"]["/pets"]["get"]["responses"]["200"]["schema"]["items"],
        json!({"$ref": "#/definitions/Pet"})
    );
    assert_eq!(
        dumped["paths"]["/pets/{id}"]["get"]["responses"]["200"]["schema"],
        json!({"$ref": "#/definitions/Pet"})
    );

    // The document handed to dump is not modified
    assert!(document.has_definition("Unused"));
}

#[test]
fn test_yaml_dump() {
    let swagger = Swagger::new();
    let document = petstore(&swagger);

    let yaml = swagger.dump_yaml(&document, true).unwrap();
    let reparsed: Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(reparsed["basePath"], "/v1");
    assert_eq!(reparsed["x-generator"], "handwritten");
}

#[test]
fn test_non_swagger_input_leaves_an_empty_document() {
    let swagger = Swagger::new();
    let document = swagger
        .extract_document(&Source::Raw(r#"{"openapi": "3.0.0"}"#))
        .unwrap();
    assert_eq!(document, Document::new());
}

#[test]
fn test_validation_reports_every_violation() {
    let swagger = Swagger::new();
    let mut document = petstore(&swagger);
    document.info = Some(Info::new("", "1.0.0"));
    if let Some(definitions) = document.definitions.as_mut() {
        definitions.shift_remove("Error");
    }

    let err = swagger.dump(&document, true).unwrap_err();
    let Error::Validation(violations) = err else {
        panic!("expected a validation error, got {}", err);
    };
    let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, vec!["info.title", "$ref"]);

    // Skipping validation still produces output
    assert!(swagger.dump(&document, false).is_ok());
}

fn round_trip(raw: &Value) -> Value {
    let swagger = Swagger::new();
    let document = swagger
        .extract_document(&Source::Raw(&raw.to_string()))
        .expect("Failed to load document");
    serde_json::from_str(&swagger.dump(&document, true).unwrap()).unwrap()
}

#[test]
fn test_parameter_references_survive_a_dump() {
    let raw = json!({
        "swagger": "2.0",
        "info": {"title": "Pets", "version": "1.0"},
        "paths": {
            "/pets": {
                "parameters": [{"$ref": "#/parameters/trace"}],
                "get": {
                    "parameters": [
                        {"$ref": "#/parameters/page"},
                        {"in": "query", "name": "q", "type": "string"}
                    ],
                    "responses": {"200": {"description": "OK"}}
                }
            }
        },
        "parameters": {
            "page": {"in": "query", "name": "page", "type": "integer"},
            "trace": {"in": "header", "name": "X-Trace", "type": "string"}
        }
    });

    assert_eq!(round_trip(&raw), raw);
}

#[test]
fn test_response_references_survive_a_dump() {
    let raw = json!({
        "swagger": "2.0",
        "info": {"title": "Pets", "version": "1.0"},
        "paths": {
            "/pets/{id}": {
                "get": {
                    "parameters": [{"in": "path", "name": "id", "required": true, "type": "string"}],
                    "responses": {
                        "200": {"description": "OK"},
                        "404": {"$ref": "#/responses/NotFound"}
                    }
                }
            }
        },
        "responses": {"NotFound": {"description": "No such pet"}}
    });

    assert_eq!(round_trip(&raw), raw);
}

#[test]
fn test_header_constraints_survive_a_dump() {
    let raw = json!({
        "swagger": "2.0",
        "info": {"title": "Pets", "version": "1.0"},
        "paths": {
            "/pets": {
                "get": {
                    "responses": {
                        "200": {
                            "description": "OK",
                            "headers": {
                                "X-Rate-Limit": {"type": "integer", "format": "int32", "minimum": 1, "maximum": 10, "multipleOf": 1},
                                "X-Request-Id": {"type": "string", "minLength": 8, "maxLength": 36, "pattern": "^[a-f0-9-]+$"},
                                "X-Warnings": {"type": "array", "items": {"type": "string"}, "minItems": 0, "maxItems": 5, "uniqueItems": true}
                            }
                        }
                    }
                }
            }
        }
    });

    assert_eq!(round_trip(&raw), raw);
}

//! Post-processing of a completed document.
//!
//! Extracting the same class under different serializer or validation groups yields
//! definitions named `Name?<hash>`. Many of those projections end up identical. The
//! cleaner merges identical definitions of the same base name, drops definitions
//! nothing refers to and renames what is left to `Name`, `Name?1`, `Name?2`, ...

use crate::schema::{Document, References, Schema};
use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;

/// Separator between a definition's base name and its disambiguating suffix
pub const SUFFIX_SEPARATOR: char = '?';

/// Definition name without its disambiguating suffix
pub fn base_name(name: &str) -> &str {
    match name.find(SUFFIX_SEPARATOR) {
        Some(index) => &name[..index],
        None => name,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCleaner;

impl SchemaCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Return a cleaned copy of the document. The input is left untouched.
    pub fn clean(&self, document: &Document) -> Document {
        let mut document = document.clone();

        loop {
            let replacements = find_duplicates(&document);
            if replacements.is_empty() {
                break;
            }
            debug!("Merging {} duplicated definitions", replacements.len());
            rewrite_references(&mut document, &replacements);
            if let Some(definitions) = document.definitions.as_mut() {
                definitions.retain(|name, _| !replacements.contains_key(name));
            }
        }

        loop {
            let orphans = find_orphans(&document);
            if orphans.is_empty() {
                break;
            }
            debug!("Removing orphan definitions: {:?}", orphans);
            if let Some(definitions) = document.definitions.as_mut() {
                definitions.retain(|name, _| !orphans.contains(name));
            }
        }

        let renames = compute_renames(&document);
        if !renames.is_empty() {
            debug!("Renaming {} definitions", renames.len());
            rewrite_references(&mut document, &renames);
            if let Some(definitions) = document.definitions.take() {
                let renamed: IndexMap<String, Schema> = definitions
                    .into_iter()
                    .map(|(name, schema)| match renames.get(&name) {
                        Some(new_name) => (new_name.clone(), schema),
                        None => (name, schema),
                    })
                    .collect();
                document.definitions = Some(renamed);
            }
        }

        document
    }
}

/// Later definitions structurally equal to an earlier one of the same base name,
/// mapped to the name of that earlier definition
fn find_duplicates(document: &Document) -> HashMap<String, String> {
    let mut replacements = HashMap::new();
    let mut kept: IndexMap<&str, Vec<(&String, &Schema)>> = IndexMap::new();

    for (name, schema) in document.definitions.iter().flatten() {
        let group = kept.entry(base_name(name)).or_default();
        match group.iter().find(|(_, selected)| *selected == schema) {
            Some((selected_name, _)) => {
                replacements.insert(name.clone(), (*selected_name).clone());
            }
            None => group.push((name, schema)),
        }
    }

    replacements
}

/// Definitions no `$ref` anywhere in the document points at
fn find_orphans(document: &Document) -> Vec<String> {
    let mut referenced: HashMap<String, usize> = HashMap::new();
    document.for_each_ref(&mut |reference| {
        if let Some(name) = Document::referenced_definition(reference) {
            *referenced.entry(name.to_string()).or_default() += 1;
        }
    });

    document
        .definitions
        .iter()
        .flatten()
        .map(|(name, _)| name)
        .filter(|name| !referenced.contains_key(name.as_str()))
        .cloned()
        .collect()
}

/// Dense renaming per base name, in definition order
fn compute_renames(document: &Document) -> HashMap<String, String> {
    let mut counters: HashMap<&str, usize> = HashMap::new();
    let mut renames = HashMap::new();

    for (name, _) in document.definitions.iter().flatten() {
        let base = base_name(name);
        let index = counters.entry(base).or_default();
        let target = if *index == 0 {
            base.to_string()
        } else {
            format!("{}{}{}", base, SUFFIX_SEPARATOR, index)
        };
        *index += 1;
        if &target != name {
            renames.insert(name.clone(), target);
        }
    }

    renames
}

/// Point every reference to a renamed definition at its new name, in a single pass
fn rewrite_references(document: &mut Document, renames: &HashMap<String, String>) {
    document.for_each_ref_mut(&mut |reference| {
        let replacement = Document::referenced_definition(reference)
            .and_then(|name| renames.get(name))
            .map(|new_name| Document::definition_reference(new_name));
        if let Some(replacement) = replacement {
            *reference = replacement;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn clean(input: Value) -> Value {
        let document: Document = serde_json::from_value(input).unwrap();
        serde_json::to_value(SchemaCleaner::new().clean(&document)).unwrap()
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("User?1a2b3c4d"), "User");
        assert_eq!(base_name("User"), "User");
    }

    #[test]
    fn test_identical_projections_are_merged_and_renamed() {
        let cleaned = clean(json!({
            "swagger": "2.0",
            "paths": {"/users": {"get": {"responses": {
                "200": {"schema": {"$ref": "#/definitions/User?aaaa"}},
                "201": {"schema": {"$ref": "#/definitions/User?bbbb"}}
            }}}},
            "definitions": {
                "User?aaaa": {"type": "object", "properties": {"id": {"type": "integer"}}},
                "User?bbbb": {"type": "object", "properties": {"id": {"type": "integer"}}}
            }
        }));

        assert_eq!(
            cleaned,
            json!({
                "swagger": "2.0",
                "paths": {"/users": {"get": {"responses": {
                    "200": {"schema": {"$ref": "#/definitions/User"}},
                    "201": {"schema": {"$ref": "#/definitions/User"}}
                }}}},
                "definitions": {
                    "User": {"type": "object", "properties": {"id": {"type": "integer"}}}
                }
            })
        );
    }

    #[test]
    fn test_merging_cascades_to_parents() {
        let cleaned = clean(json!({
            "swagger": "2.0",
            "paths": {"/a": {"get": {"responses": {
                "200": {"schema": {"$ref": "#/definitions/Order?1"}},
                "201": {"schema": {"$ref": "#/definitions/Order?2"}}
            }}}},
            "definitions": {
                "Order?1": {"type": "object", "properties": {"user": {"$ref": "#/definitions/User?1"}}},
                "Order?2": {"type": "object", "properties": {"user": {"$ref": "#/definitions/User?2"}}},
                "User?1": {"type": "object"},
                "User?2": {"type": "object"}
            }
        }));

        let definitions = cleaned["definitions"].as_object().unwrap();
        let mut names: Vec<&String> = definitions.keys().collect();
        names.sort();
        assert_eq!(names, vec!["Order", "User"]);
        assert_eq!(
            cleaned["definitions"]["Order"]["properties"]["user"]["$ref"],
            json!("#/definitions/User")
        );
    }

    #[test]
    fn test_orphans_are_removed_transitively() {
        let cleaned = clean(json!({
            "swagger": "2.0",
            "paths": {"/a": {"get": {"responses": {"200": {"schema": {"$ref": "#/definitions/Kept"}}}}}},
            "definitions": {
                "Kept": {"type": "object"},
                "Orphan": {"type": "object", "properties": {"child": {"$ref": "#/definitions/Child"}}},
                "Child": {"type": "string"}
            }
        }));

        assert_eq!(cleaned["definitions"], json!({"Kept": {"type": "object"}}));
    }

    #[test]
    fn test_self_reference_keeps_definition() {
        let cleaned = clean(json!({
            "swagger": "2.0",
            "definitions": {
                "Node": {"type": "object", "properties": {"next": {"$ref": "#/definitions/Node"}}}
            }
        }));

        assert!(cleaned["definitions"]["Node"].is_object());
    }

    #[test]
    fn test_different_projections_get_dense_names() {
        let cleaned = clean(json!({
            "swagger": "2.0",
            "paths": {"/a": {"get": {"responses": {
                "200": {"schema": {"$ref": "#/definitions/User?ffff"}},
                "201": {"schema": {"$ref": "#/definitions/User?eeee"}}
            }}}},
            "definitions": {
                "User?ffff": {"type": "object", "properties": {"id": {"type": "integer"}}},
                "User?eeee": {"type": "object", "properties": {"name": {"type": "string"}}}
            }
        }));

        let responses = &cleaned["paths"]["/a"]["get"]["responses"];
        assert_eq!(responses["200"]["schema"]["$ref"], json!("#/definitions/User"));
        assert_eq!(responses["201"]["schema"]["$ref"], json!("#/definitions/User?1"));
        assert!(cleaned["definitions"]["User?1"]["properties"]["name"].is_object());
    }

    #[test]
    fn test_rename_does_not_clobber_existing_names() {
        let cleaned = clean(json!({
            "swagger": "2.0",
            "paths": {"/a": {"get": {"responses": {
                "200": {"schema": {"$ref": "#/definitions/User?1"}},
                "201": {"schema": {"$ref": "#/definitions/User?9"}}
            }}}},
            "definitions": {
                "User?9": {"type": "object", "properties": {"b": {"type": "string"}}},
                "User?1": {"type": "object", "properties": {"a": {"type": "string"}}}
            }
        }));

        let responses = &cleaned["paths"]["/a"]["get"]["responses"];
        assert_eq!(responses["200"]["schema"]["$ref"], json!("#/definitions/User?1"));
        assert_eq!(responses["201"]["schema"]["$ref"], json!("#/definitions/User"));
        assert!(cleaned["definitions"]["User"]["properties"]["b"].is_object());
        assert!(cleaned["definitions"]["User?1"]["properties"]["a"].is_object());
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let document: Document = serde_json::from_value(json!({
            "swagger": "2.0",
            "paths": {"/a": {"get": {"responses": {"200": {"schema": {"$ref": "#/definitions/A?x"}}}}}},
            "definitions": {
                "A?x": {"type": "object", "properties": {"b": {"$ref": "#/definitions/B?y"}}},
                "B?y": {"type": "string"},
                "B?z": {"type": "string"}
            }
        }))
        .unwrap();

        let cleaner = SchemaCleaner::new();
        let once = cleaner.clean(&document);
        let twice = cleaner.clean(&once);
        assert_eq!(once, twice);
        assert_ne!(once, document);
    }
}

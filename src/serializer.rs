//! Serialization of Swagger documents to JSON or YAML and back.
//!
//! Field casing, omission of absent fields, transparent "any" values and vendor
//! extension flattening all come from the serde attributes of the [`crate::schema`]
//! model; this module only picks the format and handles files.

use crate::error::Result;
use crate::schema::Document;
use anyhow::Context;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Serializing Swagger document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes a document to JSON with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing Swagger document to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Reads a document from JSON text.
pub fn deserialize_json(content: &str) -> Result<Document> {
    debug!("Deserializing Swagger document from JSON");
    Ok(serde_json::from_str(content)?)
}

/// Reads a document from YAML text.
pub fn deserialize_yaml(content: &str) -> Result<Document> {
    debug!("Deserializing Swagger document from YAML");
    Ok(serde_yaml::from_str(content)?)
}

/// Writes string content to a file.
///
/// Creates the file and its parent directories if they don't exist, or overwrites it
/// if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> anyhow::Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

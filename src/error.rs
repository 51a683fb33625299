use crate::schema::validation::Violation;
use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    ParseError { file: PathBuf, message: String },
    /// An extractor was asked to extract a pair its `can_extract` rejects.
    ExtractionImpossible { extractor: &'static str },
    /// A constraint extractor was handed a constraint kind it does not handle.
    UnsupportedConstraint {
        extractor: &'static str,
        constraint: &'static str,
    },
    /// Inconsistent documentation or settings that must be fixed at the source.
    Configuration(String),
    /// The document broke its own structural constraints.
    Validation(Vec<Violation>),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::ParseError { file, message } => {
                write!(f, "Parse error in {}: {}", file.display(), message)
            }
            Error::ExtractionImpossible { extractor } => {
                write!(f, "Extraction impossible: [{}] does not support this source/target pair", extractor)
            }
            Error::UnsupportedConstraint {
                extractor,
                constraint,
            } => write!(
                f,
                "The constraint of type [{}] is not supported by [{}]",
                constraint, extractor
            ),
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(violations) => {
                write!(f, "Document validation failed with {} violation(s):", violations.len())?;
                for violation in violations {
                    write!(f, "\n  {}", violation)?;
                }
                Ok(())
            }
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML error: {}", err))
    }
}

impl From<syn::Error> for Error {
    fn from(err: syn::Error) -> Self {
        Error::ParseError {
            file: PathBuf::from("<unknown>"),
            message: err.to_string(),
        }
    }
}

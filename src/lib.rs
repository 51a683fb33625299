//! Swagger from source - Swagger 2.0 documentation extracted from Rust types and doc comments.
//!
//! The library reads the structs, enums and documented functions of a Rust project and
//! turns them into a Swagger 2.0 document. Types become definitions, `///` comments
//! with `@param`, `@return` and `@throws` tags become operations, and `serde`,
//! `validate` and `swagger` attributes refine both.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans project directories for Rust files
//! 2. [`parser`] - Parses Rust source files with `syn`
//! 3. [`introspection`] - Describes classes, properties, methods and their metadata
//! 4. [`extraction`] - The extractor contract and the built-in extractors
//! 5. [`swagger`] - The engine running extractors in order against a document
//! 6. [`builder`] - Assembles an engine with the built-in extractors
//! 7. [`cleaner`] - Merges duplicate definitions and drops unreferenced ones
//! 8. [`serializer`] - Serializes the document to JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_from_source::{
//!     builder::Builder,
//!     extraction::{Source, Target},
//!     introspection::source::SourceIntrospector,
//!     parser::AstParser,
//!     scanner::FileScanner,
//!     schema::{Document, Schema},
//! };
//! use std::path::PathBuf;
//! use std::rc::Rc;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./my-project")).scan().unwrap();
//! let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.rust_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let registry = Rc::new(SourceIntrospector::introspect(&parsed_files));
//! let swagger = Builder::from_registry(registry).build();
//!
//! let mut context = swagger.create_context(Document::with_info("Shop", "1.0"));
//! let mut schema = Schema::new();
//! swagger
//!     .extract(&Source::TypeName("Order"), &mut Target::Schema(&mut schema), &mut context)
//!     .unwrap();
//!
//! println!("{}", swagger.dump(&context.into_document(), true).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod builder;
pub mod cleaner;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod introspection;
pub mod parser;
pub mod scanner;
pub mod schema;
pub mod serializer;
pub mod swagger;

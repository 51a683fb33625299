use crate::builder::Builder;
use crate::extraction::{ExtractionContext, ModelContext, Source, Target};
use crate::introspection::source::SourceIntrospector;
use crate::introspection::{Registry, TypeIntrospector};
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::schema::{Document, Info, Operation};
use crate::serializer::write_to_file;
use crate::swagger::Swagger;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

const DEFAULT_TITLE: &str = "API";
const DEFAULT_API_VERSION: &str = "1.0.0";

/// Swagger from source - generate Swagger 2.0 documentation from Rust types and doc comments
#[derive(Parser, Debug)]
#[command(name = "swagger-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Swagger 2.0 JSON document to start from
    #[arg(long = "base", value_name = "FILE")]
    pub base: Option<PathBuf>,

    /// API title (info.title)
    #[arg(long = "title")]
    pub title: Option<String>,

    /// API version (info.version)
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// Serializer groups to document, comma separated
    #[arg(long = "groups", value_delimiter = ',')]
    pub groups: Option<Vec<String>>,

    /// Validation groups to document, comma separated
    #[arg(long = "validation-groups", value_delimiter = ',')]
    pub validation_groups: Option<Vec<String>>,

    /// Leave out properties whose since/until range excludes the API version
    #[arg(long = "version-exclusion")]
    pub version_exclusion: bool,

    /// Definition name to use for a type
    #[arg(long = "alias", value_name = "CLASS=ALIAS", value_parser = parse_alias)]
    pub aliases: Vec<(String, String)>,

    /// Response code of an exception type and its subtypes
    #[arg(long = "exception-code", value_name = "CLASS=CODE[:MESSAGE]", value_parser = parse_exception_code)]
    pub exception_codes: Vec<ExceptionCode>,

    /// Directory name to skip while scanning
    #[arg(long = "exclude", value_name = "DIR")]
    pub excludes: Vec<String>,

    /// Merge identical definitions and drop unreferenced ones
    #[arg(long = "clean")]
    pub clean: bool,

    /// Write the document even if it breaks Swagger 2.0 constraints
    #[arg(long = "no-validate")]
    pub no_validate: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// A `--exception-code` mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionCode {
    pub class: String,
    pub code: u16,
    pub message: Option<String>,
}

fn parse_alias(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((class, alias)) if !class.is_empty() && !alias.is_empty() => {
            Ok((class.to_string(), alias.to_string()))
        }
        _ => Err(format!("expected CLASS=ALIAS, got `{}`", value)),
    }
}

fn parse_exception_code(value: &str) -> std::result::Result<ExceptionCode, String> {
    let (class, rest) = value
        .split_once('=')
        .filter(|(class, _)| !class.is_empty())
        .ok_or_else(|| format!("expected CLASS=CODE[:MESSAGE], got `{}`", value))?;
    let (code, message) = match rest.split_once(':') {
        Some((code, message)) => (code, Some(message.to_string())),
        None => (rest, None),
    };
    let code = code
        .parse::<u16>()
        .map_err(|_| format!("invalid status code `{}`", code))?;
    Ok(ExceptionCode {
        class: class.to_string(),
        code,
        message,
    })
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }
    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }
    if let Some(base) = &args.base {
        if !base.is_file() {
            anyhow::bail!("Base document does not exist: {}", base.display());
        }
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

fn model_context(groups: &Option<Vec<String>>) -> Option<ModelContext> {
    groups
        .as_ref()
        .map(|groups| ModelContext::new().with_serializer_groups(groups.iter().cloned()))
}

fn parse_project(args: &CliArgs) -> Result<Vec<ParsedFile>> {
    let scanner = args
        .excludes
        .iter()
        .fold(FileScanner::new(args.project_path.clone()), |scanner, dir| {
            scanner.exclude(dir.as_str())
        });
    let scan_result = scanner.scan()?;
    info!("Found {} Rust files", scan_result.rust_files.len());

    if scan_result.rust_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
        .into_iter()
        .filter_map(|r| r.ok())
        .collect();
    info!("Successfully parsed {} files", parsed_files.len());

    if parsed_files.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }
    Ok(parsed_files)
}

fn build_engine(args: &CliArgs, registry: Rc<Registry>) -> Swagger {
    let builder = Builder::from_registry(registry).clean_on_dump(args.clean);
    let builder = args
        .aliases
        .iter()
        .fold(builder, |builder, (class, alias)| {
            builder.register_definition_alias(class, alias)
        });
    args.exception_codes
        .iter()
        .fold(builder, |builder, mapping| {
            builder.register_exception_response_code(
                &mapping.class,
                mapping.code,
                mapping.message.as_deref(),
            )
        })
        .build()
}

fn base_document(args: &CliArgs, swagger: &Swagger) -> Result<Document> {
    let mut document = match &args.base {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read base document: {}", path.display()))?;
            let document = swagger.extract_document(&Source::Raw(&raw))?;
            if document == Document::new() {
                warn!("{} is not a Swagger 2.0 JSON document, starting from scratch", path.display());
            }
            document
        }
        None => Document::new(),
    };

    let info = document
        .info
        .get_or_insert_with(|| Info::new(DEFAULT_TITLE, DEFAULT_API_VERSION));
    if let Some(title) = &args.title {
        info.title = title.clone();
    }
    if let Some(version) = &args.api_version {
        info.version = version.clone();
    }
    document.paths.get_or_insert_with(Default::default);
    Ok(document)
}

/// Documents every routed method into the context's document
fn extract_operations(
    swagger: &Swagger,
    registry: &Registry,
    context: &ExtractionContext,
) -> Result<usize> {
    let mut count = 0;
    for method in registry.methods() {
        for (http_method, path) in method.routes() {
            debug!("Documenting {} {} with {}", http_method, path, method.qualified_name());
            let mut operation = Operation::new();
            let mut sub = context.sub_context();
            swagger
                .extract(&Source::Method(method), &mut Target::Operation(&mut operation), &mut sub)
                .with_context(|| format!("Failed to document {}", method.qualified_name()))?;

            let replaced = context
                .root_mut()
                .path_item_mut(path)
                .set_operation(http_method, operation);
            if replaced.is_some() {
                warn!("{} {} is documented more than once", http_method, path);
            }
            count += 1;
        }
    }
    Ok(count)
}

/// Runs the whole pipeline and returns the serialized document
pub fn generate(args: &CliArgs) -> Result<String> {
    info!("Scanning project directory...");
    let parsed_files = parse_project(args)?;

    let registry = Rc::new(SourceIntrospector::introspect(&parsed_files));
    info!(
        "Found {} types and {} documented functions",
        registry.class_count(),
        registry.method_count()
    );

    let swagger = build_engine(args, registry.clone());
    let document = base_document(args, &swagger)?;

    let mut context = swagger.create_context(document);
    context.model_context = model_context(&args.groups);
    if let Some(groups) = &args.validation_groups {
        let model_context = context.model_context.take().unwrap_or_default();
        context.model_context =
            Some(model_context.with_validation_groups(groups.iter().cloned()));
    }
    context.version_exclusion = args.version_exclusion;

    let operations = extract_operations(&swagger, &registry, &context)?;
    info!("Documented {} operations", operations);
    if operations == 0 {
        warn!("No routed functions found in the project");
    }

    let document = context.into_document();
    let validate = !args.no_validate;
    let content = match args.output_format {
        OutputFormat::Yaml => swagger.dump_yaml(&document, validate)?,
        OutputFormat::Json => swagger.dump(&document, validate)?,
    };
    Ok(content)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let content = generate(&args)?;

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_alias() {
        assert_eq!(parse_alias("Pet=Animal"), Ok(("Pet".to_string(), "Animal".to_string())));
        assert!(parse_alias("Pet").is_err());
        assert!(parse_alias("=Animal").is_err());
    }

    #[test]
    fn test_parse_exception_code() {
        assert_eq!(
            parse_exception_code("NotFound=404:Not found: at all"),
            Ok(ExceptionCode {
                class: "NotFound".to_string(),
                code: 404,
                message: Some("Not found: at all".to_string()),
            })
        );
        assert_eq!(parse_exception_code("Conflict=409").unwrap().message, None);
        assert!(parse_exception_code("Conflict=abc").is_err());
        assert!(parse_exception_code("409").is_err());
    }

    #[test]
    fn test_cli_arguments() {
        let args = CliArgs::try_parse_from([
            "swagger-from-source",
            "./project",
            "-f",
            "json",
            "--groups",
            "public,admin",
            "--alias",
            "Pet=Animal",
            "--alias",
            "Dog=Hound",
            "--exception-code",
            "NotFound=404",
            "--exclude",
            "generated",
            "--clean",
        ])
        .unwrap();

        assert!(matches!(args.output_format, OutputFormat::Json));
        assert_eq!(args.groups, Some(vec!["public".to_string(), "admin".to_string()]));
        assert_eq!(args.validation_groups, None);
        assert_eq!(args.aliases.len(), 2);
        assert_eq!(args.exception_codes[0].code, 404);
        assert_eq!(args.excludes, vec!["generated"]);
        assert!(args.clean);
        assert!(!args.no_validate);
    }
}

//! Swagger from source - command-line tool generating Swagger 2.0 documentation.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! swagger-from-source ./my-api-project -o swagger.yaml
//! ```
//!
//! Generate JSON for the `public` serializer group, merging duplicate definitions:
//! ```bash
//! swagger-from-source ./my-api-project -f json --groups public --clean -o swagger.json
//! ```
//!
//! Start from an existing document and map an error type to a status code:
//! ```bash
//! swagger-from-source ./my-api-project --base base.json --exception-code "NotFound=404:Not found"
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_source::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger from source starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;
    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}

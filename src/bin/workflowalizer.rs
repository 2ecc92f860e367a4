//! workflowalizer - print the metadata of a workflow or template as JSON.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use workflowalizer::{ExtractionConfig, WorkflowalizerError, extract_template, extract_workflow};

#[derive(Parser, Debug)]
#[command(name = "workflowalizer", version, about)]
struct Args {
    /// Workflow or template directory, descriptor file, or zip archive
    path: PathBuf,

    /// Treat PATH as a metanode or component template
    #[arg(long)]
    template: bool,

    /// TOML file selecting the fields to read
    #[arg(long, env = "WORKFLOWALIZER_CONFIG", conflicts_with = "all")]
    config: Option<PathBuf>,

    /// Read every optional field
    #[arg(long)]
    all: bool,

    /// Print a flattened node list instead of the nested tree
    #[arg(long)]
    flatten: bool,

    /// Drop native nodes whose factory class matches REGEX (with --flatten)
    #[arg(long, value_name = "REGEX", requires = "flatten")]
    exclude: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<WorkflowalizerError>() {
                Some(err) => tracing::error!("[{}] {}", err.code(), err),
                None => tracing::error!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, Box<dyn Error>> {
    let config = load_config(args)?;
    let exclude: Vec<&str> = args.exclude.iter().map(String::as_str).collect();

    if args.template {
        let metadata = extract_template(&args.path, &config)?;
        if args.flatten {
            render(&metadata.flatten_excluding(&exclude)?, args.pretty)
        } else {
            render(&metadata, args.pretty)
        }
    } else {
        let metadata = extract_workflow(&args.path, &config)?;
        if args.flatten {
            render(&metadata.flatten_excluding(&exclude)?, args.pretty)
        } else {
            render(&metadata, args.pretty)
        }
    }
}

fn load_config(args: &Args) -> Result<ExtractionConfig, WorkflowalizerError> {
    if args.all {
        return Ok(ExtractionConfig::all());
    }
    match &args.config {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).map_err(|e| WorkflowalizerError::io(path, e))?;
            ExtractionConfig::from_toml_str(&text)
        }
        None => ExtractionConfig::builder()
            .read_nodes()
            .read_connections()
            .build(),
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, Box<dyn Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

use crate::config::GeneratorConfig;
use crate::generator::{discover_routes, render_router, GenerationSummary};
use crate::loader::manifest::ManifestResolver;
use crate::loader::source::SourceResolver;
use crate::loader::ModuleResolver;
use crate::serializer::{route_table, serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// File Router Generator - Build a nested router from a file-system routes directory
#[derive(Parser, Debug)]
#[command(name = "file-router-gen")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the routes directory (may also come from the config file)
    #[arg(value_name = "ROUTES_DIR")]
    pub routes_dir: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "typescript")]
    pub output_format: OutputFormat,

    /// Config file (JSON or YAML) with routesDir, output, importExtension, ...
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Manifest (JSON or YAML) declaring each module's exports instead of scanning sources
    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Suffix appended to generated import paths (e.g. ".js")
    #[arg(short = 'e', long = "import-extension", value_name = "EXT")]
    pub import_extension: Option<String>,

    /// Emit bare aliases instead of wrapping each route with its path and method
    #[arg(long = "no-openapi")]
    pub no_openapi: bool,

    /// Extra export names to treat as HTTP methods (repeatable or comma separated)
    #[arg(short = 'm', long = "additional-method", value_name = "METHOD", value_delimiter = ',')]
    pub additional_methods: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Generated TypeScript router module
    Typescript,
    /// Route table as JSON
    Json,
    /// Route table as YAML
    Yaml,
}

/// Arguments after merging the config file with command-line flags.
#[derive(Debug)]
pub struct Invocation {
    pub routes_dir: PathBuf,
    pub output_path: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub manifest: Option<PathBuf>,
    pub config: GeneratorConfig,
}

/// Parse command line arguments
pub fn parse_args() -> Result<Invocation> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Merge the config file with already-parsed arguments and validate the result.
///
/// Command-line flags take precedence over config file values.
pub fn parse_args_from_parsed(args: CliArgs) -> Result<Invocation> {
    debug!("Parsed arguments: {:?}", args);

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(ext) = args.import_extension {
        config.import_extension = ext;
    }
    if args.no_openapi {
        config.enable_openapi = false;
    }
    config
        .additional_methods
        .extend(args.additional_methods.into_iter().filter(|m| !m.trim().is_empty()));

    let routes_dir = match args.routes_dir.or_else(|| config.routes_dir.clone()) {
        Some(dir) => dir,
        None => anyhow::bail!("No routes directory given (pass ROUTES_DIR or set routesDir)"),
    };
    let output_path = args.output_path.or_else(|| config.output.clone());

    // Validate routes path exists
    if !routes_dir.exists() {
        anyhow::bail!("Routes directory does not exist: {}", routes_dir.display());
    }

    // Validate routes path is a directory
    if !routes_dir.is_dir() {
        anyhow::bail!("Routes path is not a directory: {}", routes_dir.display());
    }

    info!("Routes directory: {}", routes_dir.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if let Some(ref manifest) = args.manifest {
        info!("Export manifest: {}", manifest.display());
    }

    Ok(Invocation {
        routes_dir,
        output_path,
        output_format: args.output_format,
        manifest: args.manifest,
        config,
    })
}

/// File that stdout output stands in for when resolving import paths.
const STDOUT_TARGET: &str = "router.ts";

/// Run the main workflow
pub fn run(invocation: Invocation) -> Result<()> {
    match &invocation.manifest {
        Some(path) => {
            let mut resolver = ManifestResolver::from_file(path)
                .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
            run_with(&invocation, &mut resolver)
        }
        None => run_with(&invocation, &mut SourceResolver::new()),
    }
}

fn run_with<R: ModuleResolver>(invocation: &Invocation, resolver: &mut R) -> Result<()> {
    info!("Starting router generation...");

    let content = match invocation.output_format {
        OutputFormat::Typescript => {
            let target = invocation
                .output_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(STDOUT_TARGET));
            let (content, summary) = render_router(
                &invocation.routes_dir,
                &target,
                resolver,
                &invocation.config,
            )
            .context("Failed to generate router")?;
            log_summary(&summary);
            content
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let routes = discover_routes(&invocation.routes_dir, resolver, &invocation.config)
                .context("Failed to discover routes")?;
            let table = route_table(&routes);
            info!("Route table has {} modules", table.len());
            if invocation.output_format == OutputFormat::Json {
                serialize_json(&table)?
            } else {
                serialize_yaml(&table)?
            }
        }
    };

    if let Some(output_path) = &invocation.output_path {
        write_output(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    Ok(())
}

fn write_output(content: &str, path: &Path) -> Result<()> {
    info!("Writing output to: {}", path.display());
    write_to_file(content, path)
        .with_context(|| format!("Failed to write output: {}", path.display()))?;
    info!("Successfully wrote router to {}", path.display());
    Ok(())
}

fn log_summary(summary: &GenerationSummary) {
    info!("Summary:");
    info!("  - Modules discovered: {}", summary.modules);
    info!("  - Modules imported: {}", summary.imports);
    info!("  - Routes registered: {}", summary.routes);
}

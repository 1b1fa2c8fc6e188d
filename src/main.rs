//! File Router Generator - Command-line tool for generating file-system based routers.
//!
//! Walks a routes directory, reads the exports of every route module and writes a TypeScript
//! module exporting the nested router, or dumps the discovered route table.
//!
//! # Usage
//!
//! ```bash
//! file-router-gen [OPTIONS] [ROUTES_DIR]
//! ```
//!
//! # Examples
//!
//! Generate the router module:
//! ```bash
//! file-router-gen ./src/routes -o ./src/router.ts
//! ```
//!
//! Dump the route table as JSON:
//! ```bash
//! file-router-gen ./src/routes -f json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! file-router-gen ./src/routes -o ./src/router.ts -v
//! ```

use anyhow::Result;
use clap::Parser;
use file_router_gen::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("File Router Generator starting...");

    let invocation = cli::parse_args_from_parsed(args)?;

    cli::run(invocation)?;

    info!("Router generation completed successfully");

    Ok(())
}

//! File Router Generator - file-system based routing for oRPC-style procedure routers.
//!
//! This library discovers route modules in a directory hierarchy and compiles them into a single
//! nested router. Each file is a route; each named export of the file is a procedure registered
//! under that route. The router can be built in memory from live handler values, or emitted as
//! TypeScript source for static inclusion in a build.
//!
//! # Routing Conventions
//!
//! - `planets/list.ts` is served at `/planets/list`
//! - `planets/index.ts` is served at `/planets`
//! - `planets/{id}/find.ts` is served at `/planets/{id}/find` and grouped under `planets.find`
//! - an export named after an HTTP method (`GET`, `del`, ...) uses that method; other exports
//!   use the method from their `.route({ method })` metadata, or `POST`
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively walks the routes directory
//! 2. [`route_path`] - Derives route paths and grouping keys from file locations
//! 3. [`loader`] - Resolves each module to its exports (source scan, manifest, or registry)
//! 4. [`method`] - Decides the HTTP method of each export
//! 5. [`route`] - Assembles modules, exports and methods into routes
//! 6. [`tree`] - Compiles routes into a router tree and simplifies it
//! 7. [`alias`] - Generates collision-free import aliases
//! 8. [`emitter`] - Emits the tree as a live router or as TypeScript source
//! 9. [`serializer`] - Dumps the route table and writes output files
//!
//! # Example Usage
//!
//! ```no_run
//! use file_router_gen::{config::GeneratorConfig, generator::generate_router};
//! use std::path::Path;
//!
//! let config = GeneratorConfig::default();
//! let summary = generate_router(
//!     Path::new("./src/routes"),
//!     Path::new("./src/router.ts"),
//!     &config,
//! )
//! .unwrap();
//! println!("Generated {} routes", summary.routes);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod alias;
pub mod cli;
pub mod config;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod loader;
pub mod method;
pub mod route;
pub mod route_path;
pub mod scanner;
pub mod serializer;
pub mod tree;

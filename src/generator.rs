//! End-to-end pipelines: directory walk → route paths → exports → methods → tree → output.

use crate::config::GeneratorConfig;
use crate::emitter::codegen::{render_module, ImportPlan};
use crate::emitter::live;
use crate::error::Result;
use crate::loader::source::SourceResolver;
use crate::loader::{ModuleResolver, Procedure};
use crate::method::MethodResolver;
use crate::route::{collect_routes, Route};
use crate::scanner::RouteScanner;
use crate::serializer::write_to_file;
use crate::tree::{build_router, Router};
use log::info;
use std::path::Path;

/// Counts reported after a codegen run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSummary {
    pub modules: usize,
    pub imports: usize,
    pub routes: usize,
}

/// Walks `routes_dir` and resolves every module into a [`Route`].
///
/// # Arguments
///
/// * `routes_dir` - Root of the route module tree
/// * `resolver` - Source of each module's exports
/// * `config` - Supplies the extra method tokens recognized in export names
///
/// # Returns
///
/// Returns one route per discovered module, in walk order. Modules without exports are
/// included with an empty export list.
///
/// # Errors
///
/// Returns [`crate::error::Error::Filesystem`] if the walk fails, or whatever error the
/// resolver reports for the first module it cannot load.
pub fn discover_routes<R: ModuleResolver>(
    routes_dir: &Path,
    resolver: &mut R,
    config: &GeneratorConfig,
) -> Result<Vec<Route<R::Handler>>> {
    let modules = RouteScanner::new(routes_dir.to_path_buf()).scan()?;
    info!(
        "Found {} route modules in {}",
        modules.len(),
        routes_dir.display()
    );
    let methods = MethodResolver::new(&config.additional_methods);
    collect_routes(&modules, resolver, &methods)
}

/// Builds a live router from registered handlers.
///
/// Every discovered module must be known to `resolver`; the first module that fails to load
/// aborts the run.
pub fn create_router<R, P>(
    routes_dir: &Path,
    resolver: &mut R,
    config: &GeneratorConfig,
) -> Result<Router<P::Registered>>
where
    R: ModuleResolver<Handler = P>,
    P: Procedure,
{
    let routes = discover_routes(routes_dir, resolver, config)?;
    let router = build_router(routes, |_, export| export.handler)?;
    info!("Live router built with {} routes", router.leaf_count());
    Ok(live::finalize(router, config.enable_openapi))
}

/// Renders the router source for `routes_dir` as it would be written to `output`.
///
/// Import specifiers are relative to the directory containing `output`. A bare file name
/// such as `router.ts` is placed in the working directory.
///
/// # Arguments
///
/// * `routes_dir` - Root of the route module tree
/// * `output` - Path the generated file is meant for
/// * `resolver` - Source of each module's exports
/// * `config` - Import extension, route wrapping and extra method tokens
///
/// # Returns
///
/// Returns the generated text together with its summary. Nothing is written.
///
/// # Errors
///
/// Returns an error if discovery fails, two exports land on the same key
/// ([`crate::error::Error::DuplicateRoute`]), a key is both a route and a group
/// ([`crate::error::Error::RouteConflict`]), or two exports share an alias
/// ([`crate::error::Error::AliasCollision`]).
pub fn render_router<R: ModuleResolver>(
    routes_dir: &Path,
    output: &Path,
    resolver: &mut R,
    config: &GeneratorConfig,
) -> Result<(String, GenerationSummary)> {
    let routes = discover_routes(routes_dir, resolver, config)?;
    let modules = routes.len();

    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let plan = ImportPlan::build(&routes, output_dir, &config.import_extension)?;

    let router = build_router(routes, |path, export| {
        plan.alias(path, &export.name)
            .map(str::to_string)
            .unwrap_or_else(|| crate::alias::alias_for(path, &export.name))
    })?;

    let summary = GenerationSummary {
        modules,
        imports: plan.imports.len(),
        routes: router.leaf_count(),
    };
    Ok((render_module(&plan, &router, config), summary))
}

/// Generates the router source with `resolver` and writes it to `output`.
pub fn generate_router_with<R: ModuleResolver>(
    routes_dir: &Path,
    output: &Path,
    resolver: &mut R,
    config: &GeneratorConfig,
) -> Result<GenerationSummary> {
    let (content, summary) = render_router(routes_dir, output, resolver, config)?;
    write_to_file(&content, output)?;
    info!(
        "Router with {} routes written to {}",
        summary.routes,
        output.display()
    );
    Ok(summary)
}

/// Generates the router source by scanning route files and writes it to `output`.
///
/// # Errors
///
/// Returns the errors of [`render_router`], or [`crate::error::Error::Io`] if `output`
/// cannot be written. On error no file is created.
///
/// # Example
///
/// ```no_run
/// use file_router_gen::{config::GeneratorConfig, generator::generate_router};
/// use std::path::Path;
///
/// let summary = generate_router(
///     Path::new("src/routes"),
///     Path::new("src/router.ts"),
///     &GeneratorConfig::default(),
/// )
/// .unwrap();
/// println!("{} routes", summary.routes);
/// ```
pub fn generate_router(
    routes_dir: &Path,
    output: &Path,
    config: &GeneratorConfig,
) -> Result<GenerationSummary> {
    generate_router_with(routes_dir, output, &mut SourceResolver::new(), config)
}

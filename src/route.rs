//! Route assembly: discovered modules joined with their exports and resolved methods.

use crate::error::Result;
use crate::loader::{ModuleResolver, RouteMeta};
use crate::method::{HttpMethod, MethodResolver};
use crate::route_path::RoutePath;
use crate::scanner::DiscoveredModule;
use log::debug;

/// A single export of a route module, with its resolved HTTP method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteExport<H> {
    pub name: String,
    pub method: HttpMethod,
    pub meta: RouteMeta,
    pub handler: H,
}

/// All exports of one discovered module, placed at that module's route path.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pub path: RoutePath,
    pub module: DiscoveredModule,
    pub exports: Vec<RouteExport<H>>,
}

impl<H> Route<H> {
    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(|e| e.name.as_str())
    }
}

/// Loads every module in walk order and resolves the method of each export.
///
/// Modules are processed one at a time; the first load failure aborts the whole run.
///
/// # Arguments
///
/// * `modules` - Modules returned by the scanner
/// * `resolver` - Source of each module's exports
/// * `methods` - Decides the HTTP method of each export
///
/// # Returns
///
/// Returns one [`Route`] per module, in the same order as `modules`.
///
/// # Errors
///
/// Returns the resolver's error for the first module that cannot be loaded.
pub fn collect_routes<R: ModuleResolver>(
    modules: &[DiscoveredModule],
    resolver: &mut R,
    methods: &MethodResolver,
) -> Result<Vec<Route<R::Handler>>> {
    let mut routes = Vec::with_capacity(modules.len());

    for module in modules {
        let path = RoutePath::from_module(module);
        let exports = resolver
            .resolve(module)?
            .into_iter()
            .map(|export| {
                let method = methods.resolve(&export.name, export.meta.method.as_deref());
                debug!("{} {} ({})", method, path, export.name);
                RouteExport {
                    name: export.name,
                    method,
                    meta: export.meta,
                    handler: export.handler,
                }
            })
            .collect();

        routes.push(Route {
            path,
            module: module.clone(),
            exports,
        });
    }

    Ok(routes)
}

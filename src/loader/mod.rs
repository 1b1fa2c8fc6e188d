//! Module loading: turning a discovered file into its named exports.
//!
//! The loader is the seam between route discovery and whatever framework the handlers belong
//! to. It never interprets handlers; it only enumerates export names and the routing metadata
//! an export reports about itself.
//!
//! # Resolvers
//!
//! - [`source::SourceResolver`]: statically scans TypeScript/JavaScript route files
//! - [`manifest::ManifestResolver`]: reads an explicit JSON/YAML export manifest
//! - [`registry::StaticResolver`]: an in-memory registry of live handler values

pub mod manifest;
pub mod registry;
pub mod source;

use crate::error::Result;
use crate::scanner::DiscoveredModule;
use serde::{Deserialize, Serialize};

/// Routing metadata an export may carry (`.route({ method, summary, tags })`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// One named binding exported by a route module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export<H> {
    pub name: String,
    pub meta: RouteMeta,
    pub handler: H,
}

impl<H> Export<H> {
    pub fn new(name: impl Into<String>, meta: RouteMeta, handler: H) -> Self {
        Self {
            name: name.into(),
            meta,
            handler,
        }
    }
}

/// All exports of one module, in declaration order.
pub type ModuleExports<H> = Vec<Export<H>>;

/// Trait for resolving a discovered module to its exports.
///
/// Implementations decide how exports are found: by scanning source text, by reading a
/// manifest, or by looking up handlers registered in memory.
pub trait ModuleResolver {
    /// Opaque handler reference attached to each export
    type Handler;

    /// Resolves one module.
    ///
    /// # Errors
    ///
    /// Returns an error if the module cannot be read or loaded. Callers treat this as fatal.
    fn resolve(&mut self, module: &DiscoveredModule) -> Result<ModuleExports<Self::Handler>>;
}

/// Path and method handed to a handler when its route is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: String,
    pub method: Option<crate::method::HttpMethod>,
}

/// A live request handler that can be finalized into a route registration.
///
/// This is the capability the external RPC framework provides: the generator only asks a
/// handler what method it reports and then attaches a path (and optionally a method) to it.
pub trait Procedure {
    /// The finalized, invokable registration
    type Registered;

    /// Method the handler declares for itself, if any.
    fn reported_method(&self) -> Option<&str> {
        None
    }

    fn route(&self, spec: &RouteSpec) -> Self::Registered;
}

use super::{Export, ModuleExports, ModuleResolver, Procedure, RouteMeta};
use crate::error::{Error, Result};
use crate::scanner::DiscoveredModule;
use log::debug;
use std::collections::HashMap;

/// In-memory module registry for live routers.
///
/// The embedding application registers the handler values each route file exports, keyed by
/// the file's path relative to the routes directory. Every module found by the walk must have
/// been registered; anything else is a load failure.
pub struct StaticResolver<P> {
    modules: HashMap<String, Vec<(String, P)>>,
}

impl<P: Procedure + Clone> StaticResolver<P> {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Registers one export of the module at `module_path` (e.g. `planets/{id}/find.ts`).
    pub fn register(&mut self, module_path: &str, export_name: &str, handler: P) -> &mut Self {
        self.modules
            .entry(module_path.trim_start_matches('/').to_string())
            .or_default()
            .push((export_name.to_string(), handler));
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, module_path: &str, export_name: &str, handler: P) -> Self {
        self.register(module_path, export_name, handler);
        self
    }
}

impl<P: Procedure + Clone> Default for StaticResolver<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Procedure + Clone> ModuleResolver for StaticResolver<P> {
    type Handler = P;

    fn resolve(&mut self, module: &DiscoveredModule) -> Result<ModuleExports<P>> {
        let key = module.relative_path();
        let entries = self.modules.get(&key).ok_or_else(|| Error::ModuleLoad {
            module: key.clone(),
            message: "no handlers registered for this module".to_string(),
        })?;

        debug!("Loaded {} handlers from {}", entries.len(), key);
        Ok(entries
            .iter()
            .map(|(name, handler)| {
                let meta = RouteMeta {
                    method: handler.reported_method().map(str::to_string),
                    ..RouteMeta::default()
                };
                Export::new(name.clone(), meta, handler.clone())
            })
            .collect())
    }
}

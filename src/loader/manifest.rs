use super::{Export, ModuleExports, ModuleResolver, RouteMeta};
use crate::error::{Error, Result};
use crate::scanner::DiscoveredModule;
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// An export entry as written in a manifest file.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestExport {
    pub name: String,
    #[serde(flatten)]
    pub meta: RouteMeta,
}

/// Resolves modules from an explicit export manifest.
///
/// The manifest maps each module's path relative to the routes directory to the exports it
/// declares, so no source code has to be inspected:
///
/// ```yaml
/// planets/list.ts:
///   - name: listPlanets
///     method: GET
///     summary: List all planets
/// planets/{id}/update.ts:
///   - name: PUT
/// ```
#[derive(Debug, Default, Clone)]
pub struct ManifestResolver {
    modules: BTreeMap<String, Vec<ManifestExport>>,
}

impl ManifestResolver {
    pub fn new(modules: BTreeMap<String, Vec<ManifestExport>>) -> Self {
        Self { modules }
    }

    /// Loads a manifest from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading export manifest: {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| Error::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let modules: BTreeMap<String, Vec<ManifestExport>> = if is_json {
            serde_json::from_str(&content).map_err(|e| Error::Manifest {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| Error::Manifest {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        info!("Manifest declares {} modules", modules.len());
        Ok(Self::new(modules))
    }
}

impl ModuleResolver for ManifestResolver {
    type Handler = ();

    fn resolve(&mut self, module: &DiscoveredModule) -> Result<ModuleExports<()>> {
        let key = module.relative_path();
        match self.modules.get(&key) {
            Some(entries) => Ok(entries
                .iter()
                .map(|e| Export::new(e.name.clone(), e.meta.clone(), ()))
                .collect()),
            None => {
                warn!("Module {} is not listed in the manifest", key);
                Ok(Vec::new())
            }
        }
    }
}

//! Generator configuration.
//!
//! Option names follow the camelCase keys used in router config files:
//!
//! ```yaml
//! routesDir: src/routes
//! output: src/router.ts
//! importExtension: .js
//! enableOpenAPI: true
//! additionalMethods: [SUBSCRIBE]
//! ```

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Routes directory, when given in a config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes_dir: Option<PathBuf>,
    /// Output file for generated source, when given in a config file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Suffix appended to every generated import path (e.g. `.js`)
    pub import_extension: String,
    /// Wrap each leaf with its path and method; off emits the bare alias
    #[serde(rename = "enableOpenAPI")]
    pub enable_openapi: bool,
    /// Extra export names treated as HTTP methods
    pub additional_methods: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            routes_dir: None,
            output: None,
            import_extension: String::new(),
            enable_openapi: true,
            additional_methods: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Loads a config file; `.json` is read as JSON, anything else as YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading generator config: {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| Error::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let mut config: GeneratorConfig = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        };

        // Relative paths in a config file are relative to the file itself
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.routes_dir = config.routes_dir.map(|p| base.join(p));
        config.output = config.output.map(|p| base.join(p));

        Ok(config)
    }
}

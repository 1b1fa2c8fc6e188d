//! Serialization module for route tables and generated output files.
//!
//! Besides the generated router source, the discovered route table can be dumped as YAML or
//! JSON for review or for feeding other tools.

use crate::alias::alias_for;
use crate::error::{Error, Result};
use crate::method::HttpMethod;
use crate::route::Route;
use crate::route_path::RoutePath;
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One row per route module.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTableEntry {
    pub path: RoutePath,
    /// Module path relative to the routes directory
    pub module: String,
    pub exports: Vec<RouteTableExport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteTableExport {
    pub name: String,
    pub method: HttpMethod,
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Builds the route table for a set of routes, in walk order.
pub fn route_table<H>(routes: &[Route<H>]) -> Vec<RouteTableEntry> {
    routes
        .iter()
        .map(|route| RouteTableEntry {
            path: route.path.clone(),
            module: route.module.relative_path(),
            exports: route
                .exports
                .iter()
                .map(|export| RouteTableExport {
                    name: export.name.clone(),
                    method: export.method.clone(),
                    alias: alias_for(&route.path, &export.name),
                    summary: export.meta.summary.clone(),
                    tags: export.meta.tags.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Serializes a route table to YAML format.
pub fn serialize_yaml(table: &[RouteTableEntry]) -> Result<String> {
    debug!("Serializing route table to YAML");
    Ok(serde_yaml::to_string(table)?)
}

/// Serializes a route table to JSON format with pretty printing.
pub fn serialize_json(table: &[RouteTableEntry]) -> Result<String> {
    debug!("Serializing route table to JSON");
    Ok(serde_json::to_string_pretty(table)?)
}

/// Writes string content to a file.
///
/// Creates parent directories if needed and overwrites any existing file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory or file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

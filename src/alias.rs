//! Generated import aliases for route exports.
//!
//! Every `(route path, export name)` pair gets an identifier such as `planets_id_find__GET`, so
//! that exports sharing a name (`GET` is exported by many files) can be imported side by side.

use crate::error::{Error, Result};
use crate::route_path::RoutePath;
use std::collections::HashMap;

/// Separator between the path part and the export name of an alias.
pub const ALIAS_DELIMITER: &str = "__";

/// Builds the alias for one export.
pub fn alias_for(path: &RoutePath, export_name: &str) -> String {
    let prefix = path
        .segments()
        .map(|segment| segment.trim_start_matches('{').trim_end_matches('}'))
        .collect::<Vec<_>>()
        .join("_")
        .replace('-', "_");

    sanitize_identifier(&format!("{}{}{}", prefix, ALIAS_DELIMITER, export_name))
}

/// Replaces characters that cannot appear in a JavaScript identifier with `_`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut ident: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if ident.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Returns true if `name` can be written as a bare object key / identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Aliases assigned across one compilation unit.
///
/// Assigning the same pair twice returns the same alias; two different pairs that would share
/// an alias are rejected.
#[derive(Debug, Default)]
pub struct AliasTable {
    owners: HashMap<String, (RoutePath, String)>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the alias for `(path, export_name)`, recording it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AliasCollision`] if a different pair already owns the alias.
    pub fn assign(&mut self, path: &RoutePath, export_name: &str) -> Result<String> {
        let alias = alias_for(path, export_name);
        if let Some((owner_path, owner_export)) = self.owners.get(&alias) {
            if owner_path != path || owner_export != export_name {
                return Err(Error::AliasCollision {
                    alias,
                    first: format!("{} ({})", owner_path, owner_export),
                    second: format!("{} ({})", path, export_name),
                });
            }
            return Ok(alias);
        }
        self.owners
            .insert(alias.clone(), (path.clone(), export_name.to_string()));
        Ok(alias)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

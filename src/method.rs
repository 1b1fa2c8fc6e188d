//! HTTP method resolution for route exports.
//!
//! An export named after a method (`GET`, `del`, ...) always maps to that method. Otherwise the
//! method self-reported by the export's routing metadata is used, falling back to `POST`.

use log::debug;
use serde::{Serialize, Serializer};
use std::fmt;

/// Method tokens recognized without any configuration.
pub const METHOD_EXPORTS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// HTTP methods a route can be registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    /// A caller-supplied token such as `SUBSCRIBE`, stored uppercased
    Custom(String),
}

impl HttpMethod {
    /// Converts a raw token into a method, applying `DEL` → `DELETE` normalization.
    pub fn from_token(token: &str) -> Self {
        match normalize_method_token(token).as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            other => HttpMethod::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Custom(token) => token,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Uppercases a method token, mapping `DEL` to `DELETE`.
pub fn normalize_method_token(token: &str) -> String {
    let upper = token.trim().to_ascii_uppercase();
    if upper == "DEL" {
        "DELETE".to_string()
    } else {
        upper
    }
}

/// Decides the HTTP method of each export.
#[derive(Debug, Clone)]
pub struct MethodResolver {
    recognized: Vec<String>,
}

impl MethodResolver {
    /// Creates a resolver that recognizes the built-in tokens plus `additional_methods`.
    pub fn new(additional_methods: &[String]) -> Self {
        let mut recognized: Vec<String> = METHOD_EXPORTS.iter().map(|m| m.to_string()).collect();
        for extra in additional_methods {
            let token = normalize_method_token(extra);
            if !token.is_empty() && !recognized.contains(&token) {
                recognized.push(token);
            }
        }
        Self { recognized }
    }

    /// Returns true if `export_name` names a recognized method.
    pub fn is_method_export(&self, export_name: &str) -> bool {
        let token = normalize_method_token(export_name);
        self.recognized.iter().any(|m| *m == token)
    }

    /// Resolves the method for one export.
    ///
    /// Precedence: method-named export, then `reported` metadata, then `POST`.
    pub fn resolve(&self, export_name: &str, reported: Option<&str>) -> HttpMethod {
        if self.is_method_export(export_name) {
            return HttpMethod::from_token(export_name);
        }
        match reported.map(str::trim).filter(|m| !m.is_empty()) {
            Some(method) => HttpMethod::from_token(method),
            None => {
                debug!("Export '{}' has no method, defaulting to POST", export_name);
                HttpMethod::Post
            }
        }
    }
}

impl Default for MethodResolver {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_del_normalizes_to_delete() {
        let resolver = MethodResolver::default();
        assert_eq!(resolver.resolve("DEL", None), HttpMethod::Delete);
        assert_eq!(resolver.resolve("del", None), HttpMethod::Delete);
    }

    #[test]
    fn test_plain_name_without_metadata_defaults_to_post() {
        let resolver = MethodResolver::default();
        assert_eq!(resolver.resolve("me", None), HttpMethod::Post);
    }

    #[test]
    fn test_method_name_wins_over_metadata() {
        let resolver = MethodResolver::default();
        assert_eq!(resolver.resolve("GET", Some("PUT")), HttpMethod::Get);
        assert_eq!(resolver.resolve("get", Some("POST")), HttpMethod::Get);
    }

    #[test]
    fn test_metadata_wins_over_default() {
        let resolver = MethodResolver::default();
        assert_eq!(resolver.resolve("listPlanets", Some("GET")), HttpMethod::Get);
        assert_eq!(resolver.resolve("remove", Some("del")), HttpMethod::Delete);
        assert_eq!(resolver.resolve("me", Some("  ")), HttpMethod::Post);
    }

    #[test]
    fn test_additional_methods() {
        let resolver = MethodResolver::new(&["subscribe".to_string()]);
        assert!(resolver.is_method_export("SUBSCRIBE"));
        assert_eq!(
            resolver.resolve("subscribe", None),
            HttpMethod::Custom("SUBSCRIBE".to_string())
        );

        let plain = MethodResolver::default();
        assert!(!plain.is_method_export("subscribe"));
        assert_eq!(plain.resolve("subscribe", None), HttpMethod::Post);
    }

    #[test]
    fn test_display_and_serialize() {
        assert_eq!(HttpMethod::Options.to_string(), "OPTIONS");
        assert_eq!(
            serde_json::to_string(&HttpMethod::Custom("LINK".to_string())).unwrap(),
            "\"LINK\""
        );
    }
}

//! Route path derivation from a module's location under the routes directory.
//!
//! `planets/list.ts` becomes `/planets/list`, `planets/index.ts` becomes `/planets`, and
//! dynamic directories such as `{id}` are kept verbatim in the path.

use crate::scanner::DiscoveredModule;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A normalized, slash-delimited route path such as `/planets/{id}/find`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoutePath(String);

impl RoutePath {
    /// Builds the route path for a discovered module.
    pub fn from_module(module: &DiscoveredModule) -> Self {
        Self::build(module.directory_segments(), &module.name)
    }

    /// Builds a route path from directory segments and a file name.
    ///
    /// The file extension is stripped. A file whose stem is (or starts with) `index` adds no
    /// segment of its own, so it maps to its parent directory.
    pub fn build<S: AsRef<str>>(directory_segments: &[S], file_name: &str) -> Self {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());

        let mut segments: Vec<&str> = directory_segments
            .iter()
            .map(|s| s.as_ref().trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect();
        if !stem.starts_with("index") && !stem.is_empty() {
            segments.push(stem.as_str());
        }

        RoutePath(format!("/{}", segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty path segments, dynamic ones included.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Segments used to place the route in the router tree.
    ///
    /// Dynamic `{param}` segments are dropped entirely.
    pub fn grouping_keys(&self) -> Vec<&str> {
        self.segments().filter(|s| !is_dynamic_segment(s)).collect()
    }

    /// Names of the dynamic parameters in this path, in order.
    pub fn params(&self) -> Vec<&str> {
        self.segments()
            .filter(|s| is_dynamic_segment(s))
            .map(|s| &s[1..s.len() - 1])
            .collect()
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true for segments written as `{name}`.
pub fn is_dynamic_segment(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file() {
        let path = RoutePath::build(&["planets"], "list.ts");
        assert_eq!(path.as_str(), "/planets/list");
    }

    #[test]
    fn test_index_file_flattens_to_parent() {
        let path = RoutePath::build(&["planets"], "index.ts");
        assert_eq!(path.as_str(), "/planets");
    }

    #[test]
    fn test_index_prefixed_file_flattens_to_parent() {
        let path = RoutePath::build(&["planets"], "index.server.ts");
        assert_eq!(path.as_str(), "/planets");
    }

    #[test]
    fn test_root_index_is_slash() {
        let path = RoutePath::build::<&str>(&[], "index.ts");
        assert_eq!(path.as_str(), "/");
        assert!(path.grouping_keys().is_empty());
    }

    #[test]
    fn test_root_file() {
        let path = RoutePath::build::<&str>(&[], "sse.ts");
        assert_eq!(path.as_str(), "/sse");
    }

    #[test]
    fn test_dynamic_segment_is_kept_in_path_but_not_in_keys() {
        let path = RoutePath::build(&["planets", "{id}"], "find.ts");
        assert_eq!(path.as_str(), "/planets/{id}/find");
        assert_eq!(path.grouping_keys(), vec!["planets", "find"]);
        assert_eq!(path.params(), vec!["id"]);
    }

    #[test]
    fn test_no_doubled_separators() {
        let path = RoutePath::build(&["/auth/", ""], "me.ts");
        assert_eq!(path.as_str(), "/auth/me");
    }

    #[test]
    fn test_from_module() {
        let module = DiscoveredModule {
            name: "update.ts".to_string(),
            directory: "/routes/planets/{id}".into(),
            relative_segments: vec![
                "planets".to_string(),
                "{id}".to_string(),
                "update.ts".to_string(),
            ],
        };
        assert_eq!(
            RoutePath::from_module(&module).to_string(),
            "/planets/{id}/update"
        );
    }

    #[test]
    fn test_is_dynamic_segment() {
        assert!(is_dynamic_segment("{id}"));
        assert!(!is_dynamic_segment("{}"));
        assert!(!is_dynamic_segment("id"));
        assert!(!is_dynamic_segment("{id"));
    }
}

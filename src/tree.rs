//! Router tree compilation and simplification.
//!
//! Routes are folded into a nested [`Branch`] keyed by path segment, with one [`Leaf`] per
//! export. Dynamic `{param}` segments never appear as keys; they only survive in the route path
//! carried by each leaf.
//!
//! ```text
//! /planets        GET   ─┐
//! /planets/list   GET    ├─►  planets ─┬─ GET     /planets
//! /planets/{id}/update PUT┘             ├─ list    /planets/list
//!                                       └─ update  /planets/{id}/update
//! ```

use crate::error::{Error, Result};
use crate::method::HttpMethod;
use crate::route::{Route, RouteExport};
use crate::route_path::RoutePath;
use log::debug;
use std::collections::btree_map::{self, BTreeMap};

/// A terminal route binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf<T> {
    /// Route path including dynamic segments
    pub path: RoutePath,
    /// Name of the export this leaf was built from
    pub export: String,
    pub method: HttpMethod,
    /// Registration payload: a handler, an alias, or a finalized route
    pub payload: T,
}

/// A node of the router tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterNode<T> {
    Leaf(Leaf<T>),
    Branch(Branch<T>),
}

/// An intermediate grouping node. Children are kept sorted by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch<T> {
    children: BTreeMap<String, RouterNode<T>>,
}

/// The router as a whole is its root branch.
pub type Router<T> = Branch<T>;

impl<T> Branch<T> {
    pub fn new() -> Self {
        Self {
            children: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RouterNode<T>> {
        self.children.get(key)
    }

    pub fn children(&self) -> btree_map::Iter<'_, String, RouterNode<T>> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves at any depth below this branch.
    pub fn leaf_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                RouterNode::Leaf(_) => 1,
                RouterNode::Branch(b) => b.leaf_count(),
            })
            .sum()
    }

    /// All leaves below this branch, depth first in key order.
    pub fn leaves(&self) -> Vec<&Leaf<T>> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf<T>>) {
        for node in self.children.values() {
            match node {
                RouterNode::Leaf(leaf) => out.push(leaf),
                RouterNode::Branch(b) => b.collect_leaves(out),
            }
        }
    }

    /// Collapses every non-root branch whose only child is a leaf into that leaf.
    ///
    /// Children are simplified before their parent, so chains of single-leaf branches collapse
    /// completely and a second pass never changes the result. This branch itself is kept even
    /// if it ends up holding a single leaf.
    pub fn simplify(self) -> Self {
        Self {
            children: self
                .children
                .into_iter()
                .map(|(key, node)| (key, node.simplify()))
                .collect(),
        }
    }

    /// Rebuilds the tree with each leaf's payload transformed by `f`.
    pub fn map_leaves<U, F>(self, f: &mut F) -> Branch<U>
    where
        F: FnMut(Leaf<T>) -> U,
    {
        Branch {
            children: self
                .children
                .into_iter()
                .map(|(key, node)| {
                    let node = match node {
                        RouterNode::Leaf(leaf) => {
                            let path = leaf.path.clone();
                            let export = leaf.export.clone();
                            let method = leaf.method.clone();
                            RouterNode::Leaf(Leaf {
                                path,
                                export,
                                method,
                                payload: f(leaf),
                            })
                        }
                        RouterNode::Branch(b) => RouterNode::Branch(b.map_leaves(f)),
                    };
                    (key, node)
                })
                .collect(),
        }
    }
}

impl<T> Default for Branch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouterNode<T> {
    pub fn as_leaf(&self) -> Option<&Leaf<T>> {
        match self {
            RouterNode::Leaf(leaf) => Some(leaf),
            RouterNode::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch<T>> {
        match self {
            RouterNode::Branch(b) => Some(b),
            RouterNode::Leaf(_) => None,
        }
    }

    fn simplify(self) -> Self {
        match self {
            RouterNode::Leaf(leaf) => RouterNode::Leaf(leaf),
            RouterNode::Branch(branch) => {
                let mut branch = branch.simplify();
                let single_leaf = branch.children.len() == 1
                    && matches!(branch.children.values().next(), Some(RouterNode::Leaf(_)));
                if single_leaf {
                    if let Some((_, leaf)) = branch.children.pop_first() {
                        return leaf;
                    }
                }
                RouterNode::Branch(branch)
            }
        }
    }
}

/// Folds routes into an unsimplified router tree.
///
/// `payload` is called once per export to produce the leaf payload.
///
/// # Errors
///
/// - [`Error::DuplicateRoute`] if two exports land on the same key
/// - [`Error::RouteConflict`] if a key is needed both as a leaf and as a branch
pub fn compile<H, T, F>(routes: Vec<Route<H>>, mut payload: F) -> Result<Router<T>>
where
    F: FnMut(&RoutePath, RouteExport<H>) -> T,
{
    let mut root = Branch::new();

    for route in routes {
        if route.exports.is_empty() {
            debug!("Skipping {}: module has no exports", route.path);
            continue;
        }

        let keys: Vec<String> = route
            .path
            .grouping_keys()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut current = &mut root;
        for (depth, key) in keys.iter().enumerate() {
            let node = current
                .children
                .entry(key.clone())
                .or_insert_with(|| RouterNode::Branch(Branch::new()));
            current = match node {
                RouterNode::Branch(b) => b,
                RouterNode::Leaf(_) => {
                    return Err(Error::RouteConflict {
                        key: keys[..=depth].join("."),
                        path: route.path.to_string(),
                    })
                }
            };
        }

        for export in route.exports {
            let dotted = keys
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(export.name.as_str()))
                .collect::<Vec<_>>()
                .join(".");

            match current.children.entry(export.name.clone()) {
                btree_map::Entry::Occupied(existing) => {
                    return Err(match existing.get() {
                        RouterNode::Leaf(leaf) => Error::DuplicateRoute {
                            key: dotted,
                            first: format!("{} ({})", leaf.path, leaf.export),
                            second: format!("{} ({})", route.path, export.name),
                        },
                        RouterNode::Branch(_) => Error::RouteConflict {
                            key: dotted,
                            path: route.path.to_string(),
                        },
                    });
                }
                btree_map::Entry::Vacant(slot) => {
                    let name = export.name.clone();
                    let method = export.method.clone();
                    let value = payload(&route.path, export);
                    slot.insert(RouterNode::Leaf(Leaf {
                        path: route.path.clone(),
                        export: name,
                        method,
                        payload: value,
                    }));
                }
            }
        }
    }

    Ok(root)
}

/// Compiles and simplifies in one step.
pub fn build_router<H, T, F>(routes: Vec<Route<H>>, payload: F) -> Result<Router<T>>
where
    F: FnMut(&RoutePath, RouteExport<H>) -> T,
{
    Ok(compile(routes, payload)?.simplify())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RouteMeta;
    use crate::scanner::DiscoveredModule;

    fn route(segments: &[&str], exports: &[(&str, HttpMethod)]) -> Route<()> {
        let module = DiscoveredModule {
            name: segments.last().unwrap().to_string(),
            directory: "/routes".into(),
            relative_segments: segments.iter().map(|s| s.to_string()).collect(),
        };
        Route {
            path: RoutePath::from_module(&module),
            module,
            exports: exports
                .iter()
                .map(|(name, method)| RouteExport {
                    name: name.to_string(),
                    method: method.clone(),
                    meta: RouteMeta::default(),
                    handler: (),
                })
                .collect(),
        }
    }

    fn path_payload(path: &RoutePath, export: RouteExport<()>) -> String {
        format!("{} {}", export.method, path)
    }

    fn leaf<'a>(branch: &'a Branch<String>, key: &str) -> &'a Leaf<String> {
        branch
            .get(key)
            .and_then(RouterNode::as_leaf)
            .unwrap_or_else(|| panic!("expected leaf at '{}'", key))
    }

    fn branch<'a>(parent: &'a Branch<String>, key: &str) -> &'a Branch<String> {
        parent
            .get(key)
            .and_then(RouterNode::as_branch)
            .unwrap_or_else(|| panic!("expected branch at '{}'", key))
    }

    fn planets() -> Vec<Route<()>> {
        vec![
            route(&["planets", "list.ts"], &[("GET", HttpMethod::Get)]),
            route(&["planets", "index.ts"], &[("GET", HttpMethod::Get)]),
            route(&["planets", "{id}", "update.ts"], &[("PUT", HttpMethod::Put)]),
        ]
    }

    #[test]
    fn test_planets_tree_shape() {
        let router = build_router(planets(), path_payload).unwrap();

        assert_eq!(router.len(), 1);
        let planets = branch(&router, "planets");
        assert_eq!(planets.len(), 3);

        let get = leaf(planets, "GET");
        assert_eq!(get.path.as_str(), "/planets");
        assert_eq!(get.method, HttpMethod::Get);

        let list = leaf(planets, "list");
        assert_eq!(list.payload, "GET /planets/list");

        let update = leaf(planets, "update");
        assert_eq!(update.path.as_str(), "/planets/{id}/update");
        assert_eq!(update.method, HttpMethod::Put);
        assert_eq!(update.export, "PUT");
    }

    #[test]
    fn test_compile_before_simplify_keeps_export_level() {
        let router = compile(planets(), path_payload).unwrap();
        let planets = branch(&router, "planets");
        let list = branch(planets, "list");
        assert_eq!(leaf(list, "GET").path.as_str(), "/planets/list");
    }

    #[test]
    fn test_dynamic_segment_only_in_leaf_path() {
        let routes = vec![
            route(&["planets", "{id}", "find.ts"], &[("GET", HttpMethod::Get)]),
            route(&["planets", "{id}", "update.ts"], &[("PUT", HttpMethod::Put)]),
        ];
        let router = compile(routes, path_payload).unwrap();
        let planets = branch(&router, "planets");
        assert!(planets.get("{id}").is_none());
        let find = branch(planets, "find");
        assert_eq!(leaf(find, "GET").path.as_str(), "/planets/{id}/find");
    }

    #[test]
    fn test_single_export_collapses_to_top_level_leaf() {
        let routes = vec![route(&["sse.ts"], &[("GET", HttpMethod::Get)])];
        let router = build_router(routes, path_payload).unwrap();
        assert_eq!(router.len(), 1);
        assert_eq!(leaf(&router, "sse").path.as_str(), "/sse");
    }

    #[test]
    fn test_single_leaf_chain_collapses_completely() {
        let routes = vec![route(&["a", "b", "c.ts"], &[("GET", HttpMethod::Get)])];
        let router = build_router(routes, path_payload).unwrap();
        assert_eq!(leaf(&router, "a").path.as_str(), "/a/b/c");
    }

    #[test]
    fn test_multiple_exports_stay_a_branch() {
        let routes = vec![route(
            &["auth", "me.ts"],
            &[("get", HttpMethod::Get), ("GET", HttpMethod::Get)],
        )];
        let router = build_router(routes, path_payload).unwrap();
        let me = branch(branch(&router, "auth"), "me");
        assert_eq!(me.len(), 2);
    }

    #[test]
    fn test_root_index_exports_sit_at_root() {
        let routes = vec![
            route(&["index.ts"], &[("GET", HttpMethod::Get)]),
            route(&["sse.ts"], &[("GET", HttpMethod::Get)]),
        ];
        let router = build_router(routes, path_payload).unwrap();
        assert_eq!(leaf(&router, "GET").path.as_str(), "/");
        assert_eq!(leaf(&router, "sse").path.as_str(), "/sse");
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let mut routes = planets();
        routes.push(route(
            &["auth", "me.ts"],
            &[("get", HttpMethod::Get), ("GET", HttpMethod::Get)],
        ));
        routes.push(route(&["auth", "signin.ts"], &[("POST", HttpMethod::Post)]));
        routes.push(route(&["x", "y", "z.ts"], &[("GET", HttpMethod::Get)]));

        let once = build_router(routes, path_payload).unwrap();
        let twice = once.clone().simplify();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_leaf_count_matches_export_count() {
        let mut routes = planets();
        routes.push(route(
            &["auth", "me.ts"],
            &[("get", HttpMethod::Get), ("GET", HttpMethod::Get)],
        ));
        let exports: usize = routes.iter().map(|r| r.exports.len()).sum();

        let router = build_router(routes, path_payload).unwrap();
        assert_eq!(router.leaf_count(), exports);
        assert_eq!(router.leaves().len(), exports);
    }

    #[test]
    fn test_modules_without_exports_leave_no_branch() {
        let routes = vec![
            route(&["planets", "README.md"], &[]),
            route(&["sse.ts"], &[("GET", HttpMethod::Get)]),
        ];
        let router = build_router(routes, path_payload).unwrap();
        assert!(router.get("planets").is_none());
    }

    #[test]
    fn test_duplicate_export_is_an_error() {
        let routes = vec![
            route(&["planets", "find.ts"], &[("GET", HttpMethod::Get)]),
            route(&["planets", "{id}", "find.ts"], &[("GET", HttpMethod::Get)]),
        ];
        match compile(routes, path_payload) {
            Err(Error::DuplicateRoute { key, first, second }) => {
                assert_eq!(key, "planets.find.GET");
                assert!(first.contains("/planets/find"));
                assert!(second.contains("/planets/{id}/find"));
            }
            other => panic!("expected duplicate route, got {:?}", other),
        }
    }

    #[test]
    fn test_leaf_where_branch_needed_is_conflict() {
        let routes = vec![
            route(&["planets", "index.ts"], &[("list", HttpMethod::Get)]),
            route(&["planets", "list.ts"], &[("GET", HttpMethod::Get)]),
        ];
        assert!(matches!(
            compile(routes, path_payload),
            Err(Error::RouteConflict { .. })
        ));
    }

    #[test]
    fn test_branch_where_leaf_needed_is_conflict() {
        let routes = vec![
            route(&["planets", "list.ts"], &[("GET", HttpMethod::Get)]),
            route(&["planets", "index.ts"], &[("list", HttpMethod::Get)]),
        ];
        assert!(matches!(
            compile(routes, path_payload),
            Err(Error::RouteConflict { .. })
        ));
    }

    #[test]
    fn test_map_leaves_keeps_shape() {
        let router = build_router(planets(), path_payload).unwrap();
        let mapped = router.clone().map_leaves(&mut |leaf: Leaf<String>| leaf.payload.len());
        assert_eq!(mapped.leaf_count(), router.leaf_count());
        let planets = mapped.get("planets").and_then(RouterNode::as_branch).unwrap();
        let list = planets.get("list").and_then(RouterNode::as_leaf).unwrap();
        assert_eq!(list.payload, "GET /planets/list".len());
    }
}

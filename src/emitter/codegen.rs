use crate::alias::{is_identifier, AliasTable};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::route::Route;
use crate::route_path::RoutePath;
use crate::tree::{Branch, Router, RouterNode};
use log::debug;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Comment written at the top of every generated file.
pub const GENERATED_HEADER: &str = "// This file is auto-generated";

/// One `import { ... } from "..."` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    /// Module specifier as written in the import (e.g. `./routes/planets/list`)
    pub specifier: String,
    /// `(export name, alias)` pairs
    pub bindings: Vec<(String, String)>,
}

impl ImportStatement {
    pub fn render(&self) -> String {
        let bindings = self
            .bindings
            .iter()
            .map(|(export, alias)| format!("{} as {}", export, alias))
            .collect::<Vec<_>>()
            .join(", ");
        format!("import {{ {} }} from \"{}\"", bindings, self.specifier)
    }
}

/// Import statements plus the alias assigned to every `(path, export)` pair.
#[derive(Debug, Default)]
pub struct ImportPlan {
    pub imports: Vec<ImportStatement>,
    aliases: HashMap<(RoutePath, String), String>,
}

impl ImportPlan {
    /// Assigns aliases and import specifiers for every route with at least one export.
    ///
    /// Specifiers are relative to `output_dir`, with the module's file extension replaced by
    /// `import_extension`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::AliasCollision`] if two exports would share an alias.
    pub fn build<H>(
        routes: &[Route<H>],
        output_dir: &Path,
        import_extension: &str,
    ) -> Result<Self> {
        let mut table = AliasTable::new();
        let mut plan = ImportPlan::default();

        for route in routes.iter().filter(|r| !r.exports.is_empty()) {
            let mut bindings = Vec::with_capacity(route.exports.len());
            for export in &route.exports {
                let alias = table.assign(&route.path, &export.name)?;
                plan.aliases
                    .insert((route.path.clone(), export.name.clone()), alias.clone());
                bindings.push((export.name.clone(), alias));
            }
            plan.imports.push(ImportStatement {
                specifier: import_specifier(output_dir, &route.module.file_path(), import_extension),
                bindings,
            });
        }

        debug!(
            "Planned {} imports with {} aliases",
            plan.imports.len(),
            table.len()
        );
        Ok(plan)
    }

    pub fn alias(&self, path: &RoutePath, export_name: &str) -> Option<&str> {
        self.aliases
            .get(&(path.clone(), export_name.to_string()))
            .map(String::as_str)
    }
}

/// Renders the complete generated file.
///
/// The output is the generated-file header, one import per module in `plan`, and
/// `export const router = ...` holding the nested tree. Object keys that are not plain
/// identifiers are single-quoted.
///
/// # Arguments
///
/// * `plan` - Imports and aliases built by [`ImportPlan::build`]
/// * `router` - Simplified tree whose leaf payloads are import aliases
/// * `config` - With `enable_openapi` set, each leaf is written as
///   `alias.route({ path, method })`; otherwise as the bare alias
///
/// # Returns
///
/// Returns the TypeScript source, ending with a newline.
pub fn render_module(plan: &ImportPlan, router: &Router<String>, config: &GeneratorConfig) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    for import in &plan.imports {
        out.push_str(&import.render());
        out.push('\n');
    }
    out.push_str("\nexport const router = ");
    render_branch(router, 0, config.enable_openapi, &mut out);
    out.push('\n');
    out
}

fn render_branch(branch: &Branch<String>, depth: usize, wrap: bool, out: &mut String) {
    if branch.is_empty() {
        out.push_str("{}");
        return;
    }

    let indent = "  ".repeat(depth + 1);
    out.push_str("{\n");
    let count = branch.len();
    for (idx, (key, node)) in branch.children().enumerate() {
        out.push_str(&indent);
        out.push_str(&render_key(key));
        out.push_str(": ");
        match node {
            RouterNode::Leaf(leaf) => {
                if wrap {
                    out.push_str(&format!(
                        "{}.route({{ path: {}, method: {} }})",
                        leaf.payload,
                        quote(leaf.path.as_str()),
                        quote(leaf.method.as_str())
                    ));
                } else {
                    out.push_str(&leaf.payload);
                }
            }
            RouterNode::Branch(child) => render_branch(child, depth + 1, wrap, out),
        }
        if idx + 1 < count {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&"  ".repeat(depth));
    out.push('}');
}

fn render_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Single-quoted string literal.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Import specifier for `module_file` as seen from `output_dir`.
///
/// An empty `output_dir` (the parent of a bare file name such as `router.ts`) means the working
/// directory.
pub fn import_specifier(output_dir: &Path, module_file: &Path, import_extension: &str) -> String {
    let output_dir = if output_dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        output_dir
    };
    let relative = relative_path(output_dir, &module_file.with_extension(""));
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    let prefixed = if joined.starts_with("../") || joined == ".." {
        joined
    } else {
        format!("./{}", joined)
    };
    format!("{}{}", prefixed, import_extension)
}

fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from = normalize(from_dir);
    let to = normalize(to);

    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part.as_os_str());
    }
    result
}

/// Absolute, lexically normalized form of `path` (no `.` or `..` components).
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RouteMeta;
    use crate::method::HttpMethod;
    use crate::route::RouteExport;
    use crate::scanner::DiscoveredModule;
    use crate::tree::build_router;
    use pretty_assertions::assert_eq;

    fn route(segments: &[&str], exports: &[(&str, HttpMethod)]) -> Route<()> {
        let dirs = &segments[..segments.len() - 1];
        let module = DiscoveredModule {
            name: segments.last().unwrap().to_string(),
            directory: Path::new("/app/src/routes").join(dirs.join("/")),
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

    fn render(routes: Vec<Route<()>>, config: &GeneratorConfig) -> String {
        let plan = ImportPlan::build(&routes, Path::new("/app/src"), &config.import_extension)
            .unwrap();
        let router = build_router(routes, |path, export| {
            plan.alias(path, &export.name).unwrap().to_string()
        })
        .unwrap();
        render_module(&plan, &router, config)
    }

    #[test]
    fn test_render_planets_router() {
        let routes = vec![
            route(&["planets", "index.ts"], &[("GET", HttpMethod::Get)]),
            route(&["planets", "list.ts"], &[("GET", HttpMethod::Get)]),
            route(&["planets", "{id}", "update.ts"], &[("PUT", HttpMethod::Put)]),
            route(&["auth", "me-kebab.ts"], &[("get", HttpMethod::Get), ("me", HttpMethod::Post)]),
        ];

        let expected = "\
// This file is auto-generated

import { GET as planets__GET } from \"./routes/planets/index\"
import { GET as planets_list__GET } from \"./routes/planets/list\"
import { PUT as planets_id_update__PUT } from \"./routes/planets/{id}/update\"
import { get as auth_me_kebab__get, me as auth_me_kebab__me } from \"./routes/auth/me-kebab\"

export const router = {
  auth: {
    'me-kebab': {
      get: auth_me_kebab__get.route({ path: '/auth/me-kebab', method: 'GET' }),
      me: auth_me_kebab__me.route({ path: '/auth/me-kebab', method: 'POST' })
    }
  },
  planets: {
    GET: planets__GET.route({ path: '/planets', method: 'GET' }),
    list: planets_list__GET.route({ path: '/planets/list', method: 'GET' }),
    update: planets_id_update__PUT.route({ path: '/planets/{id}/update', method: 'PUT' })
  }
}
";
        assert_eq!(render(routes, &GeneratorConfig::default()), expected);
    }

    #[test]
    fn test_render_without_openapi_wrapping() {
        let routes = vec![route(&["sse.ts"], &[("GET", HttpMethod::Get)])];
        let config = GeneratorConfig {
            enable_openapi: false,
            import_extension: ".js".to_string(),
            ..GeneratorConfig::default()
        };

        let expected = "\
// This file is auto-generated

import { GET as sse__GET } from \"./routes/sse.js\"

export const router = {
  sse: sse__GET
}
";
        assert_eq!(render(routes, &config), expected);
    }

    #[test]
    fn test_render_empty_router() {
        let rendered = render(Vec::new(), &GeneratorConfig::default());
        assert!(rendered.ends_with("export const router = {}\n"));
    }

    #[test]
    fn test_modules_without_exports_get_no_import() {
        let routes = vec![
            route(&["README.md"], &[]),
            route(&["sse.ts"], &[("GET", HttpMethod::Get)]),
        ];
        let plan = ImportPlan::build(&routes, Path::new("/app/src"), "").unwrap();
        assert_eq!(plan.imports.len(), 1);
    }

    #[test]
    fn test_alias_collision_surfaces_from_plan() {
        let routes = vec![
            route(&["auth", "me-kebab.ts"], &[("GET", HttpMethod::Get)]),
            route(&["auth", "me_kebab.ts"], &[("GET", HttpMethod::Get)]),
        ];
        let result = ImportPlan::build(&routes, Path::new("/app/src"), "");
        assert!(matches!(
            result,
            Err(crate::error::Error::AliasCollision { .. })
        ));
    }

    #[test]
    fn test_import_specifier_from_sibling_directory() {
        let specifier = import_specifier(
            Path::new("/app/generated"),
            Path::new("/app/src/routes/planets/list.ts"),
            "",
        );
        assert_eq!(specifier, "../src/routes/planets/list");
    }

    #[test]
    fn test_import_specifier_with_dot_components() {
        let specifier = import_specifier(
            Path::new("/app/src/./gen/.."),
            Path::new("/app/src/routes/sse.ts"),
            ".mjs",
        );
        assert_eq!(specifier, "./routes/sse.mjs");
    }

    #[test]
    fn test_import_specifier_for_bare_output_file_name() {
        let output_dir = Path::new("router.ts").parent().unwrap();
        let specifier = import_specifier(output_dir, Path::new("src/routes/sse.ts"), "");
        assert_eq!(specifier, "./src/routes/sse");

        let specifier = import_specifier(Path::new("."), Path::new("src/routes/sse.ts"), ".js");
        assert_eq!(specifier, "./src/routes/sse.js");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(render_key("me-kebab"), "'me-kebab'");
        assert_eq!(render_key("GET"), "GET");
    }
}

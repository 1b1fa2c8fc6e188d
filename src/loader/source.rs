use super::{Export, ModuleExports, ModuleResolver, RouteMeta};
use crate::error::{Error, Result};
use crate::scanner::DiscoveredModule;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment regex should be valid"));

static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|\s)//[^\n]*").expect("line comment regex should be valid"));

/// `export const NAME`, `export async function NAME`, `export class NAME`, ...
static EXPORT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bexport\s+(?:declare\s+)?(?:async\s+)?(?:const|let|var|function\s*\*?|class)\s+([A-Za-z_$][\w$]*)",
    )
    .expect("export declaration regex should be valid")
});

/// Any top-level binding, exported or not. Bounds the text searched for `.route({ ... })`.
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:declare\s+)?(?:async\s+)?(?:const|let|var|function\s*\*?|class)\s+([A-Za-z_$][\w$]*)",
    )
    .expect("declaration regex should be valid")
});

/// `export { a, b as c }` and `export { a } from "./x"`
static EXPORT_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s*\{([^}]*)\}").expect("export list regex should be valid")
});

static ROUTE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\.route\(\s*\{(.*?)\}\s*\)").expect("route call regex should be valid")
});

static META_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bmethod\s*:\s*['"`]([A-Za-z]+)['"`]"#).expect("method regex should be valid")
});

static META_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bsummary\s*:\s*(?:'([^']*)'|"([^"]*)"|`([^`]*)`)"#)
        .expect("summary regex should be valid")
});

static META_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\btags\s*:\s*\[([^\]]*)\]").expect("tags regex should be valid")
});

/// Resolves route modules by scanning their source text.
///
/// Nothing is evaluated: export names and `.route({ ... })` metadata are read from the
/// TypeScript/JavaScript source. Type-only exports and `export default` are not routable and are
/// skipped.
#[derive(Debug, Default, Clone)]
pub struct SourceResolver;

impl SourceResolver {
    pub fn new() -> Self {
        Self
    }

    /// Extracts exports from source text.
    ///
    /// Metadata for an export is read from the declaration of its local binding, from the
    /// start of that declaration up to the next top-level declaration or export list. Names
    /// exported through `export { local as name }` therefore carry the metadata of `local`.
    pub fn scan_source(content: &str) -> ModuleExports<()> {
        let stripped = strip_comments(content);

        // (start, local name) of every top-level declaration
        let declarations: Vec<(usize, &str)> = DECLARATION
            .captures_iter(&stripped)
            .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())))
            .collect();

        let mut boundaries: Vec<usize> = declarations
            .iter()
            .map(|(start, _)| *start)
            .chain(EXPORT_LIST.find_iter(&stripped).map(|m| m.start()))
            .collect();
        boundaries.sort_unstable();

        // (statement offset, exported name, declaration start)
        let mut found: Vec<(usize, String, Option<usize>)> = Vec::new();

        for caps in EXPORT_DECL.captures_iter(&stripped) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            found.push((whole.start(), name.as_str().to_string(), Some(whole.start())));
        }

        for caps in EXPORT_LIST.captures_iter(&stripped) {
            let (Some(whole), Some(list)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            for (local, exported) in parse_export_list(list.as_str()) {
                let declared = declarations
                    .iter()
                    .find(|(_, name)| *name == local)
                    .map(|(start, _)| *start);
                found.push((whole.start(), exported, declared));
            }
        }

        found.sort_by_key(|(offset, _, _)| *offset);

        let mut exports: ModuleExports<()> = Vec::with_capacity(found.len());
        for (_, name, declared) in found {
            if exports.iter().any(|e| e.name == name) {
                debug!("Skipping repeated export '{}'", name);
                continue;
            }
            let meta = declared
                .map(|start| parse_route_meta(declaration_text(&stripped, &boundaries, start)))
                .unwrap_or_default();
            exports.push(Export::new(name, meta, ()));
        }

        exports
    }
}

impl ModuleResolver for SourceResolver {
    type Handler = ();

    fn resolve(&mut self, module: &DiscoveredModule) -> Result<ModuleExports<()>> {
        let path = module.file_path();
        debug!("Scanning exports of {}", path.display());

        let bytes = fs::read(&path).map_err(|source| Error::Filesystem {
            path: path.clone(),
            source,
        })?;
        let Ok(content) = String::from_utf8(bytes) else {
            warn!(
                "Skipping {}: not UTF-8 text, so not a route module",
                module.relative_path()
            );
            return Ok(Vec::new());
        };

        let exports = Self::scan_source(&content);
        if exports.is_empty() {
            warn!("No exports found in {}", module.relative_path());
        }
        Ok(exports)
    }
}

fn strip_comments(content: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(content, "");
    LINE_COMMENT.replace_all(&without_blocks, "$1").into_owned()
}

/// Text of the declaration starting at `start`, up to the next boundary.
fn declaration_text<'a>(source: &'a str, boundaries: &[usize], start: usize) -> &'a str {
    let end = boundaries
        .iter()
        .copied()
        .find(|boundary| *boundary > start)
        .unwrap_or(source.len());
    &source[start..end]
}

/// Parses the inside of `export { ... }`, returning `(local, exported)` name pairs.
fn parse_export_list(list: &str) -> Vec<(String, String)> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty() && !item.starts_with("type "))
        .filter_map(|item| {
            let (local, exported) = match item.split_once(" as ") {
                Some((local, alias)) => (local.trim(), alias.trim()),
                None => (item, item),
            };
            if exported == "default" {
                None
            } else {
                Some((local.to_string(), exported.to_string()))
            }
        })
        .collect()
}

/// Reads routing metadata from the first `.route({ ... })` call in a declaration.
fn parse_route_meta(declaration: &str) -> RouteMeta {
    let Some(body) = ROUTE_CALL.captures(declaration).and_then(|c| c.get(1)) else {
        return RouteMeta::default();
    };
    let body = body.as_str();

    let method = META_METHOD
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let summary = META_SUMMARY.captures(body).and_then(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .or_else(|| c.get(3))
            .map(|m| m.as_str().to_string())
    });

    let tags = META_TAGS
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|list| {
            list.as_str()
                .split(',')
                .map(|t| t.trim().trim_matches(|c| c == '\'' || c == '"' || c == '`'))
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    RouteMeta {
        method,
        summary,
        tags,
    }
}

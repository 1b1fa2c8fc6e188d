use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File scanner for traversing a routes directory.
///
/// The `RouteScanner` recursively walks the routes directory and turns every regular file it
/// finds into a [`DiscoveredModule`]. Only directories are descended into. Entries are visited
/// in file-name order, so two scans of the same tree always yield the same module order.
///
/// # Example
///
/// ```no_run
/// use file_router_gen::scanner::RouteScanner;
/// use std::path::PathBuf;
///
/// let scanner = RouteScanner::new(PathBuf::from("./src/routes"));
/// let modules = scanner.scan().unwrap();
/// println!("Found {} route modules", modules.len());
/// ```
pub struct RouteScanner {
    root_path: PathBuf,
}

/// A single file found under the routes directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredModule {
    /// File name including its extension (e.g. `find.ts`)
    pub name: String,
    /// Directory that contains the file
    pub directory: PathBuf,
    /// Directory names traversed from the root, followed by the file name
    pub relative_segments: Vec<String>,
}

impl DiscoveredModule {
    /// Full path to the module file on disk.
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Directory segments leading to the file, without the file name.
    pub fn directory_segments(&self) -> &[String] {
        let len = self.relative_segments.len();
        &self.relative_segments[..len.saturating_sub(1)]
    }

    /// Slash-joined path relative to the routes root (e.g. `planets/{id}/find.ts`).
    pub fn relative_path(&self) -> String {
        self.relative_segments.join("/")
    }
}

impl RouteScanner {
    /// Creates a new `RouteScanner` for the specified routes directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Scans the directory tree and collects every regular file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Filesystem`] if the root does not exist, is not a directory, or any
    /// entry below it cannot be read. A failed walk never yields a partial module list.
    pub fn scan(&self) -> Result<Vec<DiscoveredModule>> {
        let metadata = std::fs::metadata(&self.root_path).map_err(|source| Error::Filesystem {
            path: self.root_path.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::Filesystem {
                path: self.root_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "routes path is not a directory",
                ),
            });
        }

        let mut modules = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root_path.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                Error::Filesystem { path, source }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path
                .strip_prefix(&self.root_path)
                .unwrap_or(path);
            let relative_segments: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();

            let module = DiscoveredModule {
                name: entry.file_name().to_string_lossy().into_owned(),
                directory: path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root_path.clone()),
                relative_segments,
            };
            debug!("Discovered route module: {}", module.relative_path());
            modules.push(module);
        }

        Ok(modules)
    }
}

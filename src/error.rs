use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for route discovery, compilation and emission
#[derive(Debug)]
pub enum Error {
    /// The routes directory (or a file inside it) could not be read
    Filesystem { path: PathBuf, source: std::io::Error },
    /// A discovered module could not be loaded by the resolver
    ModuleLoad { module: String, message: String },
    /// The output destination could not be written
    Io { path: PathBuf, source: std::io::Error },
    /// Two exports landed on the same router key
    DuplicateRoute {
        key: String,
        first: String,
        second: String,
    },
    /// A leaf sits where a branch is needed, or the other way round
    RouteConflict { key: String, path: String },
    /// Two (path, export) pairs produced the same generated identifier
    AliasCollision {
        alias: String,
        first: String,
        second: String,
    },
    Manifest { path: PathBuf, message: String },
    Config(String),
    Serialization(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Filesystem { path, source } => {
                write!(f, "filesystem error at {}: {}", path.display(), source)
            }
            Error::ModuleLoad { module, message } => {
                write!(f, "failed to load module {}: {}", module, message)
            }
            Error::Io { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Error::DuplicateRoute { key, first, second } => write!(
                f,
                "duplicate route key '{}': defined by {} and {}",
                key, first, second
            ),
            Error::RouteConflict { key, path } => write!(
                f,
                "route key '{}' from {} is used both as a route and as a group",
                key, path
            ),
            Error::AliasCollision {
                alias,
                first,
                second,
            } => write!(
                f,
                "generated alias '{}' is produced by both {} and {}",
                alias, first, second
            ),
            Error::Manifest { path, message } => {
                write!(f, "invalid manifest {}: {}", path.display(), message)
            }
            Error::Config(msg) => write!(f, "invalid configuration: {}", msg),
            Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Filesystem { source, .. } | Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}

//! Sources a namespace can be loaded from

use serde_json::{Map, Value};
use thiserror::Error;

/// Namespace loading errors
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("Config file {path} not found")]
    NotFound { path: String },

    #[error("Failed to parse {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("Unsupported config format: {path}")]
    UnsupportedFormat { path: String },

    #[error("{source_name} does not contain a top-level mapping")]
    NotAMapping { source_name: String },

    #[error("Failed to read {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
}

/// Anything that yields a mapping to merge into the namespace
pub trait NamespaceSource: Send + Sync {
    /// Human-readable origin, used in logs and errors
    fn describe(&self) -> String;

    fn load(&self) -> Result<Map<String, Value>, NamespaceError>;
}

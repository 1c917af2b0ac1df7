//! Configuration namespace - shared key/value settings and plugin data

mod entity;
mod source;

pub use entity::{ConfigNamespace, PLUGIN_PREFIX};
pub use source::{NamespaceError, NamespaceSource};

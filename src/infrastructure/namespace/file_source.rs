//! YAML, JSON and TOML files as namespace sources

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::domain::namespace::{NamespaceError, NamespaceSource};

/// A config file whose format is chosen by extension
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Json,
    Toml,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Option<FileFormat> {
        let extension = self.path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yml" | "yaml" => Some(FileFormat::Yaml),
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }

    fn parse(&self, format: FileFormat, content: &str) -> Result<Value, NamespaceError> {
        let parsed = match format {
            FileFormat::Yaml => serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string()),
            FileFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str::<Value>(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| NamespaceError::Parse {
            source_name: self.describe(),
            message,
        })
    }
}

impl NamespaceSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Map<String, Value>, NamespaceError> {
        if !self.path.exists() {
            return Err(NamespaceError::NotFound {
                path: self.describe(),
            });
        }

        let format = self.format().ok_or_else(|| NamespaceError::UnsupportedFormat {
            path: self.describe(),
        })?;

        let content = std::fs::read_to_string(&self.path).map_err(|error| NamespaceError::Io {
            path: self.describe(),
            error,
        })?;

        match self.parse(format, &content)? {
            Value::Object(map) => Ok(map),
            // An empty YAML document
            Value::Null => Ok(Map::new()),
            _ => Err(NamespaceError::NotAMapping {
                source_name: self.describe(),
            }),
        }
    }
}

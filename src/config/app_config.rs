use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{AbortPolicy, SequencerConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub sequencer: SequencerSettings,
    pub namespace: NamespaceSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SequencerSettings {
    pub abort_policy: AbortPolicy,
    /// Default per-attempt time limit; unset means no limit
    pub attempt_timeout_ms: Option<u64>,
    /// Sequence run when none is named on the command line
    pub default_sequence: Option<String>,
}

/// Files merged, in order, into the configuration namespace
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamespaceSettings {
    pub files: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl SequencerSettings {
    pub fn to_sequencer_config(&self) -> SequencerConfig {
        SequencerConfig {
            abort_policy: self.abort_policy,
            attempt_timeout: self.attempt_timeout_ms.map(Duration::from_millis),
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `FIXTURE__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_dir("config")
    }

    /// Load `default` then `local` from `dir`; either may be absent
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let dir = dir.as_ref();
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// Load from an explicit file, still honouring environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(true))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("FIXTURE")
            .separator("__")
            .try_parsing(true)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.sequencer.abort_policy, AbortPolicy::Never);
        assert!(config.sequencer.to_sequencer_config().attempt_timeout.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[logging]
format = "json"

[sequencer]
abort_policy = "on_error"
attempt_timeout_ms = 1500
default_sequence = "fails"

[namespace]
files = ["station.yml"]
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.sequencer.default_sequence.as_deref(), Some("fails"));
        assert_eq!(config.namespace.files, vec!["station.yml"]);

        let sequencer = config.sequencer.to_sequencer_config();
        assert_eq!(sequencer.abort_policy, AbortPolicy::OnError);
        assert_eq!(sequencer.attempt_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_load_dir_layers_local_over_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[sequencer]\nabort_policy = \"on_error\"\ndefault_sequence = \"passes\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("local.toml"),
            "[sequencer]\ndefault_sequence = \"fails\"\n",
        )
        .unwrap();

        let config = AppConfig::load_dir(dir.path()).unwrap();
        assert_eq!(config.sequencer.abort_policy, AbortPolicy::OnError);
        assert_eq!(config.sequencer.default_sequence.as_deref(), Some("fails"));
    }

    #[test]
    fn test_load_dir_without_files_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_dir(dir.path()).unwrap();
        assert_eq!(config.sequencer.abort_policy, AbortPolicy::Never);
    }

    #[test]
    fn test_load_dir_rejects_unknown_abort_policy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[sequencer]\nabort_policy = \"on_eror\"\n",
        )
        .unwrap();

        let err = AppConfig::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("on_eror"));
    }
}

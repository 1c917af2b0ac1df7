//! Writes sequence results as pretty-printed JSON files

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::{DomainError, ReportSink, SequenceResult};

#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportSink for JsonReportWriter {
    async fn publish(&self, result: &SequenceResult) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| DomainError::report(format!("Failed to serialize result: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::report(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            DomainError::report(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        info!(path = %self.path.display(), run_id = %result.run_id(), "Report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::domain::{Sequence, Sequencer, TestCase, TestContext};
    use crate::infrastructure::interaction::ScriptedTransport;

    struct Logs;

    #[async_trait]
    impl TestCase for Logs {
        fn description(&self) -> Option<&str> {
            Some("Multiple passed results")
        }

        async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            ctx.checks.log_value("Result 1", "Result 1");
            ctx.checks.record_fail("Fail False", Some("true".into()), Some("false".into()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");

        let sequencer = Sequencer::new(Arc::new(ScriptedTransport::new()));
        let result = sequencer.run(Sequence::new("fails").with_case(Logs)).await;

        JsonReportWriter::new(&path).publish(&result).await.unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["outcome"], "FAIL");
        assert_eq!(written["sequence"], "fails");
        assert_eq!(written["cases"][0]["info"]["description"], "Multiple passed results");
        assert_eq!(written["cases"][0]["attempts"][0]["checks"][1]["kind"], "fail");
    }
}

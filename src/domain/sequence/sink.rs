//! Report sinks that consume finished sequence results

use async_trait::async_trait;

use super::SequenceResult;
use crate::domain::DomainError;

/// Persists or forwards a finished sequence result
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, result: &SequenceResult) -> Result<(), DomainError>;
}

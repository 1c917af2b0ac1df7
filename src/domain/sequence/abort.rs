//! Early termination of a sequence

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::test_case::Outcome;

/// Returned from a hook to stop the sequence after the current case.
///
/// The case itself ends in ERROR and its tear down still runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Sequence aborted: {reason}")]
pub struct SequenceAbort {
    reason: String,
}

impl SequenceAbort {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Whether a case outcome stops the remaining cases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortPolicy {
    /// Every case runs
    #[default]
    Never,
    OnError,
    OnFailOrError,
}

impl AbortPolicy {
    pub fn should_abort(&self, outcome: Outcome) -> bool {
        match self {
            AbortPolicy::Never => false,
            AbortPolicy::OnError => outcome == Outcome::Error,
            AbortPolicy::OnFailOrError => outcome != Outcome::Pass,
        }
    }
}

impl std::fmt::Display for AbortPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortPolicy::Never => write!(f, "never"),
            AbortPolicy::OnError => write!(f, "on_error"),
            AbortPolicy::OnFailOrError => write!(f, "on_fail_or_error"),
        }
    }
}

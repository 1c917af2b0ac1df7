//! Attempt records and outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::check::CheckResult;

/// Outcome of an attempt, a case or a whole sequence.
///
/// Ordered by severity so the aggregate of several outcomes is their maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

impl Outcome {
    /// PASS for an empty iterator
    pub fn aggregate(outcomes: impl IntoIterator<Item = Outcome>) -> Outcome {
        outcomes.into_iter().max().unwrap_or(Outcome::Pass)
    }

    pub fn is_pass(&self) -> bool {
        *self == Outcome::Pass
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Fail => write!(f, "FAIL"),
            Outcome::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of one execution attempt of a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    attempt_number: u32,
    checks: Vec<CheckResult>,
    outcome: Outcome,
    /// Present only when the outcome is ERROR
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
    started_at: DateTime<Utc>,
    duration_ms: u64,
}

impl AttemptRecord {
    /// Attempt whose hooks all returned normally: FAIL if any check failed
    pub fn completed(
        attempt_number: u32,
        checks: Vec<CheckResult>,
        started_at: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        let outcome = if checks.iter().any(CheckResult::is_fail) {
            Outcome::Fail
        } else {
            Outcome::Pass
        };

        Self {
            attempt_number,
            checks,
            outcome,
            error_detail: None,
            started_at,
            duration_ms,
        }
    }

    /// Attempt that an error escaped from; checks recorded before it are kept
    pub fn errored(
        attempt_number: u32,
        checks: Vec<CheckResult>,
        error_detail: impl Into<String>,
        started_at: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        Self {
            attempt_number,
            checks,
            outcome: Outcome::Error,
            error_detail: Some(error_detail.into()),
            started_at,
            duration_ms,
        }
    }

    // Getters
    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.is_fail()).count()
    }
}

//! Recorded check outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CheckValue;

/// Kind of a recorded check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Pass,
    Fail,
    LoggedValue,
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckKind::Pass => write!(f, "pass"),
            CheckKind::Fail => write!(f, "fail"),
            CheckKind::LoggedValue => write!(f, "logged_value"),
        }
    }
}

/// One assertion event recorded within an attempt.
///
/// Fields are private: once recorded, a result is read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Zero-based position within the attempt
    position: usize,
    kind: CheckKind,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<CheckValue>,
    recorded_at: DateTime<Utc>,
}

impl CheckResult {
    pub(crate) fn passed(position: usize, description: impl Into<String>) -> Self {
        Self {
            position,
            kind: CheckKind::Pass,
            description: description.into(),
            expected: None,
            actual: None,
            value: None,
            recorded_at: Utc::now(),
        }
    }

    pub(crate) fn failed(
        position: usize,
        description: impl Into<String>,
        expected: Option<String>,
        actual: Option<String>,
    ) -> Self {
        Self {
            position,
            kind: CheckKind::Fail,
            description: description.into(),
            expected,
            actual,
            value: None,
            recorded_at: Utc::now(),
        }
    }

    pub(crate) fn logged(position: usize, description: impl Into<String>, value: CheckValue) -> Self {
        Self {
            position,
            kind: CheckKind::LoggedValue,
            description: description.into(),
            expected: None,
            actual: None,
            value: Some(value),
            recorded_at: Utc::now(),
        }
    }

    // Getters
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    pub fn actual(&self) -> Option<&str> {
        self.actual.as_deref()
    }

    pub fn value(&self) -> Option<&CheckValue> {
        self.value.as_ref()
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn is_fail(&self) -> bool {
        self.kind == CheckKind::Fail
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CheckKind::Pass => write!(f, "PASS: {}", self.description),
            CheckKind::Fail => {
                write!(f, "FAIL: {}", self.description)?;
                match (&self.expected, &self.actual) {
                    (Some(expected), Some(actual)) => {
                        write!(f, " (expected {}, got {})", expected, actual)
                    }
                    (Some(expected), None) => write!(f, " (expected {})", expected),
                    (None, Some(actual)) => write!(f, " (got {})", actual),
                    (None, None) => Ok(()),
                }
            }
            CheckKind::LoggedValue => match &self.value {
                Some(value) => write!(f, "LOG: {} = {}", self.description, value),
                None => write!(f, "LOG: {}", self.description),
            },
        }
    }
}

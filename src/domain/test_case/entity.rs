//! Test case authoring surface and related types

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CaseContext, TestContext};

/// What happens after a failed or errored attempt when attempts remain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
    /// Start the next attempt immediately
    #[default]
    Auto,
    /// Ask the operator before every retry; declining ends the case
    PromptBeforeRetry,
}

impl std::fmt::Display for RetryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryMode::Auto => write!(f, "auto"),
            RetryMode::PromptBeforeRetry => write!(f, "prompt_before_retry"),
        }
    }
}

/// Attempt budget and retry behaviour for one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    max_attempts: u32,
    mode: RetryMode,
}

impl RetryPolicy {
    /// `max_attempts` below 1 is raised to 1
    pub fn new(max_attempts: u32, mode: RetryMode) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            mode,
        }
    }

    pub fn attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, RetryMode::Auto)
    }

    pub fn with_mode(mut self, mode: RetryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn mode(&self) -> RetryMode {
        self.mode
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, RetryMode::Auto)
    }
}

/// A unit of test logic driven through enter, attempts and tear down.
///
/// Only [`TestCase::test`] is mandatory. Case-level hooks (`enter`,
/// `tear_down`) run once per case; attempt-level hooks (`set_up`, `clean_up`)
/// bracket every attempt. Any error escaping a hook classifies the attempt or
/// case as ERROR; assertion mismatches are recorded through
/// [`TestContext::checks`] instead.
#[async_trait]
pub trait TestCase: Send {
    /// Short label. Falls back to the first line of [`TestCase::documentation`].
    fn description(&self) -> Option<&str> {
        None
    }

    /// Longer explanation. Falls back to the documentation text.
    fn long_description(&self) -> Option<&str> {
        None
    }

    /// Free-form documentation of the case
    fn documentation(&self) -> &str {
        ""
    }

    /// Read after `enter` returns, so `enter` may adjust it
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    /// Per-attempt time limit; `None` defers to the sequencer default
    fn attempt_timeout(&self) -> Option<Duration> {
        None
    }

    /// Runs once before the first attempt
    async fn enter(&mut self, _ctx: &mut CaseContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs before every attempt
    async fn set_up(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// The test body
    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()>;

    /// Runs after every attempt, whatever it concluded
    async fn clean_up(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs exactly once per case, after the last attempt or a failed `enter`
    async fn tear_down(&mut self, _ctx: &mut CaseContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Resolved, reportable metadata of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInfo {
    /// Authoring-order position within the sequence
    pub index: usize,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

impl CaseInfo {
    pub fn from_case(index: usize, case: &dyn TestCase) -> Self {
        let doc = case.documentation().trim();
        let mut lines = doc.lines().map(str::trim).filter(|l| !l.is_empty());
        let first_line = lines.next();

        let (description, doc_long) = match case.description() {
            Some(description) => (description.to_string(), non_empty(doc)),
            None => {
                let rest = lines.collect::<Vec<_>>().join("\n");
                (
                    first_line
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Test {}", index + 1)),
                    non_empty(&rest),
                )
            }
        };

        let long_description = case
            .long_description()
            .map(str::to_string)
            .or(doc_long);

        Self {
            index,
            description,
            long_description,
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Documented;

    #[async_trait]
    impl TestCase for Documented {
        fn documentation(&self) -> &str {
            "
            Comparison Value Error
            Raises a value error during a comparison
            "
        }

        async fn test(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct Described;

    #[async_trait]
    impl TestCase for Described {
        fn description(&self) -> Option<&str> {
            Some("Red Button")
        }

        fn documentation(&self) -> &str {
            "Asks the user to push the red button"
        }

        async fn test(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct Bare;

    #[async_trait]
    impl TestCase for Bare {
        async fn test(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_description_falls_back_to_documentation() {
        let info = CaseInfo::from_case(0, &Documented);
        assert_eq!(info.description, "Comparison Value Error");
        assert_eq!(
            info.long_description.as_deref(),
            Some("Raises a value error during a comparison")
        );
    }

    #[test]
    fn test_explicit_description_keeps_full_documentation() {
        let info = CaseInfo::from_case(3, &Described);
        assert_eq!(info.description, "Red Button");
        assert_eq!(
            info.long_description.as_deref(),
            Some("Asks the user to push the red button")
        );
    }

    #[test]
    fn test_undocumented_case_gets_positional_label() {
        let info = CaseInfo::from_case(4, &Bare);
        assert_eq!(info.description, "Test 5");
        assert!(info.long_description.is_none());
    }

    #[test]
    fn test_retry_policy_floor() {
        assert_eq!(RetryPolicy::attempts(0).max_attempts(), 1);
        assert_eq!(RetryPolicy::default().mode(), RetryMode::Auto);
        assert_eq!(
            RetryPolicy::attempts(5)
                .with_mode(RetryMode::PromptBeforeRetry)
                .mode(),
            RetryMode::PromptBeforeRetry
        );
    }
}

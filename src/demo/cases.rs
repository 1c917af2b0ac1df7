//! Demonstration test cases

use anyhow::{bail, Context};
use async_trait::async_trait;

use crate::domain::{
    render_template, CaseContext, RetryMode, RetryPolicy, TemplateArgs, TestCase, TestContext,
};

/// Shared-state key toggled after every attempt of the alternating cases
pub const SHOULD_PASS_KEY: &str = "should_i_pass";

pub struct RedButton;

#[async_trait]
impl TestCase for RedButton {
    fn description(&self) -> Option<&str> {
        Some("Red Button")
    }

    fn documentation(&self) -> &str {
        "Asks the operator to push the red button"
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.ui.confirm("Please push the red button").await?;
        ctx.checks.check_passes("Red button pushed");
        Ok(())
    }
}

pub struct ReturnTrue;

#[async_trait]
impl TestCase for ReturnTrue {
    fn description(&self) -> Option<&str> {
        Some("Return True")
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.checks.check_equal("True is true", true, true);
        Ok(())
    }
}

pub struct ReturnFalse;

#[async_trait]
impl TestCase for ReturnFalse {
    fn description(&self) -> Option<&str> {
        Some("Fail False")
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.checks.check_equal("False is true", false, true);
        Ok(())
    }
}

pub struct RaiseValueError;

#[async_trait]
impl TestCase for RaiseValueError {
    fn description(&self) -> Option<&str> {
        Some("Raise Value Error")
    }

    fn documentation(&self) -> &str {
        "Raises an error before making a comparison"
    }

    async fn test(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        bail!("Things be broken")
    }
}

/// Takes its description from the documentation's first line
pub struct RaiseValueErrorInComparison;

#[async_trait]
impl TestCase for RaiseValueErrorInComparison {
    fn documentation(&self) -> &str {
        "Comparison Value Error\nRaises an error during a comparison"
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.checks.check_in_range("HI in range", "HI", 5.0, 10.0)?;
        Ok(())
    }
}

pub struct GetUserInput {
    policy: RetryPolicy,
}

impl GetUserInput {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::attempts(3),
        }
    }
}

impl Default for GetUserInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TestCase for GetUserInput {
    fn description(&self) -> Option<&str> {
        Some("Get Input from User")
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn enter(&mut self, _ctx: &mut CaseContext<'_>) -> anyhow::Result<()> {
        self.policy = self.policy.with_mode(RetryMode::PromptBeforeRetry);
        Ok(())
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        let answer = ctx.ui.request_input("What is 1 + 1?").await?;
        let answer: i64 = answer
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not a whole number", answer.trim()))?;
        ctx.checks.check_equal("1 + 1", answer, 2);
        Ok(())
    }
}

pub struct MultiplePassedTestResults;

#[async_trait]
impl TestCase for MultiplePassedTestResults {
    fn description(&self) -> Option<&str> {
        Some("Multiple passed results")
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.checks.log_value("Result 1", "Result 1");
        ctx.checks.log_value("Result 2", "Result 2");
        Ok(())
    }

    async fn tear_down(&mut self, ctx: &mut CaseContext<'_>) -> anyhow::Result<()> {
        ctx.ui.notify("Tearing down this case").await;
        Ok(())
    }
}

/// Parameters bound at construction, rendered into logged values
pub struct ParameterisedTest {
    frequency: u32,
    time: u32,
    overridden: String,
}

impl ParameterisedTest {
    /// Shared by every instance
    const TYPE_PARAM: &'static str = "Type Param";

    pub fn new(frequency: u32, time: u32) -> Self {
        Self {
            frequency,
            time,
            overridden: "Overridden".to_string(),
        }
    }
}

#[async_trait]
impl TestCase for ParameterisedTest {
    fn description(&self) -> Option<&str> {
        Some("Parameterised Test Function")
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.checks.check_equal(
            "Checking that parameter is overridden",
            self.overridden.as_str(),
            "Overridden",
        );
        ctx.checks
            .check_equal("Type parameter", Self::TYPE_PARAM, "Type Param");

        let args = TemplateArgs::new()
            .named("frequency", self.frequency)
            .named("time", self.time);

        ctx.checks
            .log_value("Frequency", render_template("Frequency {frequency}", &args)?);
        ctx.checks.log_value("Time", render_template("Time {time}", &args)?);
        ctx.ui.notify("This won't be in the report").await;
        ctx.checks.check_passes("This will be in the report");
        Ok(())
    }
}

/// Passes only when the shared flag is set; the flag flips after every attempt
pub struct PassEverySecondAttempt;

#[async_trait]
impl TestCase for PassEverySecondAttempt {
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::attempts(5)
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        let should_pass = ctx.shared.flag(SHOULD_PASS_KEY);
        ctx.checks
            .check_equal("Checking state of should_i_pass", should_pass, true);
        Ok(())
    }

    async fn clean_up(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.shared.toggle(SHOULD_PASS_KEY);
        Ok(())
    }
}

/// Like [`PassEverySecondAttempt`] but raises on the failing attempts
pub struct PassEverySecondAttemptThrowOthers;

#[async_trait]
impl TestCase for PassEverySecondAttemptThrowOthers {
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::attempts(5)
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        let should_pass = ctx.shared.flag(SHOULD_PASS_KEY);
        ctx.checks
            .check_equal("Checking state of should_i_pass", should_pass, true);
        if !should_pass {
            bail!("should_i_pass is false");
        }
        Ok(())
    }

    async fn clean_up(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.shared.toggle(SHOULD_PASS_KEY);
        Ok(())
    }
}

pub struct MultipleLineInstruction;

#[async_trait]
impl TestCase for MultipleLineInstruction {
    fn documentation(&self) -> &str {
        "Multiple line instruction"
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        for line in ["Line 1", "Line 2", "Line 3", "Line 4"] {
            ctx.ui.notify(line).await;
        }
        ctx.ui.confirm("Line 5").await?;
        Ok(())
    }
}

pub struct PostSequenceInfo;

#[async_trait]
impl TestCase for PostSequenceInfo {
    fn description(&self) -> Option<&str> {
        Some("Post sequence info")
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.ui
            .post_sequence_always("Post sequence info is here and should always be here");
        ctx.ui
            .post_sequence_on_pass("Post sequence info that should only show if sequence passes");
        ctx.ui
            .post_sequence_on_fail("Post sequence info that should only show if sequence fails");
        Ok(())
    }
}

pub struct CheckPostSequenceInfo;

#[async_trait]
impl TestCase for CheckPostSequenceInfo {
    fn description(&self) -> Option<&str> {
        Some("Check post sequence info")
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        ctx.ui
            .notify("When the sequence finishes, check the following:")
            .await;
        ctx.ui
            .notify("Post sequence info is here and should always be here")
            .await;
        ctx.ui
            .confirm("Post sequence info that should only show if sequence x where x is passes or fails")
            .await?;
        Ok(())
    }
}

/// Reports station details from the configuration namespace
pub struct StationInfo;

#[async_trait]
impl TestCase for StationInfo {
    fn description(&self) -> Option<&str> {
        Some("Station Info")
    }

    async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        let mut args = TemplateArgs::new();
        if let Some(station) = ctx.config.get_str("station") {
            args = args.named("station", station);
        }

        let banner = render_template("Testing on station {station}", &args)?;
        ctx.ui.notify(&banner).await;
        ctx.checks.log_value("Station", banner);
        ctx.checks
            .log_value("Plugins configured", ctx.config.plugins().len() as i64);
        Ok(())
    }
}

//! Test case lifecycle - enter, retried attempts, guaranteed tear down

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use chrono::Utc;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::{AttemptRecord, CaseContext, CaseInfo, Outcome, RetryMode, SharedState, TestCase, TestContext};
use crate::domain::check::CheckRecorder;
use crate::domain::interaction::InteractionPort;
use crate::domain::namespace::ConfigNamespace;
use crate::domain::sequence::SequenceAbort;

/// States a case moves through, strictly in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Created,
    Entering,
    Executing,
    TearingDown,
    Complete,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Created => write!(f, "created"),
            LifecycleState::Entering => write!(f, "entering"),
            LifecycleState::Executing => write!(f, "executing"),
            LifecycleState::TearingDown => write!(f, "tearing_down"),
            LifecycleState::Complete => write!(f, "complete"),
        }
    }
}

/// Final, immutable result of one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    info: CaseInfo,
    state: LifecycleState,
    outcome: Outcome,
    attempts: Vec<AttemptRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    setup_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    teardown_error: Option<String>,
    /// A hook asked for the rest of the sequence to be skipped
    abort_requested: bool,
}

impl CaseResult {
    // Getters
    pub fn info(&self) -> &CaseInfo {
        &self.info
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    /// `None` only when `enter` failed and no attempt ran
    pub fn final_attempt(&self) -> Option<&AttemptRecord> {
        self.attempts.last()
    }

    pub fn setup_error(&self) -> Option<&str> {
        self.setup_error.as_deref()
    }

    pub fn teardown_error(&self) -> Option<&str> {
        self.teardown_error.as_deref()
    }

    pub fn abort_requested(&self) -> bool {
        self.abort_requested
    }

    /// The detail behind an ERROR outcome, case-level hooks first
    pub fn error_detail(&self) -> Option<&str> {
        self.teardown_error()
            .or(self.setup_error())
            .or_else(|| self.final_attempt().and_then(AttemptRecord::error_detail))
    }
}

/// Drives single cases through the lifecycle against the resources of one
/// sequence run
pub struct CaseRunner<'a> {
    ui: &'a mut InteractionPort,
    shared: &'a mut SharedState,
    config: &'a ConfigNamespace,
    default_timeout: Option<Duration>,
}

impl<'a> CaseRunner<'a> {
    pub fn new(
        ui: &'a mut InteractionPort,
        shared: &'a mut SharedState,
        config: &'a ConfigNamespace,
    ) -> Self {
        Self {
            ui,
            shared,
            config,
            default_timeout: None,
        }
    }

    /// Time limit for attempts of cases that do not set their own
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Run `case` to completion. Never fails: every escaped error is
    /// classified into the returned result.
    pub async fn run(&mut self, index: usize, case: &mut dyn TestCase) -> CaseResult {
        let info = CaseInfo::from_case(index, case);
        let span = info_span!("case", index, description = %info.description);

        self.drive(info, case).instrument(span).await
    }

    async fn drive(&mut self, info: CaseInfo, case: &mut dyn TestCase) -> CaseResult {
        let mut state = LifecycleState::Created;
        let mut attempts = Vec::new();
        let mut abort_requested = false;

        transition(&mut state, LifecycleState::Entering);
        let setup_error = match guarded("enter", case.enter(&mut self.case_context())).await {
            Ok(()) => None,
            Err(e) => {
                abort_requested |= is_abort(&e);
                error!(error = %format!("{:#}", e), "enter hook failed");
                Some(format!("{:#}", e))
            }
        };

        if setup_error.is_none() {
            transition(&mut state, LifecycleState::Executing);
            let policy = case.retry_policy();
            let timeout = case.attempt_timeout().or(self.default_timeout);

            for attempt_number in 1..=policy.max_attempts() {
                let (record, abort) = self.run_attempt(case, attempt_number, timeout).await;
                let outcome = record.outcome();
                attempts.push(record);
                abort_requested |= abort;

                if outcome.is_pass() || abort || attempt_number == policy.max_attempts() {
                    break;
                }

                match policy.mode() {
                    RetryMode::Auto => {
                        warn!(attempt = attempt_number, %outcome, "Retrying automatically");
                    }
                    RetryMode::PromptBeforeRetry => {
                        let prompt = format!(
                            "'{}' attempt {} of {} ended {}. Retry?",
                            info.description,
                            attempt_number,
                            policy.max_attempts(),
                            outcome
                        );
                        if !self.ui.gate_retry(&prompt).await {
                            info!(attempt = attempt_number, "Operator declined retry");
                            break;
                        }
                        warn!(attempt = attempt_number, %outcome, "Retrying after operator confirmation");
                    }
                }
            }
        }

        transition(&mut state, LifecycleState::TearingDown);
        let teardown_error = match guarded("tear_down", case.tear_down(&mut self.case_context())).await {
            Ok(()) => None,
            Err(e) => {
                abort_requested |= is_abort(&e);
                warn!(error = %format!("{:#}", e), "tear_down hook failed, case escalated to ERROR");
                Some(format!("{:#}", e))
            }
        };

        transition(&mut state, LifecycleState::Complete);
        let outcome = if setup_error.is_some() || teardown_error.is_some() {
            Outcome::Error
        } else {
            attempts
                .last()
                .map(AttemptRecord::outcome)
                .unwrap_or(Outcome::Error)
        };

        info!(%outcome, attempts = attempts.len(), "Case complete");

        CaseResult {
            info,
            state,
            outcome,
            attempts,
            setup_error,
            teardown_error,
            abort_requested,
        }
    }

    async fn run_attempt(
        &mut self,
        case: &mut dyn TestCase,
        attempt_number: u32,
        timeout: Option<Duration>,
    ) -> (AttemptRecord, bool) {
        let mut recorder = CheckRecorder::new();
        let started_at = Utc::now();
        let clock = Instant::now();

        let (body, cleanup) = {
            let mut ctx = TestContext::new(
                &mut recorder,
                &mut *self.ui,
                &mut *self.shared,
                self.config,
                attempt_number,
            );

            let body = match guarded("set_up", case.set_up(&mut ctx)).await {
                Ok(()) => run_body(case, &mut ctx, timeout).await,
                Err(e) => Err(e.context("set_up hook failed")),
            };
            let cleanup = guarded("clean_up", case.clean_up(&mut ctx))
                .await
                .map_err(|e| e.context("clean_up hook failed"));

            (body, cleanup)
        };

        let duration_ms = clock.elapsed().as_millis() as u64;
        let checks = recorder.into_results();

        // The body's error wins over a clean-up error
        let escaped = body.err().or(cleanup.err());
        let (record, abort) = match escaped {
            Some(e) => {
                error!(attempt = attempt_number, error = %format!("{:#}", e), "Attempt raised");
                let abort = is_abort(&e);
                (
                    AttemptRecord::errored(attempt_number, checks, format!("{:#}", e), started_at, duration_ms),
                    abort,
                )
            }
            None => (
                AttemptRecord::completed(attempt_number, checks, started_at, duration_ms),
                false,
            ),
        };

        info!(
            attempt = attempt_number,
            outcome = %record.outcome(),
            checks = record.checks().len(),
            duration_ms,
            "Attempt finished"
        );

        (record, abort)
    }

    fn case_context(&mut self) -> CaseContext<'_> {
        CaseContext {
            ui: &mut *self.ui,
            shared: &mut *self.shared,
            config: self.config,
        }
    }
}

async fn run_body(
    case: &mut dyn TestCase,
    ctx: &mut TestContext<'_>,
    timeout: Option<Duration>,
) -> anyhow::Result<()> {
    let body = guarded("test", case.test(ctx));
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, body).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!("attempt timed out after {} ms", limit.as_millis())),
        },
        None => body.await,
    }
}

/// Await a hook, turning a panic inside it into an error
async fn guarded<F>(hook: &str, future: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(anyhow!("{} hook panicked: {}", hook, panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

fn transition(state: &mut LifecycleState, next: LifecycleState) {
    debug!(from = %state, to = %next, "Lifecycle transition");
    *state = next;
}

fn is_abort(error: &anyhow::Error) -> bool {
    error.downcast_ref::<SequenceAbort>().is_some()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::interaction::MockInteractionTransport;
    use crate::domain::test_case::RetryPolicy;

    fn quiet_transport() -> MockInteractionTransport {
        let mut transport = MockInteractionTransport::new();
        transport.expect_notify().returning(|_| Ok(()));
        transport
    }

    async fn run_case(case: &mut dyn TestCase, transport: MockInteractionTransport) -> CaseResult {
        let mut ui = InteractionPort::new(Arc::new(transport));
        let mut shared = SharedState::new();
        let config = ConfigNamespace::new();
        CaseRunner::new(&mut ui, &mut shared, &config).run(0, case).await
    }

    /// Configurable case that counts hook invocations
    #[derive(Default)]
    struct Counting {
        attempts: u32,
        mode: RetryMode,
        fail_until: u32,
        raise_until: u32,
        fail_enter: bool,
        fail_tear_down: bool,
        fail_clean_up: bool,
        panic_in_body: bool,
        teardowns: u32,
        cleanups: u32,
        bodies: u32,
    }

    #[async_trait]
    impl TestCase for Counting {
        fn description(&self) -> Option<&str> {
            Some("counting case")
        }

        fn retry_policy(&self) -> RetryPolicy {
            RetryPolicy::new(self.attempts, self.mode)
        }

        async fn enter(&mut self, _ctx: &mut CaseContext<'_>) -> anyhow::Result<()> {
            if self.fail_enter {
                anyhow::bail!("fixture not connected");
            }
            Ok(())
        }

        async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            self.bodies += 1;
            if self.panic_in_body {
                let readings: Vec<f64> = Vec::new();
                ctx.checks.log_value("first reading", readings[0]);
            }
            if ctx.attempt() <= self.raise_until {
                anyhow::bail!("Things be broken");
            }
            if ctx.attempt() <= self.fail_until {
                ctx.checks.record_fail("expected 2, got 3", Some("2".into()), Some("3".into()));
            } else {
                ctx.checks.record_pass("Red Button Pushed");
            }
            Ok(())
        }

        async fn clean_up(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            self.cleanups += 1;
            if self.fail_clean_up {
                anyhow::bail!("test lead still attached");
            }
            Ok(())
        }

        async fn tear_down(&mut self, _ctx: &mut CaseContext<'_>) -> anyhow::Result<()> {
            self.teardowns += 1;
            if self.fail_tear_down {
                anyhow::bail!("relay stuck");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_single_pass() {
        let mut case = Counting {
            attempts: 1,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Pass);
        assert_eq!(result.attempts().len(), 1);
        assert_eq!(result.state(), LifecycleState::Complete);
        assert_eq!(case.teardowns, 1);
    }

    #[tokio::test]
    async fn test_first_pass_stops_retrying() {
        let mut case = Counting {
            attempts: 5,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.attempts().len(), 1);
        assert_eq!(case.bodies, 1);
    }

    #[tokio::test]
    async fn test_single_fail() {
        let mut case = Counting {
            attempts: 1,
            fail_until: 1,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Fail);
        let attempt = result.final_attempt().unwrap();
        assert_eq!(attempt.failed_count(), 1);
        assert!(attempt.error_detail().is_none());
    }

    #[tokio::test]
    async fn test_raised_error_is_error_outcome() {
        let mut case = Counting {
            attempts: 1,
            raise_until: 1,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Error);
        assert_eq!(result.error_detail(), Some("Things be broken"));
        assert_eq!(case.teardowns, 1);
    }

    #[tokio::test]
    async fn test_auto_retry_until_pass() {
        let mut case = Counting {
            attempts: 5,
            fail_until: 1,
            raise_until: 2,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Pass);
        let outcomes: Vec<_> = result.attempts().iter().map(|a| a.outcome()).collect();
        assert_eq!(outcomes, vec![Outcome::Error, Outcome::Error, Outcome::Pass]);
        let numbers: Vec<_> = result.attempts().iter().map(|a| a.attempt_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(case.cleanups, 3);
        assert_eq!(case.teardowns, 1);
    }

    #[tokio::test]
    async fn test_attempts_never_exceed_budget() {
        let mut case = Counting {
            attempts: 3,
            fail_until: 10,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Fail);
        assert_eq!(result.attempts().len(), 3);
        assert_eq!(case.teardowns, 1);
    }

    #[tokio::test]
    async fn test_prompt_before_retry_declined() {
        let mut transport = quiet_transport();
        transport.expect_ask_retry().times(1).returning(|_| Ok(false));

        let mut case = Counting {
            attempts: 5,
            mode: RetryMode::PromptBeforeRetry,
            fail_until: 10,
            ..Default::default()
        };
        let result = run_case(&mut case, transport).await;

        assert_eq!(result.outcome(), Outcome::Fail);
        assert_eq!(result.attempts().len(), 1);
        assert_eq!(case.teardowns, 1);
    }

    #[tokio::test]
    async fn test_prompt_before_retry_accepted() {
        let mut transport = quiet_transport();
        transport
            .expect_ask_retry()
            .withf(|prompt: &str| prompt.contains("attempt 1 of 2"))
            .times(1)
            .returning(|_| Ok(true));

        let mut case = Counting {
            attempts: 2,
            mode: RetryMode::PromptBeforeRetry,
            fail_until: 1,
            ..Default::default()
        };
        let result = run_case(&mut case, transport).await;

        assert_eq!(result.outcome(), Outcome::Pass);
        assert_eq!(result.attempts().len(), 2);
    }

    #[tokio::test]
    async fn test_enter_failure_skips_attempts_but_tears_down() {
        let mut case = Counting {
            attempts: 3,
            fail_enter: true,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Error);
        assert!(result.attempts().is_empty());
        assert_eq!(result.error_detail(), Some("fixture not connected"));
        assert_eq!(case.bodies, 0);
        assert_eq!(case.teardowns, 1);
    }

    #[tokio::test]
    async fn test_tear_down_failure_escalates_pass() {
        let mut case = Counting {
            attempts: 1,
            fail_tear_down: true,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.final_attempt().unwrap().outcome(), Outcome::Pass);
        assert_eq!(result.outcome(), Outcome::Error);
        assert_eq!(result.teardown_error(), Some("relay stuck"));
    }

    #[tokio::test]
    async fn test_every_attempt_errors_tears_down_once() {
        let mut case = Counting {
            attempts: 3,
            raise_until: 10,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Error);
        assert_eq!(result.attempts().len(), 3);
        assert!(result.attempts().iter().all(|a| a.outcome() == Outcome::Error));
        assert_eq!(case.cleanups, 3);
        assert_eq!(case.teardowns, 1);
    }

    #[tokio::test]
    async fn test_clean_up_error_overrides_pass() {
        let mut case = Counting {
            attempts: 1,
            fail_clean_up: true,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        let attempt = result.final_attempt().unwrap();
        assert_eq!(attempt.checks().len(), 1);
        assert!(!attempt.checks()[0].is_fail());
        assert_eq!(attempt.outcome(), Outcome::Error);
        assert_eq!(
            attempt.error_detail(),
            Some("clean_up hook failed: test lead still attached")
        );
        assert_eq!(result.outcome(), Outcome::Error);
        assert_eq!(case.teardowns, 1);
    }

    #[tokio::test]
    async fn test_panicking_body_is_error_and_tears_down_once() {
        let mut case = Counting {
            attempts: 2,
            panic_in_body: true,
            ..Default::default()
        };
        let result = run_case(&mut case, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Error);
        assert_eq!(result.attempts().len(), 2);
        assert_eq!(result.state(), LifecycleState::Complete);
        let detail = result.error_detail().unwrap();
        assert!(detail.starts_with("test hook panicked: index out of bounds"));
        assert_eq!(case.cleanups, 2);
        assert_eq!(case.teardowns, 1);
    }

    struct PanickingTearDown;

    #[async_trait]
    impl TestCase for PanickingTearDown {
        async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            ctx.checks.record_pass("measured");
            Ok(())
        }

        async fn tear_down(&mut self, _ctx: &mut CaseContext<'_>) -> anyhow::Result<()> {
            let driver: Option<&str> = None;
            let _ = driver.expect("relay driver missing");
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_panicking_tear_down_is_error() {
        let result = run_case(&mut PanickingTearDown, quiet_transport()).await;

        assert_eq!(result.final_attempt().unwrap().outcome(), Outcome::Pass);
        assert_eq!(result.outcome(), Outcome::Error);
        assert_eq!(
            result.teardown_error(),
            Some("tear_down hook panicked: relay driver missing")
        );
    }

    struct Sleeper;

    #[async_trait]
    impl TestCase for Sleeper {
        fn attempt_timeout(&self) -> Option<Duration> {
            Some(Duration::from_millis(10))
        }

        async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            ctx.checks.record_pass("started");
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_timeout_is_error() {
        let result = run_case(&mut Sleeper, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Error);
        assert!(result.error_detail().unwrap().contains("timed out after 10 ms"));
    }

    struct MalformedCheck;

    #[async_trait]
    impl TestCase for MalformedCheck {
        async fn test(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            ctx.checks.check_in_range("Comparison", "HI", 5.0, 10.0)?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_malformed_check_is_error_not_fail() {
        let result = run_case(&mut MalformedCheck, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Error);
        assert!(result.final_attempt().unwrap().checks().is_empty());
        assert!(result.error_detail().unwrap().contains("numeric operand"));
    }

    struct Aborting;

    #[async_trait]
    impl TestCase for Aborting {
        fn retry_policy(&self) -> RetryPolicy {
            RetryPolicy::attempts(3)
        }

        async fn test(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
            Err(SequenceAbort::new("unit not powered").into())
        }
    }

    #[tokio::test]
    async fn test_abort_stops_retries() {
        let result = run_case(&mut Aborting, quiet_transport()).await;

        assert_eq!(result.outcome(), Outcome::Error);
        assert!(result.abort_requested());
        assert_eq!(result.attempts().len(), 1);
    }
}

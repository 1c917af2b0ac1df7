//! Sequencer - runs cases in authoring order and reports the aggregate

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{AbortPolicy, Sequence, SequenceResult};
use crate::domain::interaction::{InteractionPort, InteractionTransport};
use crate::domain::namespace::ConfigNamespace;
use crate::domain::test_case::{CaseRunner, SharedState};

/// Run-wide sequencer settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencerConfig {
    pub abort_policy: AbortPolicy,
    /// Default per-attempt time limit
    pub attempt_timeout: Option<Duration>,
}

/// Runs one case at a time to completion, then surfaces gated
/// post-sequence messages
pub struct Sequencer {
    config: SequencerConfig,
    transport: Arc<dyn InteractionTransport>,
    namespace: ConfigNamespace,
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("config", &self.config)
            .field("namespace_keys", &self.namespace.len())
            .finish()
    }
}

impl Sequencer {
    pub fn new(transport: Arc<dyn InteractionTransport>) -> Self {
        Self {
            config: SequencerConfig::default(),
            transport,
            namespace: ConfigNamespace::new(),
        }
    }

    pub fn with_config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_namespace(mut self, namespace: ConfigNamespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn namespace(&self) -> &ConfigNamespace {
        &self.namespace
    }

    /// Run every case of `sequence` in order. Shared state and the
    /// post-sequence queue are fresh for each run.
    pub async fn run(&self, sequence: Sequence) -> SequenceResult {
        let run_id = Uuid::new_v4();
        let span = info_span!("sequence", %run_id, name = %sequence.name());

        self.run_inner(run_id, sequence).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, sequence: Sequence) -> SequenceResult {
        let started_at = Utc::now();
        let (name, cases) = sequence.into_parts();
        let total = cases.len();
        info!(cases = total, abort_policy = %self.config.abort_policy, "Sequence started");

        let mut ui = InteractionPort::new(Arc::clone(&self.transport));
        let mut shared = SharedState::new();
        let mut results = Vec::with_capacity(total);

        {
            let mut runner = CaseRunner::new(&mut ui, &mut shared, &self.namespace)
                .with_default_timeout(self.config.attempt_timeout);

            for (index, mut case) in cases.into_iter().enumerate() {
                let result = runner.run(index, case.as_mut()).await;
                let stop = result.abort_requested()
                    || self.config.abort_policy.should_abort(result.outcome());
                results.push(result);

                if stop && index + 1 < total {
                    warn!(
                        index,
                        skipped = total - index - 1,
                        "Sequence aborted, skipping remaining cases"
                    );
                    break;
                }
            }
        }

        let skipped = total - results.len();
        let result = SequenceResult::new(run_id, name, results, skipped, started_at);
        let surfaced = ui.flush_post_sequence(result.outcome()).await;

        let summary = result.summary();
        info!(
            outcome = %result.outcome(),
            passed = summary.passed,
            failed = summary.failed,
            errored = summary.errored,
            skipped = summary.skipped,
            "Sequence finished"
        );

        result.with_post_sequence(surfaced)
    }
}

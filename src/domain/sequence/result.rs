//! Sequence-level aggregation of case results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::test_case::{AttemptRecord, CaseInfo, CaseResult, Outcome};

/// Counts over the cases of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
}

/// Aggregate result of one sequence run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceResult {
    run_id: Uuid,
    sequence: String,
    outcome: Outcome,
    /// Authoring order
    cases: Vec<CaseResult>,
    skipped: usize,
    aborted: bool,
    /// Post-sequence messages that were surfaced, in enqueue order
    post_sequence: Vec<String>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl SequenceResult {
    pub(crate) fn new(
        run_id: Uuid,
        sequence: String,
        cases: Vec<CaseResult>,
        skipped: usize,
        started_at: DateTime<Utc>,
    ) -> Self {
        let outcome = Outcome::aggregate(cases.iter().map(CaseResult::outcome));
        Self {
            run_id,
            sequence,
            outcome,
            cases,
            skipped,
            aborted: skipped > 0,
            post_sequence: Vec::new(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub(crate) fn with_post_sequence(mut self, messages: Vec<String>) -> Self {
        self.post_sequence = messages;
        self
    }

    // Getters
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// PASS only if every case passed; ERROR if any case errored; else FAIL
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn cases(&self) -> &[CaseResult] {
        &self.cases
    }

    /// Each case paired with its final attempt
    pub fn final_attempts(&self) -> impl Iterator<Item = (&CaseInfo, Option<&AttemptRecord>)> {
        self.cases.iter().map(|c| (c.info(), c.final_attempt()))
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn post_sequence(&self) -> &[String] {
        &self.post_sequence
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn summary(&self) -> SequenceSummary {
        let count = |outcome: Outcome| self.cases.iter().filter(|c| c.outcome() == outcome).count();
        SequenceSummary {
            total: self.cases.len() + self.skipped,
            passed: count(Outcome::Pass),
            failed: count(Outcome::Fail),
            errored: count(Outcome::Error),
            skipped: self.skipped,
        }
    }
}

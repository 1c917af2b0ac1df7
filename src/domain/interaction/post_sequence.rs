//! Deferred messages gated on the final sequence outcome

use serde::{Deserialize, Serialize};

use crate::domain::test_case::Outcome;

/// Which sequence outcomes a deferred message is shown for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSequenceFilter {
    Always,
    OnPass,
    /// Shown for both FAIL and ERROR sequence outcomes
    OnFail,
}

impl PostSequenceFilter {
    pub fn matches(&self, outcome: Outcome) -> bool {
        match self {
            PostSequenceFilter::Always => true,
            PostSequenceFilter::OnPass => outcome == Outcome::Pass,
            PostSequenceFilter::OnFail => outcome != Outcome::Pass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSequenceMessage {
    pub filter: PostSequenceFilter,
    pub message: String,
}

/// Messages in enqueue order
#[derive(Debug, Default)]
pub struct PostSequenceQueue {
    messages: Vec<PostSequenceMessage>,
}

impl PostSequenceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: PostSequenceFilter, message: impl Into<String>) {
        self.messages.push(PostSequenceMessage {
            filter,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Empty the queue, keeping only messages whose filter matches `outcome`
    pub fn drain_matching(&mut self, outcome: Outcome) -> Vec<String> {
        self.messages
            .drain(..)
            .filter(|m| m.filter.matches(outcome))
            .map(|m| m.message)
            .collect()
    }
}

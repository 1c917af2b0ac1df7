//! Interaction port - the delivery boundary used by test bodies and the sequencer

use std::sync::Arc;

use tracing::{debug, warn};

use super::{InteractionError, InteractionTransport, PostSequenceFilter, PostSequenceQueue};
use crate::domain::test_case::Outcome;

/// Operator-facing capability set handed to hooks.
///
/// Performs no business logic: immediate messages go straight to the
/// transport, post-sequence messages are queued until the sequencer knows the
/// final outcome.
pub struct InteractionPort {
    transport: Arc<dyn InteractionTransport>,
    post_sequence: PostSequenceQueue,
}

impl std::fmt::Debug for InteractionPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionPort")
            .field("queued_post_sequence", &self.post_sequence.len())
            .finish()
    }
}

impl InteractionPort {
    pub fn new(transport: Arc<dyn InteractionTransport>) -> Self {
        Self {
            transport,
            post_sequence: PostSequenceQueue::new(),
        }
    }

    /// Fire-and-forget informational message
    pub async fn notify(&self, message: &str) {
        if let Err(e) = self.transport.notify(message).await {
            warn!(error = %e, "Failed to deliver notification");
        }
    }

    /// Wait for the operator to acknowledge. Records no check.
    pub async fn confirm(&self, message: &str) -> Result<(), InteractionError> {
        self.transport.confirm(message).await
    }

    /// Wait for operator-supplied text. Parsing it is up to the test body.
    pub async fn request_input(&self, prompt: &str) -> Result<String, InteractionError> {
        self.transport.request_input(prompt).await
    }

    pub fn post_sequence_always(&mut self, message: impl Into<String>) {
        self.post_sequence.push(PostSequenceFilter::Always, message);
    }

    pub fn post_sequence_on_pass(&mut self, message: impl Into<String>) {
        self.post_sequence.push(PostSequenceFilter::OnPass, message);
    }

    /// Shown when the sequence ends in FAIL or ERROR
    pub fn post_sequence_on_fail(&mut self, message: impl Into<String>) {
        self.post_sequence.push(PostSequenceFilter::OnFail, message);
    }

    pub fn queued_post_sequence(&self) -> usize {
        self.post_sequence.len()
    }

    /// Retry gate. A transport failure counts as declining.
    pub(crate) async fn gate_retry(&self, prompt: &str) -> bool {
        match self.transport.ask_retry(prompt).await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Retry prompt failed, treating as declined");
                false
            }
        }
    }

    /// Deliver queued post-sequence messages matching `outcome`, returning
    /// the messages that were surfaced.
    pub(crate) async fn flush_post_sequence(&mut self, outcome: Outcome) -> Vec<String> {
        let messages = self.post_sequence.drain_matching(outcome);
        debug!(count = messages.len(), %outcome, "Flushing post-sequence messages");

        for message in &messages {
            if let Err(e) = self.transport.show_post_sequence(message).await {
                warn!(error = %e, "Failed to deliver post-sequence message");
            }
        }

        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interaction::MockInteractionTransport;

    #[tokio::test]
    async fn test_notify_swallows_transport_errors() {
        let mut transport = MockInteractionTransport::new();
        transport
            .expect_notify()
            .times(1)
            .returning(|_| Err(InteractionError::closed("gone")));

        let port = InteractionPort::new(Arc::new(transport));
        port.notify("Tearing down this function").await;
    }

    #[tokio::test]
    async fn test_request_input_passes_through() {
        let mut transport = MockInteractionTransport::new();
        transport
            .expect_request_input()
            .withf(|prompt: &str| prompt == "What is 1 + 1?")
            .returning(|_| Ok("2".to_string()));

        let port = InteractionPort::new(Arc::new(transport));
        assert_eq!(port.request_input("What is 1 + 1?").await.unwrap(), "2");
    }

    #[tokio::test]
    async fn test_gate_retry_error_is_decline() {
        let mut transport = MockInteractionTransport::new();
        transport
            .expect_ask_retry()
            .returning(|_| Err(InteractionError::closed("stdin closed")));

        let port = InteractionPort::new(Arc::new(transport));
        assert!(!port.gate_retry("Retry?").await);
    }

    #[tokio::test]
    async fn test_flush_filters_by_outcome() {
        let mut transport = MockInteractionTransport::new();
        transport
            .expect_show_post_sequence()
            .times(2)
            .returning(|_| Ok(()));

        let mut port = InteractionPort::new(Arc::new(transport));
        port.post_sequence_always("always");
        port.post_sequence_on_pass("pass only");
        port.post_sequence_on_fail("fail only");

        let shown = port.flush_post_sequence(Outcome::Fail).await;
        assert_eq!(shown, vec!["always", "fail only"]);
        assert_eq!(port.queued_post_sequence(), 0);
    }
}

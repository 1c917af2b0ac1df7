//! Scripted transport - canned operator responses for unattended runs

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::interaction::{InteractionError, InteractionTransport};

/// Everything the transport was asked to show, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    Notify(String),
    Confirm(String),
    Input { prompt: String, response: String },
    Retry { prompt: String, accepted: bool },
    PostSequence(String),
}

/// Answers prompts from queues instead of a human.
///
/// Confirmations are acknowledged immediately. Input requests pop the next
/// queued response and fail with a closed channel once the queue is empty.
/// Retry prompts pop the next queued answer, falling back to a fixed default.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    inputs: Mutex<VecDeque<String>>,
    retry_answers: Mutex<VecDeque<bool>>,
    default_retry: bool,
    transcript: Mutex<Vec<TranscriptEntry>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs
            .get_mut()
            .extend(inputs.into_iter().map(Into::into));
        self
    }

    pub fn with_retry_answers(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.retry_answers.get_mut().extend(answers);
        self
    }

    /// Answer used once the queued retry answers run out
    pub fn with_default_retry(mut self, accept: bool) -> Self {
        self.default_retry = accept;
        self
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().await.clone()
    }

    async fn log(&self, entry: TranscriptEntry) {
        self.transcript.lock().await.push(entry);
    }
}

#[async_trait]
impl InteractionTransport for ScriptedTransport {
    async fn notify(&self, message: &str) -> Result<(), InteractionError> {
        info!(target: "operator", "{}", message.trim_end());
        self.log(TranscriptEntry::Notify(message.to_string())).await;
        Ok(())
    }

    async fn confirm(&self, message: &str) -> Result<(), InteractionError> {
        info!(target: "operator", confirmed = true, "{}", message.trim_end());
        self.log(TranscriptEntry::Confirm(message.to_string())).await;
        Ok(())
    }

    async fn request_input(&self, prompt: &str) -> Result<String, InteractionError> {
        let response = self
            .inputs
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| InteractionError::closed("no scripted input left"))?;

        info!(target: "operator", response = %response, "{}", prompt.trim_end());
        self.log(TranscriptEntry::Input {
            prompt: prompt.to_string(),
            response: response.clone(),
        })
        .await;
        Ok(response)
    }

    async fn ask_retry(&self, prompt: &str) -> Result<bool, InteractionError> {
        let accepted = self
            .retry_answers
            .lock()
            .await
            .pop_front()
            .unwrap_or(self.default_retry);

        info!(target: "operator", accepted, "{}", prompt);
        self.log(TranscriptEntry::Retry {
            prompt: prompt.to_string(),
            accepted,
        })
        .await;
        Ok(accepted)
    }

    async fn show_post_sequence(&self, message: &str) -> Result<(), InteractionError> {
        info!(target: "operator", post_sequence = true, "{}", message.trim_end());
        self.log(TranscriptEntry::PostSequence(message.to_string())).await;
        Ok(())
    }
}

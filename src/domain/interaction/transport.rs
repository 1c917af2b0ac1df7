//! Interaction transport trait

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Errors raised by a transport while talking to the operator
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("Operator channel closed: {message}")]
    Closed { message: String },

    #[error("Operator channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InteractionError {
    pub fn closed(message: impl Into<String>) -> Self {
        Self::Closed {
            message: message.into(),
        }
    }
}

/// Concrete medium that delivers messages to the operator and returns their
/// responses (console, GUI, network channel).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InteractionTransport: Send + Sync {
    /// Show an informational message
    async fn notify(&self, message: &str) -> Result<(), InteractionError>;

    /// Block until the operator acknowledges the message
    async fn confirm(&self, message: &str) -> Result<(), InteractionError>;

    /// Block until the operator supplies a line of text
    async fn request_input(&self, prompt: &str) -> Result<String, InteractionError>;

    /// Ask whether a failed case should be attempted again
    async fn ask_retry(&self, prompt: &str) -> Result<bool, InteractionError>;

    /// Surface a post-sequence message once the sequence outcome is known
    async fn show_post_sequence(&self, message: &str) -> Result<(), InteractionError>;
}

//! Interaction domain - Operator-facing messages, prompts and post-sequence info

mod port;
mod post_sequence;
mod transport;

pub use port::InteractionPort;
pub use post_sequence::{PostSequenceFilter, PostSequenceMessage, PostSequenceQueue};
pub use transport::{InteractionError, InteractionTransport};

#[cfg(test)]
pub use transport::MockInteractionTransport;

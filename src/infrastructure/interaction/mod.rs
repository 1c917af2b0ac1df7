//! Interaction transports - Console and scripted operator channels

mod console;
mod scripted;

pub use console::ConsoleTransport;
pub use scripted::{ScriptedTransport, TranscriptEntry};

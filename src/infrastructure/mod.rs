//! Infrastructure layer - Transports, file sources, report sinks and logging

pub mod interaction;
pub mod logging;
pub mod namespace;
pub mod report;

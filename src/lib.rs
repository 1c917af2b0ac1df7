//! Fixture Sequencer
//!
//! Drives test cases through a fixed lifecycle and aggregates their results:
//! - Check recording with PASS / FAIL / logged values
//! - Retry policies, automatic or gated by the operator
//! - Operator interaction and post-sequence messages
//! - Sequencing with worst-outcome aggregation

pub mod cli;
pub mod config;
pub mod demo;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

//! CLI module for the fixture sequencer
//!
//! Provides subcommands:
//! - `run`: execute a sequence from the bundled catalog
//! - `list`: show the sequences that can be run

pub mod list;
pub mod run;

use clap::{Parser, Subcommand};

/// Fixture sequencer - Runs test sequences and aggregates their outcomes
#[derive(Parser)]
#[command(name = "fixture-sequencer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a sequence and report its outcome through the exit code
    Run(run::RunArgs),

    /// List the available sequences
    List,
}

//! Run command - executes one sequence and maps its outcome to an exit code

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::demo;
use crate::domain::{
    ConfigNamespace, DomainError, InteractionTransport, Outcome, ReportSink, SequenceResult,
    Sequencer,
};
use crate::infrastructure::interaction::{ConsoleTransport, ScriptedTransport};
use crate::infrastructure::logging;
use crate::infrastructure::namespace::FileSource;
use crate::infrastructure::report::JsonReportWriter;

/// Arguments for the run command
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Sequence to run (defaults to the configured or catalog default)
    #[arg(long)]
    pub sequence: Option<String>,

    /// Write the sequence result as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Configuration file (overrides config/default and config/local)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Extra namespace files, merged after the configured ones
    #[arg(long = "namespace")]
    pub namespace_files: Vec<PathBuf>,

    /// Answer prompts automatically instead of reading stdin
    #[arg(long)]
    pub non_interactive: bool,

    /// Canned answers for input prompts when non-interactive
    #[arg(long = "input", requires = "non_interactive")]
    pub inputs: Vec<String>,
}

/// Run a sequence
pub async fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.logging);

    let namespace = load_namespace(&config, &args.namespace_files)?;

    let catalog = demo::catalog();
    let name = args
        .sequence
        .as_deref()
        .or(config.sequencer.default_sequence.as_deref());
    let sequence = catalog.build(name)?;

    let transport: Arc<dyn InteractionTransport> = if args.non_interactive {
        Arc::new(ScriptedTransport::new().with_inputs(args.inputs.clone()))
    } else {
        Arc::new(ConsoleTransport::stdio())
    };

    let sequencer = Sequencer::new(transport)
        .with_config(config.sequencer.to_sequencer_config())
        .with_namespace(namespace);

    info!(
        sequence = sequence.name(),
        cases = sequence.len(),
        abort_policy = %sequencer.config().abort_policy,
        "Starting sequence"
    );
    let result = sequencer.run(sequence).await;

    print_summary(&result);

    if let Some(path) = &args.report {
        JsonReportWriter::new(path).publish(&result).await?;
    }

    Ok(exit_code(result.outcome()))
}

/// An explicit file replaces the `config/` directory; either way a bad file
/// or environment override is an error
fn load_config(explicit: Option<&Path>) -> Result<AppConfig, DomainError> {
    let (origin, loaded) = match explicit {
        Some(path) => (path.display().to_string(), AppConfig::load_from(path)),
        None => ("config/".to_string(), AppConfig::load()),
    };

    loaded.map_err(|e| DomainError::configuration(format!("Failed to load {}: {}", origin, e)))
}

fn load_namespace(config: &AppConfig, extra: &[PathBuf]) -> anyhow::Result<ConfigNamespace> {
    let mut namespace = ConfigNamespace::new();
    let files = config
        .namespace
        .files
        .iter()
        .map(PathBuf::from)
        .chain(extra.iter().cloned());

    for path in files {
        let loaded = namespace
            .load(&FileSource::new(&path))
            .with_context(|| format!("Failed to load namespace file {}", path.display()))?;
        info!(path = %path.display(), keys = loaded, "Namespace file loaded");
    }

    Ok(namespace)
}

fn print_summary(result: &SequenceResult) {
    println!();
    println!("Sequence '{}' ({})", result.sequence(), result.run_id());

    for case in result.cases() {
        let info = case.info();
        println!(
            "  [{:<5}] {:>2}. {} ({} attempt{})",
            case.outcome().to_string(),
            info.index + 1,
            info.description,
            case.attempts().len(),
            if case.attempts().len() == 1 { "" } else { "s" }
        );

        if let Some(attempt) = case.final_attempt() {
            for check in attempt.checks().iter().filter(|c| c.is_fail()) {
                println!("          {}", check);
            }
        }
        if let Some(detail) = case.error_detail() {
            println!("          error: {}", detail);
        }
    }

    let summary = result.summary();
    if result.aborted() {
        warn!(skipped = summary.skipped, "Sequence aborted early");
    }

    println!(
        "{}: {} passed, {} failed, {} errored, {} skipped ({} total)",
        result.outcome(),
        summary.passed,
        summary.failed,
        summary.errored,
        summary.skipped,
        summary.total
    );
}

/// 0 for PASS, 1 for FAIL, 2 for ERROR
pub fn exit_code(outcome: Outcome) -> ExitCode {
    match outcome {
        Outcome::Pass => ExitCode::SUCCESS,
        Outcome::Fail => ExitCode::from(1),
        Outcome::Error => ExitCode::from(2),
    }
}

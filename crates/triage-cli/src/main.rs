//! Support ticket triage runner
//!
//! # Usage
//!
//! ```bash
//! # Classify, score and route every ticket in a batch
//! triage-cli process --tickets test_cases/tickets.json
//!
//! # Score the batch against a fixture and print the Markdown report
//! triage-cli evaluate --expected test_cases/expected.toml
//!
//! # Machine-readable output, verbose logs on stderr
//! RUST_LOG=triage=debug triage-cli evaluate --json
//! ```

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use triage::{
    EvaluationHarness, ExpectedOutcomes, ModelBackedClassifier, TicketOutcome, TriageError,
    ValidationError,
};
use triage_cli::{load_expected, load_model_labels, load_tickets, CliConfig};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify, score and route each ticket
    Process(CommonArgs),
    /// Process the batch and score it against expected outcomes
    Evaluate {
        #[command(flatten)]
        common: CommonArgs,

        /// Expected outcomes fixture, TOML or JSON (overrides TRIAGE_EXPECTED_PATH)
        #[arg(long)]
        expected: Option<PathBuf>,

        /// Fail when fixture ids and batch ids disagree
        #[arg(long, default_value_t = false)]
        strict_fixture: bool,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// JSON array of ticket records (overrides TRIAGE_TICKETS_PATH)
    #[arg(long)]
    tickets: Option<PathBuf>,

    /// Canned model labels, JSON object of id to category (overrides TRIAGE_MODEL_LABELS_PATH)
    #[arg(long)]
    model_labels: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let env = CliConfig::from_env();

    let result = match cli.command {
        Command::Process(common) => {
            let config = env.with_overrides(
                common.tickets,
                None,
                common.model_labels,
                common.json,
                false,
            );
            process(&config)
        }
        Command::Evaluate {
            common,
            expected,
            strict_fixture,
        } => {
            let config = env.with_overrides(
                common.tickets,
                expected,
                common.model_labels,
                common.json,
                strict_fixture,
            );
            evaluate(&config)
        }
    };

    if let Err(e) = &result {
        log_failure(e);
    }
    result
}

/// Pipeline invariant failures are logged separately from input problems
fn log_failure(err: &anyhow::Error) {
    match err.downcast_ref::<TriageError>() {
        Some(triage_err) if triage_err.is_fatal() => {
            error!(error = %triage_err, "Triage pipeline aborted on a broken invariant");
        }
        _ => warn!(error = %err, "Triage run failed"),
    }
}

/// JSON shape of `process` output
#[derive(Serialize)]
struct ProcessOutput<'a> {
    outcomes: &'a [TicketOutcome],
    rejected: &'a [ValidationError],
}

fn build_harness(config: &CliConfig) -> Result<EvaluationHarness> {
    let harness = match &config.model_labels_path {
        Some(path) => {
            let model = load_model_labels(path)?;
            EvaluationHarness::new(Box::new(ModelBackedClassifier::new(model)))
        }
        None => EvaluationHarness::rule_based(),
    };
    info!(classifier = %harness.classifier_name(), "Triage harness ready");
    Ok(harness)
}

fn process(config: &CliConfig) -> Result<()> {
    let harness = build_harness(config)?;
    let mut batch = load_tickets(&config.tickets_path)?;

    let (tickets, mut rejected) = EvaluationHarness::validate(batch.records);
    batch.rejected.append(&mut rejected);
    let outcomes = harness.process_batch(&tickets)?;

    if config.json_output {
        let payload = ProcessOutput {
            outcomes: &outcomes,
            rejected: &batch.rejected,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("Failed to serialize outcomes")?
        );
    } else {
        for outcome in &outcomes {
            println!("{}", format_outcome(outcome));
        }
        print_rejected(&batch.rejected);
    }

    info!(
        processed = outcomes.len(),
        rejected = batch.rejected.len(),
        "Batch processed"
    );
    Ok(())
}

fn evaluate(config: &CliConfig) -> Result<()> {
    let harness = build_harness(config)?;
    let batch = load_tickets(&config.tickets_path)?;
    let expected = match &config.expected_path {
        Some(path) => load_expected(path)?,
        None => ExpectedOutcomes::reference(),
    };

    let mut report = harness.run_raw(batch.records, &expected)?;
    let mut rejected = batch.rejected;
    rejected.append(&mut report.rejected);
    report.rejected = rejected;

    if config.strict_fixture {
        report.ensure_fixture_aligned()?;
    }

    if config.json_output {
        println!(
            "{}",
            report.to_json().context("Failed to serialize report")?
        );
    } else {
        println!("{}", report.format_report());
    }
    Ok(())
}

fn format_outcome(outcome: &TicketOutcome) -> String {
    format!(
        "Ticket {} ({})\n  Subject:  {}\n  Category: {} - {}\n  Priority: {} - {}\n  Route:    {} - {}\n",
        outcome.ticket_id,
        outcome.customer_tier,
        outcome.subject,
        outcome.category.category,
        outcome.category.reasoning,
        outcome.priority.priority_level,
        outcome.priority.reasoning,
        outcome.routing.team,
        outcome.routing.reasoning,
    )
}

fn print_rejected(rejected: &[ValidationError]) {
    if rejected.is_empty() {
        return;
    }
    println!("Rejected records:");
    for error in rejected {
        println!("  - {}", error);
    }
}

//! # regtag CLI entry point
//!
//! Parses command-line arguments, initialises tracing from the verbosity
//! flags, and dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regtag_cli::run::{run_assign, run_retrigger, RunArgs};

/// regtag — rule-driven auto-assignment for regulatory report records.
///
/// Scans the dataset's report records against user-defined trigger rules
/// and applies each rule's tagging action exactly once per record, under
/// optimistic concurrency control.
#[derive(Parser, Debug)]
#[command(name = "regtag", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Dataset file (JSON or YAML) holding trigger rules and records.
    #[arg(long, global = true, default_value = "regtag.yaml")]
    dataset: PathBuf,

    /// Engine configuration file (actor, batch size, window templates).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every active trigger rule matching the selection clause.
    Run(RunArgs),

    /// Re-run an explicit rule selection, ignoring the active flag.
    Retrigger(RunArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run(args) => run_assign(&args, &cli.dataset, cli.config.as_deref()),
        Commands::Retrigger(args) => run_retrigger(&args, &cli.dataset, cli.config.as_deref()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

//! # Run / Retrigger Subcommands
//!
//! Both subcommands share the same shape: load the dataset and optional
//! engine config, build the engine, execute, and print one line per
//! outcome (or a JSON array with `--json`). Exit code 1 when any rule
//! failed, so schedulers can retry a pass without parsing output.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use regtag_core::{AssignmentOutcome, OutcomeStatus};
use regtag_engine::EngineConfig;

use crate::dataset::Dataset;

/// Shared arguments for `regtag run` and `regtag retrigger`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Rule-selection clause, e.g. "primaryKey = 'Trade Report_Issue
    /// Assignment_GTR-3012'". Empty selects all rules.
    #[arg(long = "where", default_value = "")]
    pub where_clause: String,

    /// Print outcomes as a JSON array instead of one line each.
    #[arg(long)]
    pub json: bool,
}

/// Full assignment pass over the dataset's active rules.
pub fn run_assign(args: &RunArgs, dataset: &Path, config: Option<&Path>) -> Result<u8> {
    let engine = Dataset::load(dataset)?.into_engine(load_config(config)?);
    let outcomes = engine.auto_assign(&args.where_clause)?;
    report(&outcomes, args.json)
}

/// Re-run an explicit rule selection, ignoring the active flag.
pub fn run_retrigger(args: &RunArgs, dataset: &Path, config: Option<&Path>) -> Result<u8> {
    let engine = Dataset::load(dataset)?.into_engine(load_config(config)?);
    let outcomes = engine.re_trigger(&args.where_clause)?;
    report(&outcomes, args.json)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        _ => serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display())),
    }
}

fn report(outcomes: &[AssignmentOutcome], json: bool) -> Result<u8> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
    } else {
        for outcome in outcomes {
            println!("{}", render(outcome));
        }
    }
    Ok(exit_code(outcomes))
}

fn render(outcome: &AssignmentOutcome) -> String {
    let mut line = format!(
        "{} {} records_modified={}",
        outcome.status, outcome.primary_key, outcome.records_modified,
    );
    if let Some(comment) = &outcome.comment {
        line.push_str(": ");
        line.push_str(comment);
    }
    line
}

fn exit_code(outcomes: &[AssignmentOutcome]) -> u8 {
    if outcomes.iter().any(|o| o.status == OutcomeStatus::Failed) {
        1
    } else {
        0
    }
}

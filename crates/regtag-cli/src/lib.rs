//! # regtag-cli — CLI for the Auto-Assignment Engine
//!
//! Provides the `regtag` binary:
//!
//! - `regtag --dataset <file> run [--where <clause>] [--json]` — run every
//!   active trigger rule in the dataset, one outcome line per rule.
//! - `regtag --dataset <file> retrigger --where <clause>` — re-run an
//!   explicit rule selection, active or not.
//!
//! Datasets and engine configs are JSON or YAML files; records and rules
//! load into the in-memory stores, so a run is fully self-contained.

pub mod dataset;
pub mod run;

//! # regtag-core — Domain Model
//!
//! Foundational types for the regtag auto-assignment engine:
//!
//! - **Trigger rules** ([`rule`]): user-defined match-expression + action
//!   pairs, with lenient record-kind and action label parsing.
//!
//! - **Report records** ([`record`]): the five structurally analogous
//!   regulatory report variants behind the [`ReportRecord`] capability
//!   trait — identity/version pair, validity lifetime, queryable subject
//!   fields, and a tracking block.
//!
//! - **Tracking blocks** ([`block`]): the only mutable sub-structure on a
//!   record, mutated exclusively through the engine's action applier.
//!
//! - **Outcomes** ([`outcome`]): exactly one per rule per run.
//!
//! This crate holds data and accessors only; the evaluation pipeline lives
//! in `regtag-engine` and the store boundary in `regtag-store`.

pub mod block;
pub mod outcome;
pub mod record;
pub mod rule;

// Re-export primary types.
pub use block::{BreakManagementBlock, IssueTrackingBlock, Tracking, TrackingMut};
pub use outcome::{AssignmentOutcome, OutcomeStatus};
pub use record::{
    CollateralLinkReportRecord, CollateralReportRecord, CollateralSubject, FieldValue,
    ReconciliationReportRecord, RecordKey, RecordLifetime, ReportRecord, TradeReportRecord,
    TransactionSubject, ValuationReportRecord, LIFETIME_OPEN_END,
};
pub use rule::{ActionKind, IssueCategory, RecordKind, TriggerRule};

//! # Issue-Tracking Blocks
//!
//! The mutable sub-structure on a report record that holds applied-action
//! state. Standard report variants (trade, valuation, collateral,
//! collateral-link) carry an [`IssueTrackingBlock`]; reconciliation records
//! carry a [`BreakManagementBlock`], which stores its issue category as the
//! raw label string rather than the enum — the historical store shape.
//!
//! Invariant: blocks are mutated only through the engine's action applier.
//! A record is either untouched or carries one fully-applied action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rule::IssueCategory;

/// Applied-action state on standard report records.
///
/// `issue_refs` is ordered and append-only: idempotency matches by
/// containment, new references are appended at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTrackingBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_refs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_category: Option<IssueCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action_at: Option<DateTime<Utc>>,
}

/// Applied-action state on reconciliation break records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakManagementBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_refs: Option<Vec<String>>,
    /// Raw category label, not [`IssueCategory`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Read view over a record's tracking block, for the idempotency filter.
#[derive(Debug, Clone, Copy)]
pub enum Tracking<'a> {
    Standard(Option<&'a IssueTrackingBlock>),
    Break(Option<&'a BreakManagementBlock>),
}

/// Write view over a record's tracking block slot, for the action applier.
///
/// The slot is the record's `Option<...>` field so the applier can create
/// a block on records never tagged before.
#[derive(Debug)]
pub enum TrackingMut<'a> {
    Standard(&'a mut Option<IssueTrackingBlock>),
    Break(&'a mut Option<BreakManagementBlock>),
}

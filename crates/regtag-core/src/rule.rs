//! # Trigger Rules
//!
//! User-defined trigger rules drive the auto-assignment engine: each rule
//! carries a match expression, a record-kind selector, and the action to
//! apply once per matched record. Rules are read-only inputs to a run —
//! the engine never mutates them.
//!
//! ## Lenient Labels
//!
//! The record-kind and action labels on a rule are stored as the free
//! strings the rule store returns. Parsing happens at dispatch time:
//! a rule whose kind label is unknown is skipped by the orchestrator,
//! and a reconciliation rule whose action label is unknown is treated as
//! already handled by the idempotency filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RecordKind
// ---------------------------------------------------------------------------

/// The five regulatory report record shapes the engine can tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    TradeReport,
    ValuationReport,
    CollateralReport,
    CollateralLinkReport,
    ReconciliationReport,
}

impl RecordKind {
    /// All kinds in dispatch order. Outcome aggregation follows this order
    /// so multi-kind runs report deterministically.
    pub const ALL: [RecordKind; 5] = [
        RecordKind::TradeReport,
        RecordKind::ValuationReport,
        RecordKind::CollateralReport,
        RecordKind::CollateralLinkReport,
        RecordKind::ReconciliationReport,
    ];

    /// Canonical human-readable label, as stored on trigger rules.
    pub fn label(self) -> &'static str {
        match self {
            Self::TradeReport => "Trade Report",
            Self::ValuationReport => "Valuation Report",
            Self::CollateralReport => "Collateral Report",
            Self::CollateralLinkReport => "Collateral Link Report",
            Self::ReconciliationReport => "Reconciliation",
        }
    }

    /// Parse a rule's record-kind label. Returns `None` for labels without
    /// a registered handler — such rules are skipped, not errored.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.label() == label.trim())
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// The action a trigger rule applies to matched records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Attach an external issue-tracker reference to the record.
    AssignIssue,
    /// Add (or replace) the free-text comment on the record.
    AddComment,
}

impl ActionKind {
    /// Canonical label, as stored on trigger rules.
    pub fn label(self) -> &'static str {
        match self {
            Self::AssignIssue => "Issue Assignment",
            Self::AddComment => "Add Comment",
        }
    }

    /// Parse a rule's action label. `None` for unknown labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Issue Assignment" => Some(Self::AssignIssue),
            "Add Comment" => Some(Self::AddComment),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// IssueCategory
// ---------------------------------------------------------------------------

/// Issue category attached alongside an issue reference.
///
/// Standard report blocks store this enum; reconciliation break-management
/// blocks store the raw label string instead (legacy shape preserved at the
/// store boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    OverReporting,
    UnderReporting,
    MisReporting,
}

impl IssueCategory {
    /// Label as written by rule authors and stored on recon blocks.
    pub fn label(self) -> &'static str {
        match self {
            Self::OverReporting => "Over Reporting",
            Self::UnderReporting => "Under Reporting",
            Self::MisReporting => "Mis Reporting",
        }
    }

    /// Parse a category label. `None` for unknown labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Over Reporting" => Some(Self::OverReporting),
            "Under Reporting" => Some(Self::UnderReporting),
            "Mis Reporting" => Some(Self::MisReporting),
            _ => None,
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// TriggerRule
// ---------------------------------------------------------------------------

/// A user-defined trigger rule, evaluated once per engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRule {
    /// Rule identifier.
    pub id: Uuid,
    /// Stable composite label; copied onto the rule's outcome verbatim.
    pub primary_key: String,
    /// Match expression in the record store's filter language — opaque to
    /// the engine except for the window-bound concatenation.
    pub expression: String,
    /// Optional sub-expression, honoured only for reconciliation rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_expression: Option<String>,
    /// Record-kind selector label (see [`RecordKind::parse`]).
    pub record_kind: String,
    /// Action label (see [`ActionKind::parse`]).
    pub action: String,
    /// Issue reference for `AssignIssue`, comment text for `AddComment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_value: Option<String>,
    /// Issue-category label; meaningful only for `AssignIssue`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_value_type: Option<String>,
    /// Inactive rules are ignored by full runs.
    pub active: bool,
    /// Lower bound for the record lifetime window.
    pub last_success_at: DateTime<Utc>,
    /// Storage access-path hint, passed through to the record store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_hint: Option<String>,
    /// Hard cap on records considered in one run of this rule.
    pub max_volume: u32,
}

impl TriggerRule {
    /// Parsed record kind, `None` when the label has no handler.
    pub fn kind(&self) -> Option<RecordKind> {
        RecordKind::parse(&self.record_kind)
    }

    /// Parsed action kind, `None` when the label is unknown.
    pub fn action_kind(&self) -> Option<ActionKind> {
        ActionKind::parse(&self.action)
    }

    /// Parsed issue category of the action value type, if any.
    pub fn action_category(&self) -> Option<IssueCategory> {
        self.action_value_type.as_deref().and_then(IssueCategory::parse)
    }
}

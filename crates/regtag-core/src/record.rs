//! # Report Record Variants
//!
//! The five structurally analogous regulatory report record shapes, each an
//! identity/version pair plus one tracking block. The [`ReportRecord`] trait
//! is the capability seam of the generic pipeline: identity, lifetime, the
//! queryable subject fields, and read/write views over the tracking block.
//!
//! Subject identifiers carry only the fields rule expressions reference;
//! everything else about a report lives in the upstream document store and
//! never crosses into the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::block::{BreakManagementBlock, IssueTrackingBlock, Tracking, TrackingMut};
use crate::rule::RecordKind;

// ---------------------------------------------------------------------------
// Identity & lifetime
// ---------------------------------------------------------------------------

/// Record identity: key string plus the monotonically increasing version
/// number used as the optimistic-concurrency token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub id: String,
    pub version: i64,
}

impl RecordKey {
    pub fn new(id: impl Into<String>, version: i64) -> Self {
        Self { id: id.into(), version }
    }
}

/// Open-ended `valid_to` sentinel marking the live version of a record.
pub const LIFETIME_OPEN_END: i64 = i64::MAX;

/// Validity window of a record version.
///
/// `valid_to_millis` is epoch milliseconds, with [`LIFETIME_OPEN_END`] for
/// the current (not yet superseded) version — the window-bound clause in
/// composed queries compares against that sentinel to select live records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLifetime {
    pub valid_from: DateTime<Utc>,
    pub valid_to_millis: i64,
}

impl RecordLifetime {
    /// Lifetime of a live record version starting at `valid_from`.
    pub fn live(valid_from: DateTime<Utc>) -> Self {
        Self { valid_from, valid_to_millis: LIFETIME_OPEN_END }
    }

    pub fn is_live(&self) -> bool {
        self.valid_to_millis == LIFETIME_OPEN_END
    }
}

/// A queryable field value, produced by [`ReportRecord::field`] for the
/// reference store's filter matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

// ---------------------------------------------------------------------------
// ReportRecord trait
// ---------------------------------------------------------------------------

/// Capability seam of the generic tagging pipeline.
///
/// Implemented once per record variant. Implementations must be `Clone`
/// (the applier mutates a copy, leaving the fetched record untouched until
/// persist) and `Send + Sync + 'static` for dispatch across worker threads.
pub trait ReportRecord: Clone + Send + Sync + 'static {
    /// The kind tag this variant is dispatched under.
    const KIND: RecordKind;

    fn key(&self) -> &RecordKey;

    /// Mutable identity access, for stores advancing the version token on
    /// a successful compare-and-swap.
    fn key_mut(&mut self) -> &mut RecordKey;

    fn lifetime(&self) -> &RecordLifetime;

    /// Look up a subject field by its filter-language path
    /// (e.g. `subjectIdentifier.transactionId`). Unknown paths yield `None`.
    fn subject_field(&self, path: &str) -> Option<FieldValue>;

    /// Read view over the tracking block for the idempotency filter.
    fn tracking(&self) -> Tracking<'_>;

    /// Write view over the tracking block slot for the action applier.
    fn tracking_mut(&mut self) -> TrackingMut<'_>;

    /// Resolve a filter-language path: lifetime pseudo-fields first, then
    /// the variant's subject fields.
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "_df.lifetimeFrom" => Some(FieldValue::Timestamp(self.lifetime().valid_from)),
            "_df.lifetimeTo" => Some(FieldValue::Integer(self.lifetime().valid_to_millis)),
            other => self.subject_field(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Subject identifiers
// ---------------------------------------------------------------------------

/// Subject identifier for transaction-keyed reports (trade, valuation,
/// collateral-link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSubject {
    pub transaction_id: String,
    pub source_system: String,
}

impl TransactionSubject {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "subjectIdentifier.transactionId" => Some(FieldValue::Text(self.transaction_id.clone())),
            "subjectIdentifier.sourceSystem" => Some(FieldValue::Text(self.source_system.clone())),
            _ => None,
        }
    }
}

/// Subject identifier for collateral reports (portfolio-keyed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralSubject {
    pub collateral_portfolio_group: String,
    pub trade_party1_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_party2_id: Option<String>,
}

impl CollateralSubject {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "subjectIdentifier.collateralPortfolioGroup" => {
                Some(FieldValue::Text(self.collateral_portfolio_group.clone()))
            }
            "subjectIdentifier.tradeParty1Id" => Some(FieldValue::Text(self.trade_party1_id.clone())),
            "subjectIdentifier.tradeParty2Id" => {
                self.trade_party2_id.clone().map(FieldValue::Text)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// The five record variants
// ---------------------------------------------------------------------------

macro_rules! standard_record {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $subject:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub key: RecordKey,
            pub lifetime: RecordLifetime,
            pub subject: $subject,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub issue_tracking: Option<IssueTrackingBlock>,
        }

        impl ReportRecord for $name {
            const KIND: RecordKind = $kind;

            fn key(&self) -> &RecordKey {
                &self.key
            }

            fn key_mut(&mut self) -> &mut RecordKey {
                &mut self.key
            }

            fn lifetime(&self) -> &RecordLifetime {
                &self.lifetime
            }

            fn subject_field(&self, path: &str) -> Option<FieldValue> {
                self.subject.field(path)
            }

            fn tracking(&self) -> Tracking<'_> {
                Tracking::Standard(self.issue_tracking.as_ref())
            }

            fn tracking_mut(&mut self) -> TrackingMut<'_> {
                TrackingMut::Standard(&mut self.issue_tracking)
            }
        }
    };
}

standard_record!(
    /// A transaction report record.
    TradeReportRecord,
    RecordKind::TradeReport,
    TransactionSubject
);

standard_record!(
    /// A valuation report record.
    ValuationReportRecord,
    RecordKind::ValuationReport,
    TransactionSubject
);

standard_record!(
    /// A collateral report record.
    CollateralReportRecord,
    RecordKind::CollateralReport,
    CollateralSubject
);

standard_record!(
    /// A collateral-link report record.
    CollateralLinkReportRecord,
    RecordKind::CollateralLinkReport,
    TransactionSubject
);

/// A reconciliation break record.
///
/// Unlike the standard variants this carries a break-management block and
/// the two break fields rule sub-expressions target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReportRecord {
    pub key: RecordKey,
    pub lifetime: RecordLifetime,
    pub recon_type: String,
    pub break_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_management: Option<BreakManagementBlock>,
}

impl ReportRecord for ReconciliationReportRecord {
    const KIND: RecordKind = RecordKind::ReconciliationReport;

    fn key(&self) -> &RecordKey {
        &self.key
    }

    fn key_mut(&mut self) -> &mut RecordKey {
        &mut self.key
    }

    fn lifetime(&self) -> &RecordLifetime {
        &self.lifetime
    }

    fn subject_field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "reconType" => Some(FieldValue::Text(self.recon_type.clone())),
            "breakStatus" => Some(FieldValue::Text(self.break_status.clone())),
            _ => None,
        }
    }

    fn tracking(&self) -> Tracking<'_> {
        Tracking::Break(self.break_management.as_ref())
    }

    fn tracking_mut(&mut self) -> TrackingMut<'_> {
        TrackingMut::Break(&mut self.break_management)
    }
}

//! # Store Adapter Traits
//!
//! The collaborator boundary of the auto-assignment engine. A rule store
//! supplies trigger rules for an opaque where-clause; a record store
//! fetches report records for a composed query and persists mutated
//! records under a per-record optimistic version check.
//!
//! Implementations must be `Send + Sync` so the orchestrator can share
//! them across its per-kind worker threads behind an `Arc`. Both traits
//! are object-safe to support runtime store selection.

use regtag_core::{ReportRecord, TriggerRule};

/// Errors raised by a store adapter.
///
/// `Persist` is the *systemic* batch-write fault — a single record losing
/// its optimistic-version race is reported through [`PersistOutcome`]
/// instead and never aborts the batch.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The fetch call itself failed (connection, query execution).
    #[error("error while reading records from store: {0}")]
    Fetch(String),

    /// The batch-write call itself failed, as opposed to individual
    /// records inside an otherwise-successful call.
    #[error("error while writing records to store: {0}")]
    Persist(String),

    /// The where-clause could not be interpreted by this store.
    #[error("malformed filter expression: {0}")]
    Query(String),
}

/// Query parameters for a record fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Filter-language clause, opaque to the engine core.
    pub where_clause: String,
    /// Storage access-path hint from the trigger rule, opaque to the core.
    pub index_hint: Option<String>,
}

impl QueryParams {
    pub fn new(where_clause: impl Into<String>, index_hint: Option<String>) -> Self {
        Self { where_clause: where_clause.into(), index_hint }
    }
}

/// Failure detail for a single record write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub description: String,
    pub cause: Option<String>,
}

impl ErrorDetail {
    pub fn new(description: impl Into<String>, cause: Option<String>) -> Self {
        Self { description: description.into(), cause }
    }

    /// Single-line diagnostic: `description` alone, or
    /// `description. cause` when a cause is present.
    pub fn message(&self) -> String {
        match &self.cause {
            Some(cause) => format!("{}. {}", self.description, cause),
            None => self.description.clone(),
        }
    }
}

/// Result of one attempted record write inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Identity of the record the write targeted.
    pub record_id: String,
    /// `None` on success.
    pub error: Option<ErrorDetail>,
}

impl PersistOutcome {
    pub fn success(record_id: impl Into<String>) -> Self {
        Self { record_id: record_id.into(), error: None }
    }

    pub fn failure(record_id: impl Into<String>, detail: ErrorDetail) -> Self {
        Self { record_id: record_id.into(), error: Some(detail) }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Source of trigger rules.
pub trait RuleStore: Send + Sync {
    /// Return the rules matching an opaque where-clause. An empty result
    /// is not an error.
    fn search_rules(&self, where_clause: &str) -> Result<Vec<TriggerRule>, StoreError>;
}

/// Per-record-kind store adapter.
///
/// `persist_batch` performs one optimistic-lock check per `(record,
/// expected_version)` pair and returns one [`PersistOutcome`] per pair —
/// a version mismatch fails that record without aborting the rest of the
/// batch. An `Err` return is a systemic fault for the whole call.
pub trait RecordStore<R: ReportRecord>: Send + Sync {
    fn fetch(&self, query: &QueryParams) -> Result<Vec<R>, StoreError>;

    fn persist_batch(&self, batch: &[(R, i64)]) -> Result<Vec<PersistOutcome>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_message_joins_cause_with_period() {
        let detail = ErrorDetail::new("Version mismatch", Some("Optimistic lock error".to_string()));
        assert_eq!(detail.message(), "Version mismatch. Optimistic lock error");
    }

    #[test]
    fn error_detail_message_without_cause() {
        let detail = ErrorDetail::new("Invalid data", None);
        assert_eq!(detail.message(), "Invalid data");
    }

    #[test]
    fn persist_outcome_success_flag() {
        assert!(PersistOutcome::success("r1").is_success());
        assert!(!PersistOutcome::failure("r1", ErrorDetail::new("boom", None)).is_success());
    }
}

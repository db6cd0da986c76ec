//! # In-Memory Store Backend
//!
//! Concurrent reference implementation of the store traits, used by the CLI
//! and by the integration suite. Records live in a [`DashMap`] keyed by
//! record id; `persist_batch` performs per-record compare-and-swap against
//! the stored version token, reporting a per-record failure on mismatch
//! rather than failing the whole call.

use dashmap::DashMap;
use parking_lot::RwLock;

use regtag_core::{FieldValue, RecordKey, ReportRecord, TriggerRule};

use crate::query::Filter;
use crate::traits::{ErrorDetail, PersistOutcome, QueryParams, RecordStore, RuleStore, StoreError};

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

/// In-memory record store for one record variant.
#[derive(Debug, Default)]
pub struct MemoryRecordStore<R: ReportRecord> {
    records: DashMap<String, R>,
}

impl<R: ReportRecord> MemoryRecordStore<R> {
    pub fn new() -> Self {
        Self { records: DashMap::new() }
    }

    /// Insert or replace a record, keyed by its id.
    pub fn insert(&self, record: R) {
        self.records.insert(record.key().id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: ReportRecord> RecordStore<R> for MemoryRecordStore<R> {
    fn fetch(&self, query: &QueryParams) -> Result<Vec<R>, StoreError> {
        let filter = Filter::parse(&query.where_clause)?;
        let mut matched: Vec<R> = self
            .records
            .iter()
            .filter(|entry| filter.matches(|path| entry.value().field(path)))
            .map(|entry| entry.value().clone())
            .collect();
        // Deterministic order for callers and tests.
        matched.sort_by(|a, b| a.key().id.cmp(&b.key().id));
        Ok(matched)
    }

    fn persist_batch(&self, batch: &[(R, i64)]) -> Result<Vec<PersistOutcome>, StoreError> {
        let mut outcomes = Vec::with_capacity(batch.len());

        for (record, expected_version) in batch {
            let id = record.key().id.clone();
            let Some(mut entry) = self.records.get_mut(&id) else {
                outcomes.push(PersistOutcome::failure(
                    id,
                    ErrorDetail::new("Record not found", None),
                ));
                continue;
            };

            let stored_version = entry.value().key().version;
            if stored_version != *expected_version {
                outcomes.push(PersistOutcome::failure(
                    id,
                    ErrorDetail::new(
                        "Version mismatch",
                        Some(format!(
                            "optimistic lock error: expected version {expected_version}, found {stored_version}"
                        )),
                    ),
                ));
                continue;
            }

            let mut committed = record.clone();
            *committed.key_mut() = RecordKey::new(id.clone(), stored_version + 1);
            *entry.value_mut() = committed;
            outcomes.push(PersistOutcome::success(id));
        }

        Ok(outcomes)
    }
}

// ---------------------------------------------------------------------------
// Rule store
// ---------------------------------------------------------------------------

/// In-memory trigger-rule store.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: RwLock<Vec<TriggerRule>>,
}

impl MemoryRuleStore {
    pub fn new(rules: Vec<TriggerRule>) -> Self {
        Self { rules: RwLock::new(rules) }
    }

    pub fn insert(&self, rule: TriggerRule) {
        self.rules.write().push(rule);
    }
}

/// Resolve a filter path against a rule's own fields, for rule selection
/// clauses such as `primaryKey = 'RULE-1'`.
fn rule_field(rule: &TriggerRule, path: &str) -> Option<FieldValue> {
    match path {
        "primaryKey" => Some(FieldValue::Text(rule.primary_key.clone())),
        "recordType" => Some(FieldValue::Text(rule.record_kind.clone())),
        "action" => Some(FieldValue::Text(rule.action.clone())),
        "actionValue" => rule.action_value.clone().map(FieldValue::Text),
        "actionValueType" => rule.action_value_type.clone().map(FieldValue::Text),
        "indexHint" => rule.index_hint.clone().map(FieldValue::Text),
        "active" => Some(FieldValue::Text(rule.active.to_string())),
        _ => None,
    }
}

impl RuleStore for MemoryRuleStore {
    fn search_rules(&self, where_clause: &str) -> Result<Vec<TriggerRule>, StoreError> {
        let filter = Filter::parse(where_clause)?;
        Ok(self
            .rules
            .read()
            .iter()
            .filter(|rule| filter.matches(|path| rule_field(rule, path)))
            .cloned()
            .collect())
    }
}

//! Retrigger semantics and cross-run idempotency.
//!
//! Repeated runs over an overlapping window must not re-apply an action:
//! the second pass sees the first pass's issue reference (or category) on
//! the block and skips the record. Retrigger takes the caller's rule
//! selection as-is, including inactive rules.

use std::sync::Arc;

use chrono::Utc;
use regtag_core::{
    OutcomeStatus, ReconciliationReportRecord, RecordKey, RecordLifetime, TradeReportRecord,
    TransactionSubject, TriggerRule,
};
use regtag_engine::{AutoAssignmentEngine, EngineConfig};
use regtag_store::{MemoryRecordStore, MemoryRuleStore, RecordStore};
use uuid::Uuid;

fn rule(primary_key: &str, kind: &str, action: &str, active: bool) -> TriggerRule {
    TriggerRule {
        id: Uuid::new_v4(),
        primary_key: primary_key.to_string(),
        expression: match kind {
            "Reconciliation" => "reconType = 'Completeness'".to_string(),
            _ => "subjectIdentifier.transactionId = '135705760'".to_string(),
        },
        sub_expression: None,
        record_kind: kind.to_string(),
        action: action.to_string(),
        action_value: Some(if action == "Add Comment" {
            "breaks reviewed".to_string()
        } else {
            "GTR-3012".to_string()
        }),
        action_value_type: Some("Over Reporting".to_string()),
        active,
        last_success_at: "2021-11-02T06:38:10.841Z".parse().unwrap(),
        index_hint: None,
        max_volume: 10,
    }
}

fn trade(id: &str) -> TradeReportRecord {
    TradeReportRecord {
        key: RecordKey::new(id, 1),
        lifetime: RecordLifetime::live(Utc::now()),
        subject: TransactionSubject {
            transaction_id: "135705760".to_string(),
            source_system: "GDS GBLO".to_string(),
        },
        issue_tracking: None,
    }
}

fn engine_over(
    rules: Vec<TriggerRule>,
    trades: &Arc<MemoryRecordStore<TradeReportRecord>>,
    recons: &Arc<MemoryRecordStore<ReconciliationReportRecord>>,
) -> AutoAssignmentEngine {
    AutoAssignmentEngine::builder(
        EngineConfig::default(),
        Arc::new(MemoryRuleStore::new(rules)),
    )
    .with_store(Arc::clone(trades) as Arc<dyn RecordStore<TradeReportRecord>>)
    .with_store(Arc::clone(recons) as Arc<dyn RecordStore<ReconciliationReportRecord>>)
    .build()
}

#[test]
fn second_run_is_a_zero_write_success() {
    let trades = Arc::new(MemoryRecordStore::new());
    let recons = Arc::new(MemoryRecordStore::new());
    trades.insert(trade("t1"));
    let engine = engine_over(
        vec![rule("assign", "Trade Report", "Issue Assignment", true)],
        &trades,
        &recons,
    );

    let first = engine.auto_assign("").unwrap();
    assert_eq!(first[0].records_modified, 1);
    assert_eq!(trades.get("t1").unwrap().key.version, 2);

    let second = engine.auto_assign("").unwrap();
    assert_eq!(second[0].status, OutcomeStatus::Success);
    assert_eq!(second[0].records_modified, 0);
    // No double-append, no version churn.
    let record = trades.get("t1").unwrap();
    assert_eq!(record.key.version, 2);
    assert_eq!(
        record.issue_tracking.unwrap().issue_refs,
        Some(vec!["GTR-3012".to_string()]),
    );
}

#[test]
fn retrigger_runs_only_the_selected_subset() {
    let trades = Arc::new(MemoryRecordStore::new());
    let recons = Arc::new(MemoryRecordStore::new());
    trades.insert(trade("t1"));
    let engine = engine_over(
        vec![
            rule("selected", "Trade Report", "Issue Assignment", false),
            rule("other", "Trade Report", "Add Comment", true),
        ],
        &trades,
        &recons,
    );

    let outcomes = engine.re_trigger("primaryKey = 'selected'").unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].primary_key, "selected");
    assert_eq!(outcomes[0].records_modified, 1);

    // The unselected comment rule never ran.
    assert!(trades.get("t1").unwrap().issue_tracking.unwrap().comment.is_none());
}

#[test]
fn recon_add_comment_reapplies_on_every_run() {
    // Reconciliation AddComment is gated only on the presence of new text,
    // so a retrigger writes again even though the comment already matches.
    let trades = Arc::new(MemoryRecordStore::new());
    let recons = Arc::new(MemoryRecordStore::new());
    recons.insert(ReconciliationReportRecord {
        key: RecordKey::new("r1", 1),
        lifetime: RecordLifetime::live(Utc::now()),
        recon_type: "Completeness".to_string(),
        break_status: "UNPAIRED".to_string(),
        break_management: None,
    });
    let engine = engine_over(
        vec![rule("comment", "Reconciliation", "Add Comment", true)],
        &trades,
        &recons,
    );

    let first = engine.auto_assign("").unwrap();
    assert_eq!(first[0].records_modified, 1);
    assert_eq!(recons.get("r1").unwrap().key.version, 2);

    let second = engine.auto_assign("").unwrap();
    assert_eq!(second[0].records_modified, 1);
    assert_eq!(recons.get("r1").unwrap().key.version, 3);
}

#[test]
fn recon_assign_issue_is_idempotent() {
    let trades = Arc::new(MemoryRecordStore::new());
    let recons = Arc::new(MemoryRecordStore::new());
    recons.insert(ReconciliationReportRecord {
        key: RecordKey::new("r1", 1),
        lifetime: RecordLifetime::live(Utc::now()),
        recon_type: "Completeness".to_string(),
        break_status: "UNPAIRED".to_string(),
        break_management: None,
    });
    let engine = engine_over(
        vec![rule("assign", "Reconciliation", "Issue Assignment", true)],
        &trades,
        &recons,
    );

    assert_eq!(engine.auto_assign("").unwrap()[0].records_modified, 1);
    assert_eq!(engine.auto_assign("").unwrap()[0].records_modified, 0);
    let block = recons.get("r1").unwrap().break_management.unwrap();
    assert_eq!(block.issue_refs, Some(vec!["GTR-3012".to_string()]));
    assert_eq!(block.issue_category.as_deref(), Some("Over Reporting"));
}

//! Run orchestration.
//!
//! Selects trigger rules, groups them by record kind, dispatches each
//! group onto its own scoped worker thread (bounded by the five kinds),
//! and aggregates exactly one outcome per dispatched rule. Outcomes are
//! concatenated in fixed kind order so multi-kind runs report
//! deterministically regardless of which worker finishes first.
//!
//! Rules whose kind label is unknown, or whose kind has no registered
//! pipeline, are skipped with a warning and contribute no outcome.

use std::collections::HashMap;
use std::sync::Arc;

use regtag_core::{AssignmentOutcome, RecordKind, ReportRecord, TriggerRule};
use regtag_store::{RecordStore, RuleStore};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::pipeline::{KindPipeline, Pipeline};

pub struct AutoAssignmentEngine {
    rules: Arc<dyn RuleStore>,
    pipelines: HashMap<RecordKind, Box<dyn KindPipeline>>,
}

/// Builder registering one record store per kind the engine should handle.
pub struct EngineBuilder {
    config: EngineConfig,
    rules: Arc<dyn RuleStore>,
    pipelines: HashMap<RecordKind, Box<dyn KindPipeline>>,
}

impl EngineBuilder {
    pub fn with_store<R: ReportRecord>(mut self, store: Arc<dyn RecordStore<R>>) -> Self {
        let pipeline = Pipeline::<R>::new(&self.config, store);
        self.pipelines.insert(R::KIND, Box::new(pipeline));
        self
    }

    pub fn build(self) -> AutoAssignmentEngine {
        AutoAssignmentEngine { rules: self.rules, pipelines: self.pipelines }
    }
}

impl AutoAssignmentEngine {
    pub fn builder(config: EngineConfig, rules: Arc<dyn RuleStore>) -> EngineBuilder {
        EngineBuilder { config, rules, pipelines: HashMap::new() }
    }

    /// Full run: active rules matching the clause, one outcome each.
    pub fn auto_assign(&self, where_clause: &str) -> Result<Vec<AssignmentOutcome>, EngineError> {
        let mut rules = self.rules.search_rules(where_clause)?;
        rules.retain(|rule| rule.active);
        info!(rules = rules.len(), "auto-assignment run starting");
        Ok(self.run_rules(rules))
    }

    /// Retrigger: the caller's selection is taken as-is, active or not.
    pub fn re_trigger(&self, where_clause: &str) -> Result<Vec<AssignmentOutcome>, EngineError> {
        let rules = self.rules.search_rules(where_clause)?;
        info!(rules = rules.len(), "retrigger run starting");
        Ok(self.run_rules(rules))
    }

    fn run_rules(&self, rules: Vec<TriggerRule>) -> Vec<AssignmentOutcome> {
        let mut groups: HashMap<RecordKind, Vec<TriggerRule>> = HashMap::new();
        for rule in rules {
            match rule.kind() {
                Some(kind) if self.pipelines.contains_key(&kind) => {
                    groups.entry(kind).or_default().push(rule);
                }
                Some(kind) => {
                    warn!(rule = %rule.primary_key, %kind, "no pipeline for record kind, rule skipped");
                }
                None => {
                    warn!(
                        rule = %rule.primary_key,
                        label = %rule.record_kind,
                        "unknown record kind label, rule skipped",
                    );
                }
            }
        }

        let mut outcomes = Vec::new();
        std::thread::scope(|scope| {
            let workers: Vec<_> = RecordKind::ALL
                .iter()
                .filter_map(|kind| {
                    let group = groups.remove(kind)?;
                    let pipeline = &self.pipelines[kind];
                    Some(scope.spawn(move || {
                        group
                            .iter()
                            .map(|rule| pipeline.run_supervised(rule))
                            .collect::<Vec<_>>()
                    }))
                })
                .collect();
            // Join order is kind order, so aggregation is deterministic.
            for worker in workers {
                match worker.join() {
                    Ok(batch) => outcomes.extend(batch),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
        });
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use regtag_core::{
        OutcomeStatus, ReconciliationReportRecord, RecordKey, RecordLifetime, TradeReportRecord,
        TransactionSubject,
    };
    use regtag_store::{MemoryRecordStore, MemoryRuleStore};
    use uuid::Uuid;

    fn rule(primary_key: &str, kind: &str, expression: &str, active: bool) -> TriggerRule {
        TriggerRule {
            id: Uuid::new_v4(),
            primary_key: primary_key.to_string(),
            expression: expression.to_string(),
            sub_expression: None,
            record_kind: kind.to_string(),
            action: "Issue Assignment".to_string(),
            action_value: Some("GTR-3012".to_string()),
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

    fn recon(id: &str) -> ReconciliationReportRecord {
        ReconciliationReportRecord {
            key: RecordKey::new(id, 1),
            lifetime: RecordLifetime::live(Utc::now()),
            recon_type: "Completeness".to_string(),
            break_status: "UNPAIRED".to_string(),
            break_management: None,
        }
    }

    fn engine(
        rules: Vec<TriggerRule>,
        trades: Arc<MemoryRecordStore<TradeReportRecord>>,
        recons: Arc<MemoryRecordStore<ReconciliationReportRecord>>,
    ) -> AutoAssignmentEngine {
        AutoAssignmentEngine::builder(
            EngineConfig::default(),
            Arc::new(MemoryRuleStore::new(rules)),
        )
        .with_store(trades as Arc<dyn RecordStore<TradeReportRecord>>)
        .with_store(recons as Arc<dyn RecordStore<ReconciliationReportRecord>>)
        .build()
    }

    #[test]
    fn no_matching_rules_yields_empty_outcome_list() {
        let engine = engine(
            Vec::new(),
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MemoryRecordStore::new()),
        );
        assert!(engine.auto_assign("").unwrap().is_empty());
    }

    #[test]
    fn full_run_skips_inactive_rules() {
        let trades = Arc::new(MemoryRecordStore::new());
        trades.insert(trade("t1"));
        let engine = engine(
            vec![
                rule("active", "Trade Report", "subjectIdentifier.transactionId = '135705760'", true),
                rule("dormant", "Trade Report", "subjectIdentifier.transactionId = '135705760'", false),
            ],
            trades,
            Arc::new(MemoryRecordStore::new()),
        );

        let outcomes = engine.auto_assign("").unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].primary_key, "active");
    }

    #[test]
    fn retrigger_runs_inactive_rules_too() {
        let trades = Arc::new(MemoryRecordStore::new());
        trades.insert(trade("t1"));
        let engine = engine(
            vec![rule(
                "dormant",
                "Trade Report",
                "subjectIdentifier.transactionId = '135705760'",
                false,
            )],
            trades,
            Arc::new(MemoryRecordStore::new()),
        );

        let outcomes = engine.re_trigger("primaryKey = 'dormant'").unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, OutcomeStatus::Success);
        assert_eq!(outcomes[0].records_modified, 1);
    }

    #[test]
    fn unknown_kind_rules_contribute_no_outcome() {
        let trades = Arc::new(MemoryRecordStore::new());
        trades.insert(trade("t1"));
        let engine = engine(
            vec![
                rule("good", "Trade Report", "subjectIdentifier.transactionId = '135705760'", true),
                rule("bad", "Position Report", "x = 'y'", true),
            ],
            trades,
            Arc::new(MemoryRecordStore::new()),
        );

        let outcomes = engine.auto_assign("").unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].primary_key, "good");
    }

    #[test]
    fn outcomes_follow_fixed_kind_order() {
        let trades = Arc::new(MemoryRecordStore::new());
        trades.insert(trade("t1"));
        let recons = Arc::new(MemoryRecordStore::new());
        recons.insert(recon("r1"));

        // Reconciliation rule listed first; trade outcome still leads.
        let engine = engine(
            vec![
                rule("recon-rule", "Reconciliation", "reconType = 'Completeness'", true),
                rule("trade-rule", "Trade Report", "subjectIdentifier.transactionId = '135705760'", true),
            ],
            trades,
            recons,
        );

        let outcomes = engine.auto_assign("").unwrap();
        let keys: Vec<&str> = outcomes.iter().map(|o| o.primary_key.as_str()).collect();
        assert_eq!(keys, ["trade-rule", "recon-rule"]);
    }

    #[test]
    fn one_failing_rule_never_aborts_the_run() {
        let trades = Arc::new(MemoryRecordStore::new());
        trades.insert(trade("t1"));
        let engine = engine(
            vec![
                // Window matches nothing: empty fetch fails the rule.
                rule("empty", "Trade Report", "subjectIdentifier.transactionId = '404'", true),
                rule("ok", "Trade Report", "subjectIdentifier.transactionId = '135705760'", true),
            ],
            trades,
            Arc::new(MemoryRecordStore::new()),
        );

        let outcomes = engine.auto_assign("").unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
        assert_eq!(outcomes[1].status, OutcomeStatus::Success);
    }
}

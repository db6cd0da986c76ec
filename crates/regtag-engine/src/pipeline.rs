//! Per-kind rule pipeline.
//!
//! [`Pipeline`] wires fetcher, filter, applier, and persister over one
//! record variant's store. It exposes two call modes:
//!
//! - [`Pipeline::run_rule`] — direct: returns the error to the caller
//!   (used by fine-grained entry points outside the batch loop);
//! - [`Pipeline::run_supervised`] — supervised: converts any error into a
//!   `Failed` outcome so a run always yields exactly one outcome per rule.
//!
//! [`KindPipeline`] is the object-safe face the orchestrator dispatches
//! through, one boxed pipeline per registered record kind.

use std::sync::Arc;

use regtag_core::{AssignmentOutcome, RecordKind, ReportRecord, TriggerRule};
use regtag_store::RecordStore;
use tracing::{info, warn};

use crate::apply::ActionApplier;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::filter;
use crate::persist::BatchPersister;
use crate::window::WindowedFetcher;

pub struct Pipeline<R: ReportRecord> {
    store: Arc<dyn RecordStore<R>>,
    fetcher: WindowedFetcher,
    applier: ActionApplier,
    persister: BatchPersister,
}

impl<R: ReportRecord> Pipeline<R> {
    pub fn new(config: &EngineConfig, store: Arc<dyn RecordStore<R>>) -> Self {
        Self {
            store,
            fetcher: WindowedFetcher::new(config.window.clone()),
            applier: ActionApplier::new(config.actor.clone()),
            persister: BatchPersister::new(config.persist_batch_size),
        }
    }

    /// Run one rule end to end, propagating failures.
    pub fn run_rule(&self, rule: &TriggerRule) -> Result<AssignmentOutcome, EngineError> {
        let records = self.fetcher.fetch(self.store.as_ref(), rule)?;
        let fetched = records.len();

        let pairs = records
            .iter()
            .filter(|record| filter::should_apply(*record, rule))
            .map(|record| self.applier.apply(record, rule))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            rule = %rule.primary_key,
            fetched,
            eligible = pairs.len(),
            "rule window filtered",
        );

        let summary = self.persister.persist(self.store.as_ref(), &pairs)?;
        if summary.failed > 0 {
            Ok(AssignmentOutcome::partial(
                &rule.primary_key,
                summary.succeeded,
                format!("{} record write(s) failed the optimistic version check", summary.failed),
            ))
        } else {
            Ok(AssignmentOutcome::success(&rule.primary_key, summary.succeeded))
        }
    }

    /// Run one rule, converting any failure into a `Failed` outcome.
    pub fn run_supervised(&self, rule: &TriggerRule) -> AssignmentOutcome {
        match self.run_rule(rule) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(rule = %rule.primary_key, "rule run failed: {err}");
                AssignmentOutcome::failed(&rule.primary_key, err.to_string())
            }
        }
    }
}

/// Object-safe pipeline handle, one per registered record kind.
pub trait KindPipeline: Send + Sync {
    fn kind(&self) -> RecordKind;

    fn run_supervised(&self, rule: &TriggerRule) -> AssignmentOutcome;
}

impl<R: ReportRecord> KindPipeline for Pipeline<R> {
    fn kind(&self) -> RecordKind {
        R::KIND
    }

    fn run_supervised(&self, rule: &TriggerRule) -> AssignmentOutcome {
        Pipeline::run_supervised(self, rule)
    }
}

//! Batched optimistic persistence.
//!
//! Partitions (mutated record, previous version) pairs into fixed-size
//! batches and drives the store's compare-and-swap write batch by batch,
//! sequentially, so per-rule counters and log ordering stay deterministic.
//! A per-record failure inside a successful batch call reduces the success
//! count and emits one error line; a store-raised systemic fault stops the
//! remaining batches and propagates.

use std::time::Instant;

use regtag_core::ReportRecord;
use regtag_store::RecordStore;
use tracing::{error, info};

use crate::error::EngineError;

/// Accumulated counters of one persist pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct BatchPersister {
    batch_size: usize,
}

impl BatchPersister {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size: batch_size.max(1) }
    }

    /// Write all pairs, one batch call at a time.
    ///
    /// Empty input is a no-op: no store call, zeroed summary.
    pub fn persist<R: ReportRecord>(
        &self,
        store: &dyn RecordStore<R>,
        pairs: &[(R, i64)],
    ) -> Result<PersistSummary, EngineError> {
        if pairs.is_empty() {
            return Ok(PersistSummary::default());
        }

        let started = Instant::now();
        let mut summary = PersistSummary::default();

        for batch in pairs.chunks(self.batch_size) {
            let outcomes = store.persist_batch(batch)?;
            for outcome in &outcomes {
                summary.attempted += 1;
                match &outcome.error {
                    None => summary.succeeded += 1,
                    Some(detail) => {
                        summary.failed += 1;
                        error!(
                            record_id = %outcome.record_id,
                            "record write failed: {}",
                            detail.message(),
                        );
                    }
                }
            }
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            records = pairs.len(),
            "record batches persisted",
        );
        info!(
            total = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "optimistic write totals",
        );
        Ok(summary)
    }
}

//! # Dataset Loading
//!
//! A dataset file bundles trigger rules and the report records they run
//! against, in JSON or YAML (chosen by file extension). The CLI loads the
//! whole dataset into the in-memory stores and builds an engine over them.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use regtag_core::{
    CollateralLinkReportRecord, CollateralReportRecord, ReconciliationReportRecord, ReportRecord,
    TradeReportRecord, TriggerRule, ValuationReportRecord,
};
use regtag_engine::{AutoAssignmentEngine, EngineConfig};
use regtag_store::{MemoryRecordStore, MemoryRuleStore, RecordStore};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub rules: Vec<TriggerRule>,
    pub trade_reports: Vec<TradeReportRecord>,
    pub valuation_reports: Vec<ValuationReportRecord>,
    pub collateral_reports: Vec<CollateralReportRecord>,
    pub collateral_link_reports: Vec<CollateralLinkReportRecord>,
    pub reconciliation_reports: Vec<ReconciliationReportRecord>,
}

impl Dataset {
    /// Load a dataset file; `.yaml`/`.yml` parse as YAML, anything else
    /// as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading dataset {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
            }
            _ => serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display())),
        }
    }

    /// Build an engine over in-memory stores seeded from this dataset.
    pub fn into_engine(self, config: EngineConfig) -> AutoAssignmentEngine {
        AutoAssignmentEngine::builder(config, Arc::new(MemoryRuleStore::new(self.rules)))
            .with_store(seeded(self.trade_reports))
            .with_store(seeded(self.valuation_reports))
            .with_store(seeded(self.collateral_reports))
            .with_store(seeded(self.collateral_link_reports))
            .with_store(seeded(self.reconciliation_reports))
            .build()
    }
}

fn seeded<R: ReportRecord>(records: Vec<R>) -> Arc<dyn RecordStore<R>> {
    let store = MemoryRecordStore::new();
    for record in records {
        store.insert(record);
    }
    Arc::new(store)
}

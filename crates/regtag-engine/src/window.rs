//! Windowed record fetching.
//!
//! Composes a rule's match expression with the lifetime window bound and
//! fetches the matching records, enforcing the rule's volume cap. The
//! composed clause is an exact string contract: standard rules get the
//! substituted window template appended, reconciliation rules get the
//! expression, one space, then the sub-expression verbatim (empty when
//! absent — the trailing space is part of the contract).

use chrono::SecondsFormat;
use regtag_core::{RecordKind, ReportRecord, TriggerRule};
use regtag_store::{QueryParams, RecordStore};
use tracing::debug;

use crate::config::WindowConfig;
use crate::error::EngineError;

pub struct WindowedFetcher {
    window: WindowConfig,
}

impl WindowedFetcher {
    pub fn new(window: WindowConfig) -> Self {
        Self { window }
    }

    /// Compose the where-clause for a rule.
    pub fn clause_for(&self, rule: &TriggerRule) -> String {
        let template = match rule.kind() {
            Some(RecordKind::ReconciliationReport) => {
                return format!(
                    "{} {}",
                    rule.expression,
                    rule.sub_expression.as_deref().unwrap_or("")
                );
            }
            Some(kind) => self.window.template_for(kind),
            None => self.window.default_template.as_str(),
        };
        let from = rule
            .last_success_at
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        format!("{}{}", rule.expression, template.replace("{lifetimeFrom}", &from))
    }

    /// Fetch the rule's window of records.
    ///
    /// An empty result and a result larger than the rule's volume cap are
    /// both rule failures; neither reaches the persister.
    pub fn fetch<R: ReportRecord>(
        &self,
        store: &dyn RecordStore<R>,
        rule: &TriggerRule,
    ) -> Result<Vec<R>, EngineError> {
        let clause = self.clause_for(rule);
        debug!(rule = %rule.primary_key, %clause, "fetching rule window");

        let query = QueryParams::new(clause.clone(), rule.index_hint.clone());
        let records = store.fetch(&query)?;

        if records.is_empty() {
            return Err(EngineError::EmptyFetch { clause });
        }
        if records.len() > rule.max_volume as usize {
            return Err(EngineError::VolumeExceeded {
                found: records.len(),
                max_volume: rule.max_volume,
            });
        }
        Ok(records)
    }
}

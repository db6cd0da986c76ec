//! Action application.
//!
//! Mutates a record's tracking block for a matched rule, producing the
//! (mutated record, previous version) pair the persister needs. The
//! previous version is read before mutation and becomes the optimistic
//! write's expected version. The input record is never mutated in place;
//! the applier works on a clone so a failed persist leaves the fetched
//! record usable.

use chrono::Utc;
use regtag_core::{ActionKind, ReportRecord, TrackingMut, TriggerRule};

use crate::error::EngineError;

pub struct ActionApplier {
    actor: String,
}

impl ActionApplier {
    pub fn new(actor: impl Into<String>) -> Self {
        Self { actor: actor.into() }
    }

    /// Apply the rule's action to a copy of `record`.
    ///
    /// Errors here are invariant violations (unknown action label, missing
    /// action value) and propagate to the immediate caller; the supervised
    /// rule loop turns them into a failed outcome, direct callers see the
    /// error itself.
    pub fn apply<R: ReportRecord>(
        &self,
        record: &R,
        rule: &TriggerRule,
    ) -> Result<(R, i64), EngineError> {
        let action = rule.action_kind().ok_or_else(|| {
            EngineError::Mutation(format!(
                "rule {} has unknown action label '{}'",
                rule.primary_key, rule.action
            ))
        })?;
        let value = rule.action_value.as_deref().ok_or_else(|| {
            EngineError::Mutation(format!("rule {} has no action value", rule.primary_key))
        })?;

        let previous_version = record.key().version;
        let mut mutated = record.clone();

        match mutated.tracking_mut() {
            TrackingMut::Standard(slot) => {
                let block = slot.get_or_insert_with(Default::default);
                match action {
                    ActionKind::AssignIssue => {
                        block
                            .issue_refs
                            .get_or_insert_with(Vec::new)
                            .push(value.to_string());
                        block.issue_category = rule.action_category();
                    }
                    ActionKind::AddComment => {
                        block.comment = Some(value.to_string());
                    }
                }
                block.assigned_to = Some(self.actor.clone());
                block.last_action = Some(rule.action.clone());
                block.last_action_by = Some(self.actor.clone());
                block.last_action_at = Some(Utc::now());
            }
            TrackingMut::Break(slot) => {
                let block = slot.get_or_insert_with(Default::default);
                match action {
                    ActionKind::AssignIssue => {
                        block
                            .issue_refs
                            .get_or_insert_with(Vec::new)
                            .push(value.to_string());
                        block.issue_category = rule.action_value_type.clone();
                    }
                    ActionKind::AddComment => {
                        block.comment = Some(value.to_string());
                    }
                }
                block.assigned_to = Some(self.actor.clone());
            }
        }

        Ok((mutated, previous_version))
    }
}

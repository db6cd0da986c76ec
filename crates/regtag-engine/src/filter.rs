//! Idempotency filter.
//!
//! Decides whether a rule's action has already been recorded on a record,
//! so repeated runs over an overlapping window stay idempotent. A record
//! is skipped when the rule's action value is already in the block's
//! reference list, or the block's category equals the rule's action value
//! type. Absent fields never cause a match, only the absence of one; a
//! record with no tracking block at all is always eligible.
//!
//! Reconciliation records branch on action kind first: an unrecognized
//! action label is treated as already handled, and `AddComment` is gated
//! only on the presence of new text (existing comment content is never
//! compared).

use regtag_core::{ActionKind, ReportRecord, Tracking, TriggerRule};

/// Whether the rule's action should be applied to `record`.
pub fn should_apply<R: ReportRecord>(record: &R, rule: &TriggerRule) -> bool {
    match record.tracking() {
        Tracking::Standard(block) => match block {
            None => true,
            Some(block) => {
                let category = block.issue_category.map(|c| c.label().to_string());
                !already_applied(
                    rule.action_value.as_deref(),
                    block.issue_refs.as_deref(),
                    rule.action_value_type.as_deref(),
                    category.as_deref(),
                )
            }
        },
        Tracking::Break(block) => match rule.action_kind() {
            None => false,
            Some(ActionKind::AddComment) => rule.action_value.is_some(),
            Some(ActionKind::AssignIssue) => match block {
                None => true,
                Some(block) => !already_applied(
                    rule.action_value.as_deref(),
                    block.issue_refs.as_deref(),
                    rule.action_value_type.as_deref(),
                    block.issue_category.as_deref(),
                ),
            },
        },
    }
}

/// The shared id/category match: either half matches only when both its
/// comparator and the existing field are present.
fn already_applied(
    value: Option<&str>,
    existing_refs: Option<&[String]>,
    value_type: Option<&str>,
    existing_category: Option<&str>,
) -> bool {
    let id_match = match (value, existing_refs) {
        (Some(v), Some(refs)) => refs.iter().any(|r| r == v),
        _ => false,
    };
    let type_match = match (value_type, existing_category) {
        (Some(t), Some(c)) => c == t,
        _ => false,
    };
    id_match || type_match
}

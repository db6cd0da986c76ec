//! # Assignment Outcomes
//!
//! One [`AssignmentOutcome`] per trigger rule per run, regardless of how the
//! rule fared — the engine never aborts a run because one rule failed.
//! Outcomes are created fresh each run and never persisted by the core.

use serde::{Deserialize, Serialize};

/// Terminal status of a rule's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failed,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Per-rule result of one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    /// Copied from the rule's primary key.
    pub primary_key: String,
    pub records_modified: usize,
    pub status: OutcomeStatus,
    /// Diagnostic detail, populated only on failure or partial conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl AssignmentOutcome {
    /// Clean success with no diagnostic comment.
    pub fn success(primary_key: impl Into<String>, records_modified: usize) -> Self {
        Self {
            primary_key: primary_key.into(),
            records_modified,
            status: OutcomeStatus::Success,
            comment: None,
        }
    }

    /// Success with a partial-condition diagnostic (some records failed
    /// their optimistic write but the batch calls themselves succeeded).
    pub fn partial(
        primary_key: impl Into<String>,
        records_modified: usize,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            primary_key: primary_key.into(),
            records_modified,
            status: OutcomeStatus::Success,
            comment: Some(comment.into()),
        }
    }

    /// Failure: zero records credited, diagnostic comment attached.
    pub fn failed(primary_key: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            primary_key: primary_key.into(),
            records_modified: 0,
            status: OutcomeStatus::Failed,
            comment: Some(comment.into()),
        }
    }
}

//! Engine error taxonomy.
//!
//! Every variant maps to one failure class of a rule run. The supervised
//! rule loop converts these into `Failed` outcomes with the error's display
//! text as the diagnostic comment; the direct entry points propagate them.

use regtag_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Fetched record count exceeded the rule's hard cap. Persistence is
    /// never attempted for the rule. Callers match on the "more than
    /// maxVolume" phrase in the rendered message.
    #[error("Total records found are more than maxVolume: found {found}, maxVolume {max_volume}")]
    VolumeExceeded { found: usize, max_volume: u32 },

    /// The composed window clause matched no records at all.
    #[error("no records found for the composed window clause: {clause}")]
    EmptyFetch { clause: String },

    /// Invariant violation while mutating a record's tracking block, e.g.
    /// a rule with no action value. Not caught by the supervised loop's
    /// per-step handling; it fails the rule like any other error but is
    /// surfaced as-is from the direct mutation entry points.
    #[error("mutation error: {0}")]
    Mutation(String),

    /// Fetch or batch-write call against the store raised. Per-record
    /// compare-and-swap failures are NOT this variant; those come back as
    /// unsuccessful persist outcomes and only reduce the modified count.
    #[error(transparent)]
    Store(#[from] StoreError),
}

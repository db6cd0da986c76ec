//! # regtag-store
//!
//! Store boundary of the auto-assignment engine: the [`RuleStore`] and
//! [`RecordStore`] traits the engine fetches and persists through, the
//! conjunctive filter matcher the reference backend evaluates composed
//! where-clauses with, and the in-memory backend used by the CLI and test
//! suites.
//!
//! The engine composes where-clauses and treats them as opaque; only a
//! backend needs to interpret them. Persistence is optimistic: each record
//! carries the version token it was fetched at, and a backend rejects the
//! write of any record whose stored version has since moved, reporting the
//! conflict per record instead of failing the batch call.

pub mod memory;
pub mod query;
pub mod traits;

pub use memory::{MemoryRecordStore, MemoryRuleStore};
pub use query::{Condition, Filter, Literal, Op};
pub use traits::{ErrorDetail, PersistOutcome, QueryParams, RecordStore, RuleStore, StoreError};

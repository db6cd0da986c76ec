//! # regtag-engine
//!
//! The auto-assignment engine: scans regulatory report records matching
//! user-defined trigger rules and applies each rule's tagging action
//! exactly once per record, persisting mutations under optimistic
//! concurrency control.
//!
//! Data flow, per rule: [`window::WindowedFetcher`] composes the rule's
//! match expression with the lifetime window bound and fetches the
//! candidate records; [`filter::should_apply`] drops records already
//! carrying the rule's action; [`apply::ActionApplier`] mutates copies of
//! the survivors; [`persist::BatchPersister`] writes them in fixed-size
//! compare-and-swap batches. [`orchestrator::AutoAssignmentEngine`] drives
//! the loop, one [`AssignmentOutcome`](regtag_core::AssignmentOutcome) per
//! rule per run — a run never aborts because one rule failed.

pub mod apply;
pub mod config;
pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod persist;
pub mod pipeline;
pub mod window;

pub use apply::ActionApplier;
pub use config::{EngineConfig, WindowConfig, DEFAULT_ACTOR, DEFAULT_PERSIST_BATCH_SIZE, DEFAULT_WINDOW_TEMPLATE};
pub use error::EngineError;
pub use filter::should_apply;
pub use orchestrator::{AutoAssignmentEngine, EngineBuilder};
pub use persist::{BatchPersister, PersistSummary};
pub use pipeline::{KindPipeline, Pipeline};
pub use window::WindowedFetcher;

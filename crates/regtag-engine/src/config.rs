//! Engine configuration.

use std::collections::HashMap;

use regtag_core::RecordKind;
use serde::{Deserialize, Serialize};

/// Actor name stamped on tracking blocks when no override is configured.
pub const DEFAULT_ACTOR: &str = "auto-assignment";

/// Default number of record writes per compare-and-swap batch call.
pub const DEFAULT_PERSIST_BATCH_SIZE: usize = 100;

/// Default lifetime-bound suffix appended to a rule's match expression.
///
/// `{lifetimeFrom}` is substituted with the rule's last-success timestamp;
/// the `_df.lifetimeTo` bound selects live record versions only (open-ended
/// sentinel).
pub const DEFAULT_WINDOW_TEMPLATE: &str =
    " and _df.lifetimeFrom >= '{lifetimeFrom}' and _df.lifetimeTo >= 9223372036854775807L";

/// Window-bound templates, a per-kind override table over one default.
///
/// Reconciliation rules never get a lifetime bound, so an override for that
/// kind has no effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub default_template: String,
    pub overrides: HashMap<RecordKind, String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_template: DEFAULT_WINDOW_TEMPLATE.to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl WindowConfig {
    pub fn template_for(&self, kind: RecordKind) -> &str {
        self.overrides
            .get(&kind)
            .map(String::as_str)
            .unwrap_or(&self.default_template)
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name stamped into `assigned_to` / `last_action_by` on applied blocks.
    pub actor: String,
    pub persist_batch_size: usize,
    pub window: WindowConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            actor: DEFAULT_ACTOR.to_string(),
            persist_batch_size: DEFAULT_PERSIST_BATCH_SIZE,
            window: WindowConfig::default(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// One entry in the activation-history ring (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationHistoryEntry {
    pub entity_id: EntityId,
    pub activation: f64,
    /// What produced this entry, e.g. `"spread"`, `"seed"`.
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

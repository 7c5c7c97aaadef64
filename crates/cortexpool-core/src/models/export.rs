use serde::{Deserialize, Serialize};

use crate::models::{ActivationHistoryEntry, CoReference, Entity, Fact, PoolEntry, Topic};

/// Snapshot/debug export format (spec §6 "Export format").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportDocument {
    pub entities: Vec<Entity>,
    pub facts: Vec<Fact>,
    pub pool: Vec<PoolEntry>,
    pub topics: Vec<Topic>,
    #[serde(rename = "coReferences")]
    pub co_references: Vec<CoReference>,
    #[serde(rename = "activationHistory")]
    pub activation_history: Vec<ActivationHistoryEntry>,
}

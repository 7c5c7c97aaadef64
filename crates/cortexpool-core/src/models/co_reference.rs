use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// A pronoun → entity binding valid for a short time window
/// (spec §3 "Co-reference").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoReference {
    /// Normalized pronoun (closed set, see spec §4.8).
    pub pronoun: String,
    pub entity_id: EntityId,
    pub context: String,
    pub last_seen: DateTime<Utc>,
}

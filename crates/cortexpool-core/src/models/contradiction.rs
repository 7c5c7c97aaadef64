use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::FactId;

/// A recorded pair of facts that share `(subject, predicate)` but differ in
/// content (spec §3 "Contradiction").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    pub fact1_id: FactId,
    pub fact2_id: FactId,
    pub detected_at: DateTime<Utc>,
}

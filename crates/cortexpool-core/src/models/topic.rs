use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A string observed in a query, with an EMA-like recency weight
/// (spec §3 "Topic").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub topic: String,
    pub weight: f64,
    pub last_seen: DateTime<Utc>,
}

impl Topic {
    /// `weight ← 0.9·weight + 1.0` on each sighting (spec §3).
    pub fn observe(&mut self, now: DateTime<Utc>) {
        self.weight = 0.9 * self.weight + 1.0;
        self.last_seen = now;
    }
}

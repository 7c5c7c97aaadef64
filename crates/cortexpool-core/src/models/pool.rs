use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::FactId;

/// One scored fact in the materialized pool (spec §3 "Pool").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub fact_id: FactId,
    pub relevance_score: f64,
    pub added_at: DateTime<Utc>,
}

/// The bounded, ordered current result set, replaced atomically on every
/// retrieval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pool {
    pub entries: Vec<PoolEntry>,
}

impl Pool {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_sorted_descending(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].relevance_score >= w[1].relevance_score)
    }
}

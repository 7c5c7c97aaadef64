use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, FactId};
use crate::models::Tier;

/// A directed, typed edge between entities with attached content
/// (spec §3 "Fact").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub subject_id: EntityId,
    pub predicate: String,
    /// Unary facts (no object) are allowed.
    pub object_id: Option<EntityId>,
    pub content: String,
    pub tier: Tier,
    pub importance: f64,
    pub confidence: f64,
    pub source: String,
    pub last_used: DateTime<Utc>,
    pub use_count: i64,
    pub created_at: DateTime<Utc>,
    /// Duration in ms; fact expires at `created_at + ttl`.
    pub ttl_ms: Option<i64>,
}

impl Fact {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.ttl_ms
            .map(|ttl| self.created_at + chrono::Duration::milliseconds(ttl))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at(), Some(exp) if exp < now)
    }

    /// Bump importance by +0.1 capped at 1.0, update usage metadata
    /// (spec §4.3 `useFact`).
    pub fn record_use(&mut self, now: DateTime<Utc>) {
        self.importance = (self.importance + 0.1).min(1.0);
        self.last_used = now;
        self.use_count += 1;
    }
}

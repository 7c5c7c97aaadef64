use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row appended after a `reflect()` run (spec §4.7 step 6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionLogEntry {
    pub id: i64,
    pub ran_at: DateTime<Utc>,
    pub contradictions_found: i64,
    pub entities_merged: i64,
    pub facts_compressed: i64,
    /// Free-form phase-level detail (e.g. which phase failed and why),
    /// kept as JSON since the shape varies per phase (spec §7: each phase's
    /// failure is logged here rather than aborting the pass).
    pub details: serde_json::Value,
}

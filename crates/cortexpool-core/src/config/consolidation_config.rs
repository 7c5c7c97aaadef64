use serde::{Deserialize, Serialize};

/// Thresholds used by the reflection/maintenance pass (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Fuzzy-match threshold for duplicate-entity grouping sanity checks (spec §4.2: 0.8).
    pub entity_merge_threshold: f64,
    /// Content similarity above which two same-subject/predicate semantic
    /// facts are merged (spec §4.7 step 4: 0.85).
    pub similar_fact_threshold: f64,
    /// Minimum age, in days, before a semantic fact is eligible for summarization (spec §4.7: 90).
    pub summarization_min_age_days: i64,
    /// Minimum importance for summarization eligibility (spec §4.7: 0.3).
    pub summarization_min_importance: f64,
    /// Minimum use count for summarization eligibility (spec §4.7: 3).
    pub summarization_min_use_count: i64,
    /// Minimum content length for summarization eligibility (spec §4.7: 50).
    pub summarization_min_content_len: usize,
    /// Length of the retained prefix in a summarized fact's content (spec §4.7: 100).
    pub summarization_prefix_len: usize,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            entity_merge_threshold: 0.8,
            similar_fact_threshold: 0.85,
            summarization_min_age_days: 90,
            summarization_min_importance: 0.3,
            summarization_min_use_count: 3,
            summarization_min_content_len: 50,
            summarization_prefix_len: 100,
        }
    }
}

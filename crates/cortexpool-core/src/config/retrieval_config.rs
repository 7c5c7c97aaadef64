use serde::{Deserialize, Serialize};

/// Activation spread + relevance-scoring configuration (spec §4.4, §4.5, §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Default bounded pool size (spec §3: 15).
    pub pool_size: usize,
    /// Activation spread depth (spec §4.4: 2).
    pub spread_depth: usize,
    /// Per-layer geometric decay (spec §4.4: 0.5).
    pub spread_decay: f64,
    /// Activation floor below which spreading stops propagating further (spec §4.4: 0.01).
    pub activation_floor: f64,
    /// Edge weight for the `related-to` predicate (spec §4.4: 0.7, else 1.0).
    pub related_to_edge_weight: f64,
    /// Hourly decay applied to activation with no recent history entry (spec §4.4: 0.05).
    pub activation_idle_decay: f64,
    /// Weight given the graph score in hybrid retrieval (spec §4.6: 0.7).
    pub hybrid_graph_weight: f64,
    /// Weight given the vector score in hybrid retrieval (spec §4.6: 0.3).
    pub hybrid_vector_weight: f64,
    /// Cap on the in-memory activation-history ring (spec §3: 1000).
    pub activation_history_ring: usize,
    /// How many of the most recent activation-history entries are persisted
    /// per spread pass (spec §4.4: 100).
    pub activation_history_persist: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            pool_size: 15,
            spread_depth: 2,
            spread_decay: 0.5,
            activation_floor: 0.01,
            related_to_edge_weight: 0.7,
            activation_idle_decay: 0.05,
            hybrid_graph_weight: 0.7,
            hybrid_vector_weight: 0.3,
            activation_history_ring: 1000,
            activation_history_persist: 100,
        }
    }
}

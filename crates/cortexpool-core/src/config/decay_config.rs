use serde::{Deserialize, Serialize};

use crate::models::Tier;

/// Per-tier decay parameters, from spec §3's tier configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierDefaults {
    /// Fractional importance lost per hour of disuse.
    pub decay_rate_per_hour: f64,
    /// Importance a fact is created with.
    pub base_importance: f64,
    /// Maximum age before the fact is eligible for eviction; `None` = unbounded.
    pub max_age_hours: Option<f64>,
}

/// Decay-pass configuration: one `TierDefaults` per tier, plus the
/// importance floor below which a fact is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    pub episodic: TierDefaults,
    pub semantic: TierDefaults,
    pub structural: TierDefaults,
    /// Facts with importance below this are deleted during decay (spec §3: 0.1).
    pub importance_floor: f64,
    /// Default TTL for episodic facts with none supplied (spec §3: 7 days).
    pub episodic_default_ttl_ms: i64,
}

impl DecayConfig {
    pub fn for_tier(&self, tier: Tier) -> TierDefaults {
        match tier {
            Tier::Episodic => self.episodic,
            Tier::Semantic => self.semantic,
            Tier::Structural => self.structural,
        }
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            episodic: TierDefaults {
                decay_rate_per_hour: 0.1,
                base_importance: 0.3,
                max_age_hours: Some(24.0),
            },
            semantic: TierDefaults {
                decay_rate_per_hour: 0.01,
                base_importance: 0.6,
                max_age_hours: Some(24.0 * 365.0),
            },
            structural: TierDefaults {
                decay_rate_per_hour: 0.001,
                base_importance: 0.8,
                max_age_hours: None,
            },
            importance_floor: 0.1,
            episodic_default_ttl_ms: 7 * 24 * 60 * 60 * 1000,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Co-reference tracker configuration (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Validity window for a cached pronoun binding, in minutes (spec §4.8: 30).
    pub binding_ttl_minutes: i64,
    /// Cap on the in-memory cache (bounded cache, mirrors the activation
    /// history ring's bounded-growth policy).
    pub cache_capacity: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            binding_ttl_minutes: 30,
            cache_capacity: 10_000,
        }
    }
}

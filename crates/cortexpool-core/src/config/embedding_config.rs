use serde::{Deserialize, Serialize};

/// Configuration for the optional HTTP vector backend (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub dimensions: usize,
    pub request_timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            dimensions: 384,
            request_timeout_ms: 2_000,
        }
    }
}

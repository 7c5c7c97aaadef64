pub mod consolidation_config;
pub mod decay_config;
pub mod embedding_config;
pub mod retrieval_config;
pub mod session_config;
pub mod storage_config;

use serde::{Deserialize, Serialize};

pub use consolidation_config::ConsolidationConfig;
pub use decay_config::{DecayConfig, TierDefaults};
pub use embedding_config::EmbeddingConfig;
pub use retrieval_config::RetrievalConfig;
pub use session_config::SessionConfig;
pub use storage_config::StorageConfig;

/// Top-level configuration aggregating every subsystem config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CortexConfig {
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub decay: DecayConfig,
    pub consolidation: ConsolidationConfig,
    pub session: SessionConfig,
    pub embedding: EmbeddingConfig,
}

impl CortexConfig {
    /// Load config from a TOML string, falling back to defaults for missing
    /// fields (every leaf config is `#[serde(default)]`).
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

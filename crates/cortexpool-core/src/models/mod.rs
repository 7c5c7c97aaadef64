mod activation;
mod co_reference;
mod contradiction;
mod entity;
mod export;
mod fact;
mod pool;
mod reflection_log;
mod topic;

pub use activation::ActivationHistoryEntry;
pub use co_reference::CoReference;
pub use contradiction::Contradiction;
pub use entity::{Entity, EntityType};
pub use export::ExportDocument;
pub use fact::Fact;
pub use pool::{Pool, PoolEntry};
pub use reflection_log::ReflectionLogEntry;
pub use topic::Topic;

/// Lifetime class of a fact; governs default importance, decay rate and
/// maximum age (spec §3 tier configuration table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Episodic,
    Semantic,
    Structural,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Episodic => "episodic",
            Tier::Semantic => "semantic",
            Tier::Structural => "structural",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "episodic" => Some(Tier::Episodic),
            "semantic" => Some(Tier::Semantic),
            "structural" => Some(Tier::Structural),
            _ => None,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// A named node in the memory graph (spec §3 "Entity").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Original surface form as first observed.
    pub name: String,
    /// Lowercased, trimmed, whitespace-collapsed form. Unique across entities.
    pub canonical_name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Every surface form ever observed. Insertion order is preserved for
    /// display; membership is the only thing that matters semantically.
    pub aliases: Vec<String>,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl Entity {
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }
}

/// Closed set of entity types (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Person,
    Project,
    Concept,
    Tool,
    Preference,
    Website,
    Other,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Project => "project",
            EntityType::Concept => "concept",
            EntityType::Tool => "tool",
            EntityType::Preference => "preference",
            EntityType::Website => "website",
            EntityType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "person" => Some(EntityType::Person),
            "project" => Some(EntityType::Project),
            "concept" => Some(EntityType::Concept),
            "tool" => Some(EntityType::Tool),
            "preference" => Some(EntityType::Preference),
            "website" => Some(EntityType::Website),
            "other" => Some(EntityType::Other),
            _ => None,
        }
    }

    /// Relevance-scorer type prior (spec §4.5).
    pub fn type_prior(self) -> f64 {
        match self {
            EntityType::Person | EntityType::Project => 0.15,
            EntityType::Preference => 0.2,
            EntityType::Tool => 0.1,
            EntityType::Concept => 0.05,
            EntityType::Website | EntityType::Other => 0.0,
        }
    }
}

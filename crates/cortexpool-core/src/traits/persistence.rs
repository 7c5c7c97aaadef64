use chrono::{DateTime, Utc};

use crate::errors::CortexResult;
use crate::ids::{EntityId, FactId};
use crate::models::{
    ActivationHistoryEntry, CoReference, Contradiction, Entity, EntityType, ExportDocument, Fact,
    PoolEntry, ReflectionLogEntry, Tier, Topic,
};

/// Fields needed to insert a brand-new entity; `id`, `created_at` are
/// assigned by the adapter.
#[derive(Debug, Clone)]
pub struct EntityDraft {
    pub name: String,
    pub canonical_name: String,
    pub entity_type: EntityType,
    pub aliases: Vec<String>,
    pub confidence: f64,
}

/// Fields needed to insert a brand-new fact; `id`, `last_used`,
/// `created_at` are assigned by the adapter.
#[derive(Debug, Clone)]
pub struct FactDraft {
    pub subject_id: EntityId,
    pub predicate: String,
    pub object_id: Option<EntityId>,
    pub content: String,
    pub tier: Tier,
    pub importance: f64,
    pub confidence: f64,
    pub source: String,
    pub ttl_ms: Option<i64>,
}

/// Typed CRUD over entities, facts, pool, topics, reflections,
/// co-references and activation history (spec §6 "Persistence backend").
///
/// Implementations own the transactional semantics of the backing store;
/// every method here is a single logical unit of work.
pub trait IPersistenceAdapter: Send + Sync {
    // --- Entities ---
    fn insert_entity(&self, draft: EntityDraft, now: DateTime<Utc>) -> CortexResult<Entity>;
    fn update_entity(&self, entity: &Entity) -> CortexResult<()>;
    fn get_entity(&self, id: EntityId) -> CortexResult<Option<Entity>>;
    fn get_entity_by_canonical_name(&self, canonical_name: &str) -> CortexResult<Option<Entity>>;
    fn list_entities(&self) -> CortexResult<Vec<Entity>>;
    /// Delete an entity outright (only reflection's duplicate-consolidation
    /// phase does this, per spec §3 entity lifecycle).
    fn delete_entity(&self, id: EntityId) -> CortexResult<()>;

    // --- Facts ---
    fn insert_fact(&self, draft: FactDraft, now: DateTime<Utc>) -> CortexResult<Fact>;
    fn update_fact(&self, fact: &Fact) -> CortexResult<()>;
    fn get_fact(&self, id: FactId) -> CortexResult<Option<Fact>>;
    fn list_facts(&self) -> CortexResult<Vec<Fact>>;
    fn delete_fact(&self, id: FactId) -> CortexResult<()>;
    /// Point every fact referencing `from` (as subject or object) at `to`.
    /// Used by duplicate-entity consolidation (spec §4.7 step 3).
    fn rewrite_fact_entity_refs(&self, from: EntityId, to: EntityId) -> CortexResult<()>;

    // --- Pool ---
    fn replace_pool(&self, entries: &[PoolEntry]) -> CortexResult<()>;
    fn get_pool(&self) -> CortexResult<Vec<PoolEntry>>;

    // --- Topics ---
    fn upsert_topic(&self, topic: &Topic) -> CortexResult<()>;
    fn get_topic(&self, topic: &str) -> CortexResult<Option<Topic>>;
    fn list_topics(&self) -> CortexResult<Vec<Topic>>;

    // --- Contradictions ---
    fn insert_contradiction(&self, contradiction: &Contradiction) -> CortexResult<()>;
    fn list_contradictions(&self) -> CortexResult<Vec<Contradiction>>;

    // --- Reflections ---
    fn append_reflection_log(&self, entry: &ReflectionLogEntry) -> CortexResult<()>;
    fn list_reflection_log(&self) -> CortexResult<Vec<ReflectionLogEntry>>;

    // --- Co-references ---
    fn upsert_co_reference(&self, co_reference: &CoReference) -> CortexResult<()>;
    fn get_co_reference(&self, pronoun: &str) -> CortexResult<Option<CoReference>>;
    fn list_co_references(&self) -> CortexResult<Vec<CoReference>>;

    // --- Activation history ---
    /// Persist the most recent slice of a spread pass (spec §4.4: at most
    /// `cap` entries, append-only; see spec §9 for the unspecified
    /// compaction policy this leaves open).
    fn append_activation_history(
        &self,
        entries: &[ActivationHistoryEntry],
        cap: usize,
    ) -> CortexResult<()>;
    fn get_activation_history(
        &self,
        entity_id: EntityId,
        since: DateTime<Utc>,
    ) -> CortexResult<Vec<ActivationHistoryEntry>>;
    fn list_activation_history(&self) -> CortexResult<Vec<ActivationHistoryEntry>>;

    /// Snapshot/debug export (spec §6 "Export format").
    fn export(&self) -> CortexResult<ExportDocument> {
        Ok(ExportDocument {
            entities: self.list_entities()?,
            facts: self.list_facts()?,
            pool: self.get_pool()?,
            topics: self.list_topics()?,
            co_references: self.list_co_references()?,
            activation_history: self.list_activation_history()?,
        })
    }
}

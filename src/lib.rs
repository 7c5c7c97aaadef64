//! CortexPool: a persistent, graph-structured memory engine for a
//! conversational agent (spec §1). Stores facts as typed edges between
//! named entities, stratifies them by lifetime tier, and — given a set of
//! current conversation topics — returns a bounded, ranked pool of the
//! facts most relevant to that context.
//!
//! [`CortexEngine`] wires together the independently-usable subsystem
//! crates (`cortexpool-entities`, `cortexpool-memory`, `cortexpool-graph`,
//! `cortexpool-retrieval`, `cortexpool-consolidation`, `cortexpool-session`)
//! into the single entry point described by spec §2's data-flow diagram.

use std::sync::Arc;

use cortexpool_core::config::CortexConfig;
use cortexpool_core::errors::CortexResult;
use cortexpool_core::ids::{EntityId, FactId};
use cortexpool_core::models::{Entity, EntityType, Fact, ExportDocument};
use cortexpool_core::traits::IPersistenceAdapter;
use cortexpool_consolidation::{Consolidator, ReflectionReport};
use cortexpool_entities::{EntityResolver, MergeSuggestion};
use cortexpool_memory::{AddFactInput, FactStore};
use cortexpool_retrieval::{HydratedFact, RetrievalPipeline};
use cortexpool_session::CoReferenceTracker;
use cortexpool_storage::SqliteAdapter;

/// Installs a `tracing-subscriber` env-filter subscriber. Optional: a
/// library does not install a global subscriber on its own, so embedding
/// applications call this only if they want CortexPool's own `tracing`
/// spans surfaced (spec §9 ambient stack).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// The single-owner facade over every CortexPool subsystem (spec §5: not
/// `Sync`-wrapped internally — callers serialize access themselves).
pub struct CortexEngine {
    adapter: Arc<dyn IPersistenceAdapter>,
    resolver: EntityResolver,
    facts: FactStore,
    retrieval: RetrievalPipeline,
    consolidator: Consolidator,
    co_references: CoReferenceTracker,
    current_topics: Option<Vec<String>>,
    config: CortexConfig,
}

impl CortexEngine {
    /// Opens (or creates) a SQLite-backed engine at `path` (use `:memory:`
    /// for a transient instance).
    pub fn open(path: &str, config: CortexConfig) -> CortexResult<Self> {
        let adapter: Arc<dyn IPersistenceAdapter> = Arc::new(SqliteAdapter::open(path)?);
        Ok(Self::from_adapter(adapter, config))
    }

    fn from_adapter(adapter: Arc<dyn IPersistenceAdapter>, config: CortexConfig) -> Self {
        Self {
            resolver: EntityResolver::new(adapter.clone()),
            facts: FactStore::new(adapter.clone(), config.decay.clone()),
            retrieval: RetrievalPipeline::new(adapter.clone(), config.retrieval.clone()),
            consolidator: Consolidator::new(adapter.clone(), config.decay.clone(), config.consolidation.clone()),
            co_references: CoReferenceTracker::new(adapter.clone(), config.session.clone()),
            current_topics: None,
            config,
            adapter,
        }
    }

    // --- Entity Resolver (spec §4.2) ---

    pub fn resolve_entity(&self, query: &str) -> CortexResult<Option<Entity>> {
        self.resolver.resolve_entity(query)
    }

    pub fn add_entity(&self, name: &str, entity_type: EntityType, confidence: f64) -> CortexResult<Entity> {
        self.resolver.add_entity(name, entity_type, confidence)
    }

    pub fn find_fuzzy_matches(&self, query: &str, threshold: f64) -> CortexResult<Vec<(Entity, f64)>> {
        self.resolver.find_fuzzy_matches(query, threshold)
    }

    pub fn suggest_entity_merges(&self, threshold: f64) -> CortexResult<Vec<MergeSuggestion>> {
        self.resolver.suggest_entity_merges(threshold)
    }

    // --- Fact Store (spec §4.3) ---

    pub fn add_fact(&self, input: AddFactInput) -> CortexResult<Fact> {
        self.facts.add_fact(input)
    }

    pub fn use_fact(&self, id: FactId) -> CortexResult<Fact> {
        self.facts.use_fact(id)
    }

    pub fn bulk_add(&self, inputs: Vec<AddFactInput>) -> CortexResult<Vec<Fact>> {
        self.facts.bulk_add(inputs)
    }

    // --- Retrieval Pipeline (spec §4.6) ---

    /// spec §2 data flow: `topics -> resolve entities -> seed activation ->
    /// spread -> score every fact -> pick top K -> write pool snapshot ->
    /// return enriched facts`.
    pub fn retrieve(&mut self, topics: &[String]) -> CortexResult<Vec<HydratedFact>> {
        self.current_topics = Some(topics.to_vec());
        self.retrieval.retrieve(topics, self.config.retrieval.pool_size)
    }

    pub fn retrieve_with_pool_size(&mut self, topics: &[String], pool_size: usize) -> CortexResult<Vec<HydratedFact>> {
        self.current_topics = Some(topics.to_vec());
        self.retrieval.retrieve(topics, pool_size)
    }

    // --- Reflection/Maintenance (spec §4.7, §4.9) ---

    /// spec §4.7 `reflect()`. Refreshes the pool against the most recently
    /// retrieved topics, if any (spec §4.7 step 5).
    pub fn reflect(&mut self) -> CortexResult<ReflectionReport> {
        let topics = self.current_topics.clone();
        self.consolidator.reflect(
            topics.as_deref(),
            Some(&mut self.retrieval),
            self.config.retrieval.pool_size,
        )
    }

    pub fn cleanup_expired_episodic(&self) -> CortexResult<i64> {
        cortexpool_consolidation::cleanup_expired_episodic(self.adapter.as_ref())
    }

    // --- Co-reference Tracker (spec §4.8) ---

    pub fn add_co_reference(&self, pronoun: &str, entity_id: EntityId, context: &str) -> CortexResult<()> {
        self.co_references.add_co_reference(pronoun, entity_id, context)
    }

    pub fn resolve_co_reference(&self, pronoun: &str, current_context: &[String]) -> CortexResult<Option<Entity>> {
        self.co_references.resolve_co_reference(pronoun, current_context)
    }

    // --- Export (spec §6) ---

    pub fn export(&self) -> CortexResult<ExportDocument> {
        self.adapter.export()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::models::Tier;

    fn engine() -> CortexEngine {
        CortexEngine::open(":memory:", CortexConfig::default()).unwrap()
    }

    #[test]
    fn add_fact_then_retrieve_surfaces_the_fact() {
        let mut eng = engine();
        eng.add_fact(AddFactInput::new("William", "is", "a developer")).unwrap();

        let results = eng.retrieve(&["William".to_string()]).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].subject.canonical_name, "william");
    }

    #[test]
    fn reflect_after_retrieve_refreshes_the_pool() {
        let mut eng = engine();
        eng.add_fact(AddFactInput::new("William", "is", "a developer")).unwrap();
        eng.retrieve(&["William".to_string()]).unwrap();

        let report = eng.reflect().unwrap();
        assert_eq!(report.contradictions, 0);
    }

    #[test]
    fn expired_episodic_fact_is_evicted_explicitly() {
        let eng = engine();
        eng.add_fact(
            AddFactInput::new("William", "mentioned", "the weather")
                .with_tier(Tier::Episodic),
        )
        .unwrap();
        // default episodic TTL is 7 days out, so nothing is evicted yet.
        assert_eq!(eng.cleanup_expired_episodic().unwrap(), 0);
    }
}

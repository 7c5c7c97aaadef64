//! # cortexpool-test-fixtures
//!
//! Shared, dev-only fixtures: a fully wired in-memory engine stack so the
//! other crates' integration tests don't each re-derive the same
//! `Arc<dyn IPersistenceAdapter>` plumbing.

use std::sync::Arc;

use cortexpool_core::config::CortexConfig;
use cortexpool_core::traits::IPersistenceAdapter;
use cortexpool_consolidation::Consolidator;
use cortexpool_entities::EntityResolver;
use cortexpool_memory::FactStore;
use cortexpool_retrieval::RetrievalPipeline;
use cortexpool_session::CoReferenceTracker;
use cortexpool_storage::SqliteAdapter;

/// A full, in-memory CortexPool stack wired with default configuration,
/// for use in other crates' test suites.
pub struct Fixture {
    pub adapter: Arc<dyn IPersistenceAdapter>,
    pub resolver: EntityResolver,
    pub facts: FactStore,
    pub retrieval: RetrievalPipeline,
    pub consolidator: Consolidator,
    pub co_references: CoReferenceTracker,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(CortexConfig::default())
    }

    pub fn with_config(config: CortexConfig) -> Self {
        let adapter: Arc<dyn IPersistenceAdapter> = Arc::new(SqliteAdapter::in_memory().expect("in-memory sqlite"));
        Self {
            resolver: EntityResolver::new(adapter.clone()),
            facts: FactStore::new(adapter.clone(), config.decay.clone()),
            retrieval: RetrievalPipeline::new(adapter.clone(), config.retrieval.clone()),
            consolidator: Consolidator::new(adapter.clone(), config.decay.clone(), config.consolidation.clone()),
            co_references: CoReferenceTracker::new(adapter.clone(), config.session.clone()),
            adapter,
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

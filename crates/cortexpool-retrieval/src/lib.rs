//! # cortexpool-retrieval
//!
//! Relevance scoring (spec §4.5) and the retrieval pipeline (spec §4.6):
//! topic binding -> activation spread -> scoring -> top-K pool
//! materialization, with an optional hybrid vector merge.

mod pipeline;
mod scorer;

pub use pipeline::{HydratedFact, RetrievalPipeline};
pub use scorer::RelevanceScorer;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cortexpool_core::config::{DecayConfig, RetrievalConfig};
    use cortexpool_core::errors::{CortexError, CortexResult};
    use cortexpool_core::ids::FactId;
    use cortexpool_core::traits::IPersistenceAdapter;
    use cortexpool_core::traits::IVectorBackend;
    use cortexpool_memory::{AddFactInput, FactStore};
    use cortexpool_storage::SqliteAdapter;

    fn pipeline() -> (RetrievalPipeline, FactStore) {
        let adapter: Arc<dyn IPersistenceAdapter> = Arc::new(SqliteAdapter::in_memory().unwrap());
        let store = FactStore::new(adapter.clone(), DecayConfig::default());
        let pipeline = RetrievalPipeline::new(adapter, RetrievalConfig::default());
        (pipeline, store)
    }

    #[test]
    fn retrieve_bounds_results_to_pool_size() {
        let (mut pipeline, store) = pipeline();
        for i in 0..20 {
            store
                .add_fact(AddFactInput::new(format!("Entity{i}"), "is", "a thing"))
                .unwrap();
        }
        let results = pipeline.retrieve(&["Entity1".to_string()], 5).unwrap();
        assert!(results.len() <= 5);
    }

    #[test]
    fn retrieve_ranks_topic_matches_above_unrelated_facts() {
        let (mut pipeline, store) = pipeline();
        store
            .add_fact(AddFactInput::new("William", "is", "a developer"))
            .unwrap();
        store
            .add_fact(AddFactInput::new("Unrelated", "is", "something else"))
            .unwrap();

        let results = pipeline.retrieve(&["William".to_string()], 10).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].subject.canonical_name, "william");
    }

    struct FailingVectorBackend;

    impl IVectorBackend for FailingVectorBackend {
        async fn embed(&self, _text: &str) -> CortexResult<Vec<f32>> {
            Err(CortexError::Invalid("no embedder configured".to_string()))
        }

        async fn search_by_vector(&self, _query_text: &str, _limit: usize) -> CortexResult<Vec<(FactId, f64)>> {
            Err(CortexError::Invalid("vector backend unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn hybrid_retrieval_falls_back_to_graph_only_on_vector_error() {
        let (mut pipeline, store) = pipeline();
        store
            .add_fact(AddFactInput::new("William", "is", "a developer"))
            .unwrap();

        let backend = FailingVectorBackend;
        let results = pipeline
            .retrieve_hybrid(&["William".to_string()], &backend, 10)
            .await
            .unwrap();
        assert!(!results.is_empty());
    }

    proptest::proptest! {
        /// spec §8: "every `score` returned by retrieve is in `[0, 1]`" and
        /// "`|pool| <= poolSize` after every retrieve; pool is sorted
        /// descending by score".
        #[test]
        fn prop_retrieve_bounds_score_and_pool_size(fact_count in 0usize..12, pool_size in 1usize..10) {
            let (mut pipeline, store) = pipeline();
            for i in 0..fact_count {
                store
                    .add_fact(AddFactInput::new(format!("Entity{i}"), "is", "a thing"))
                    .unwrap();
            }

            let results = pipeline
                .retrieve(&["Entity0".to_string()], pool_size)
                .unwrap();

            proptest::prop_assert!(results.len() <= pool_size);
            for window in results.windows(2) {
                proptest::prop_assert!(window[0].score >= window[1].score);
            }
            for hf in &results {
                proptest::prop_assert!((0.0..=1.0).contains(&hf.score));
            }
        }
    }
}

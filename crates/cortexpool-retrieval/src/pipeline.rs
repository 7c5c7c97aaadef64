//! Orchestrates topic binding -> spread -> score -> top-K pool
//! materialization (spec §4.6), with an optional hybrid vector merge.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use cortexpool_core::config::RetrievalConfig;
use cortexpool_core::errors::CortexResult;
use cortexpool_core::ids::EntityId;
use cortexpool_core::models::{Entity, Fact, Pool, PoolEntry};
use cortexpool_core::traits::{IPersistenceAdapter, IVectorBackend};
use cortexpool_entities::EntityResolver;
use cortexpool_graph::ActivationEngine;

use crate::scorer::RelevanceScorer;

/// A scored fact hydrated with its subject and (if present) object entity
/// (spec §4.6 step 5).
#[derive(Debug, Clone)]
pub struct HydratedFact {
    pub fact: Fact,
    pub subject: Entity,
    pub object: Option<Entity>,
    pub score: f64,
}

pub struct RetrievalPipeline {
    adapter: Arc<dyn IPersistenceAdapter>,
    resolver: EntityResolver,
    engine: ActivationEngine,
    config: RetrievalConfig,
}

impl RetrievalPipeline {
    pub fn new(adapter: Arc<dyn IPersistenceAdapter>, config: RetrievalConfig) -> Self {
        let resolver = EntityResolver::new(adapter.clone());
        let engine = ActivationEngine::new(adapter.clone(), config.clone());
        Self {
            adapter,
            resolver,
            engine,
            config,
        }
    }

    /// spec §4.6 `retrieve`: binds topics, spreads activation, scores every
    /// fact, replaces the persisted pool with the top `pool_size` entries,
    /// and returns them hydrated.
    pub fn retrieve(&mut self, topics: &[String], pool_size: usize) -> CortexResult<Vec<HydratedFact>> {
        self.engine.set_topics(topics, &self.resolver)?;
        let facts = self.adapter.list_facts()?;
        self.engine.spread(&facts)?;

        let entities = self.load_entity_cache(&facts)?;
        let now = Utc::now();

        let mut scored: Vec<(Fact, f64)> = facts
            .into_iter()
            .filter_map(|fact| {
                let subject = entities.get(&fact.subject_id)?;
                let activation = self.engine.activation_of(fact.subject_id);
                let score = RelevanceScorer::score(&fact, subject, topics, activation, now);
                Some((fact, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(pool_size);

        let pool = Pool {
            entries: scored
                .iter()
                .map(|(fact, score)| PoolEntry {
                    fact_id: fact.id,
                    relevance_score: *score,
                    added_at: now,
                })
                .collect(),
        };
        debug_assert!(pool.is_sorted_descending(), "pool must stay sorted descending by score");
        self.adapter.replace_pool(&pool.entries)?;

        let hydrated = scored
            .into_iter()
            .filter_map(|(fact, score)| {
                let subject = entities.get(&fact.subject_id)?.clone();
                let object = fact.object_id.and_then(|id| entities.get(&id).cloned());
                Some(HydratedFact {
                    fact,
                    subject,
                    object,
                    score,
                })
            })
            .collect();

        Ok(hydrated)
    }

    /// spec §4.6 "Hybrid variant": merges graph scores with a vector
    /// backend's `(factId, vScore)` results. Falls back silently to
    /// graph-only results on any vector backend error.
    pub async fn retrieve_hybrid<V: IVectorBackend>(
        &mut self,
        topics: &[String],
        vector_backend: &V,
        pool_size: usize,
    ) -> CortexResult<Vec<HydratedFact>> {
        let graph_results = self.retrieve(topics, pool_size)?;

        let query = topics.join(" ");
        let vector_hits = match vector_backend.search_by_vector(&query, pool_size).await {
            Ok(hits) => hits,
            Err(err) => {
                tracing::warn!(error = %err, "vector backend failed, falling back to graph-only retrieval");
                return Ok(graph_results);
            }
        };

        let graph_weight = self.config.hybrid_graph_weight;
        let vector_weight = self.config.hybrid_vector_weight;

        let mut combined: HashMap<_, (HydratedFact, f64)> = graph_results
            .into_iter()
            .map(|hf| {
                let fact_id = hf.fact.id;
                let graph_score = hf.score;
                (fact_id, (hf, graph_score * graph_weight))
            })
            .collect();

        for (fact_id, v_score) in vector_hits {
            if let Some((hf, score)) = combined.get_mut(&fact_id) {
                *score += v_score * vector_weight;
                hf.score = *score;
            } else if let Some(fact) = self.adapter.get_fact(fact_id)? {
                if let Some(subject) = self.adapter.get_entity(fact.subject_id)? {
                    let object = match fact.object_id {
                        Some(id) => self.adapter.get_entity(id)?,
                        None => None,
                    };
                    let score = v_score * vector_weight;
                    combined.insert(
                        fact_id,
                        (
                            HydratedFact {
                                fact,
                                subject,
                                object,
                                score,
                            },
                            score,
                        ),
                    );
                }
            }
        }

        let mut results: Vec<HydratedFact> = combined.into_values().map(|(hf, _)| hf).collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(pool_size);
        Ok(results)
    }

    /// Current activation of `id` after the most recent `retrieve` call
    /// (spec §8 scenario 3: "non-zero activation after spread").
    pub fn activation_of(&self, id: EntityId) -> f64 {
        self.engine.activation_of(id)
    }

    fn load_entity_cache(&self, facts: &[Fact]) -> CortexResult<HashMap<EntityId, Entity>> {
        let mut cache = HashMap::new();
        for fact in facts {
            if !cache.contains_key(&fact.subject_id) {
                if let Some(entity) = self.adapter.get_entity(fact.subject_id)? {
                    cache.insert(entity.id, entity);
                }
            }
            if let Some(object_id) = fact.object_id {
                if !cache.contains_key(&object_id) {
                    if let Some(entity) = self.adapter.get_entity(object_id)? {
                        cache.insert(entity.id, entity);
                    }
                }
            }
        }
        Ok(cache)
    }
}

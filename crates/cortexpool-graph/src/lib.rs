//! # cortexpool-graph
//!
//! Topic-seeded spreading activation over the fact graph (spec §4.4): depth,
//! decay, edge weighting, and a bounded activation-history ring.

mod indexed_graph;

pub use indexed_graph::{EdgeWeight, IndexedGraph};

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use cortexpool_core::config::RetrievalConfig;
use cortexpool_core::errors::CortexResult;
use cortexpool_core::ids::EntityId;
use cortexpool_core::models::{ActivationHistoryEntry, Fact, Topic};
use cortexpool_core::traits::IPersistenceAdapter;
use cortexpool_entities::EntityResolver;
use cortexpool_similarity::normalize;

/// Topic-seeded activation state and spreading logic (spec §4.4).
pub struct ActivationEngine {
    adapter: Arc<dyn IPersistenceAdapter>,
    config: RetrievalConfig,
    history_ring_cap: usize,
    history_persist_cap: usize,
    activation: HashMap<EntityId, f64>,
    history_ring: VecDeque<ActivationHistoryEntry>,
}

impl ActivationEngine {
    pub fn new(adapter: Arc<dyn IPersistenceAdapter>, config: RetrievalConfig) -> Self {
        Self {
            adapter,
            history_ring_cap: config.activation_history_ring,
            history_persist_cap: config.activation_history_persist,
            config,
            activation: HashMap::new(),
            history_ring: VecDeque::new(),
        }
    }

    pub fn activation_of(&self, id: EntityId) -> f64 {
        self.activation.get(&id).copied().unwrap_or(0.0)
    }

    pub fn activation_map(&self) -> &HashMap<EntityId, f64> {
        &self.activation
    }

    /// spec §4.4 `setTopics`: clears the activation map, bumps topic
    /// weights (EMA-like, spec §3), and seeds `activation[e] = 1.0` for
    /// every topic that resolves to an entity.
    pub fn set_topics(&mut self, topics: &[String], resolver: &EntityResolver) -> CortexResult<Vec<Topic>> {
        self.activation.clear();
        let now = Utc::now();
        let mut observed = Vec::with_capacity(topics.len());

        for raw in topics {
            let canonical = normalize(raw);
            let mut topic = self
                .adapter
                .get_topic(&canonical)?
                .unwrap_or(Topic {
                    topic: canonical,
                    weight: 0.0,
                    last_seen: now,
                });
            topic.observe(now);
            self.adapter.upsert_topic(&topic)?;

            if let Some(entity) = resolver.resolve_entity(raw)? {
                self.activation.insert(entity.id, 1.0);
            }
            observed.push(topic);
        }
        Ok(observed)
    }

    /// spec §4.4 spreading activation: builds a fresh `IndexedGraph` from
    /// `facts`, then propagates `depth` layers with per-layer `decay`,
    /// merging element-wise max; finally applies idle decay and records
    /// history.
    pub fn spread(&mut self, facts: &[Fact]) -> CortexResult<()> {
        let graph = IndexedGraph::from_facts(facts);
        let depth = self.config.spread_depth;
        let decay = self.config.spread_decay;
        let floor = self.config.activation_floor;

        for layer in 0..depth {
            let mut next: HashMap<EntityId, f64> = HashMap::new();
            for (&entity, &act) in self.activation.iter() {
                if act < floor {
                    continue;
                }
                for (neighbor, edge) in graph.neighbors_with_edge(entity) {
                    if neighbor == entity {
                        continue;
                    }
                    let edge_weight = if edge.predicate == "related-to" {
                        self.config.related_to_edge_weight
                    } else {
                        1.0
                    };
                    let proposed = act * decay.powi((layer + 1) as i32) * edge_weight;
                    next.entry(neighbor)
                        .and_modify(|v| *v = v.max(proposed))
                        .or_insert(proposed);
                }
            }
            for (entity, proposed) in next {
                self.activation
                    .entry(entity)
                    .and_modify(|cur| *cur = cur.max(proposed))
                    .or_insert(proposed);
            }
        }

        self.apply_idle_decay();
        self.record_history()?;
        Ok(())
    }

    /// spec §4.4 "decay after spread": entities with no history entry in
    /// the last hour lose `activation_idle_decay` fraction; drop below the
    /// activation floor.
    fn apply_idle_decay(&mut self) {
        let cutoff = Utc::now() - Duration::hours(1);
        let decay = self.config.activation_idle_decay;
        let floor = self.config.activation_floor;

        let had_recent_history: HashMap<EntityId, bool> = self
            .activation
            .keys()
            .map(|&id| {
                let recent = self
                    .history_ring
                    .iter()
                    .any(|entry| entry.entity_id == id && entry.timestamp >= cutoff);
                (id, recent)
            })
            .collect();

        self.activation.retain(|id, value| {
            if !had_recent_history.get(id).copied().unwrap_or(false) {
                *value *= 1.0 - decay;
            }
            *value >= floor
        });
    }

    fn record_history(&mut self) -> CortexResult<()> {
        let now = Utc::now();
        let fresh: Vec<ActivationHistoryEntry> = self
            .activation
            .iter()
            .map(|(&entity_id, &activation)| ActivationHistoryEntry {
                entity_id,
                activation,
                source: "spread".to_string(),
                timestamp: now,
            })
            .collect();

        for entry in &fresh {
            self.history_ring.push_back(entry.clone());
        }
        while self.history_ring.len() > self.history_ring_cap {
            self.history_ring.pop_front();
        }

        let persisted: Vec<ActivationHistoryEntry> = self
            .history_ring
            .iter()
            .rev()
            .take(self.history_persist_cap)
            .cloned()
            .collect();
        self.adapter
            .append_activation_history(&persisted, self.history_persist_cap)?;
        Ok(())
    }

    /// spec §4.4 `getActivationHistory`: filters the in-memory ring.
    pub fn activation_history(&self, entity_id: EntityId, since: DateTime<Utc>) -> Vec<ActivationHistoryEntry> {
        self.history_ring
            .iter()
            .filter(|entry| entry.entity_id == entity_id && entry.timestamp >= since)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_memory::{AddFactInput, FactStore};
    use cortexpool_storage::SqliteAdapter;

    fn engine_and_store() -> (ActivationEngine, FactStore, EntityResolver, Arc<dyn IPersistenceAdapter>) {
        let adapter: Arc<dyn IPersistenceAdapter> = Arc::new(SqliteAdapter::in_memory().unwrap());
        let engine = ActivationEngine::new(adapter.clone(), RetrievalConfig::default());
        let store = FactStore::new(adapter.clone(), cortexpool_core::config::DecayConfig::default());
        let resolver = EntityResolver::new(adapter.clone());
        (engine, store, resolver, adapter)
    }

    #[test]
    fn seeded_topic_gets_full_activation() {
        let (mut engine, store, resolver, _adapter) = engine_and_store();
        store
            .add_fact(AddFactInput::new("William", "is", "a developer"))
            .unwrap();
        let william = resolver.resolve_entity("William").unwrap().unwrap();

        engine.set_topics(&["William".to_string()], &resolver).unwrap();
        assert_eq!(engine.activation_of(william.id), 1.0);
    }

    #[test]
    fn spread_reaches_two_hop_neighbor_with_decayed_activation() {
        let (mut engine, store, resolver, adapter) = engine_and_store();
        store
            .add_fact(AddFactInput::new("William", "created", "made OpenLiam").with_object("OpenLiam"))
            .unwrap();
        store
            .add_fact(AddFactInput::new("OpenLiam", "runs-on", "runs on Rust").with_object("Rust"))
            .unwrap();

        let william = resolver.resolve_entity("William").unwrap().unwrap();
        let rust = resolver.resolve_entity("Rust").unwrap().unwrap();

        engine.set_topics(&["William".to_string()], &resolver).unwrap();
        let facts = adapter.list_facts().unwrap();
        engine.spread(&facts).unwrap();

        assert!(engine.activation_of(william.id) > 0.0);
        assert!(engine.activation_of(rust.id) > 0.0);
        assert!(engine.activation_of(rust.id) < engine.activation_of(william.id));
    }

    #[test]
    fn activation_never_exceeds_one_and_never_negative() {
        let (mut engine, store, resolver, adapter) = engine_and_store();
        store
            .add_fact(AddFactInput::new("William", "related-to", "related to Rust").with_object("Rust"))
            .unwrap();
        engine.set_topics(&["William".to_string()], &resolver).unwrap();
        let facts = adapter.list_facts().unwrap();
        engine.spread(&facts).unwrap();
        for &v in engine.activation_map().values() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    /// Builds a `related-to` cycle over `n` entities (`e0 -> e1 -> ... ->
    /// e(n-1) -> e0`) and seeds activation at `e0` (spec §9: "cycles are
    /// expected"; traversal is bounded by `depth` and the activation floor,
    /// so cycles terminate).
    fn cyclic_chain(n: usize) -> (ActivationEngine, EntityResolver, Arc<dyn IPersistenceAdapter>) {
        let adapter: Arc<dyn IPersistenceAdapter> = Arc::new(SqliteAdapter::in_memory().unwrap());
        let engine = ActivationEngine::new(adapter.clone(), RetrievalConfig::default());
        let store = FactStore::new(adapter.clone(), cortexpool_core::config::DecayConfig::default());
        let resolver = EntityResolver::new(adapter.clone());
        for i in 0..n {
            let next = (i + 1) % n;
            store
                .add_fact(
                    AddFactInput::new(format!("e{i}"), "related-to", format!("e{i} relates to e{next}"))
                        .with_object(format!("e{next}")),
                )
                .unwrap();
        }
        (engine, resolver, adapter)
    }

    proptest::proptest! {
        #[test]
        fn prop_spread_over_cycles_terminates_within_bounds(n in 2usize..8) {
            let (mut engine, resolver, adapter) = cyclic_chain(n);
            engine.set_topics(&["e0".to_string()], &resolver).unwrap();
            let facts = adapter.list_facts().unwrap();
            engine.spread(&facts).unwrap();

            for &v in engine.activation_map().values() {
                proptest::prop_assert!((0.0..=1.0).contains(&v));
            }
            // termination: spread() returned at all, over a graph with a
            // cycle, bounded by `depth` layers regardless of `n`.
            proptest::prop_assert!(engine.activation_map().len() <= n);
        }
    }
}

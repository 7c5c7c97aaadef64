//! Petgraph-backed entity graph, keyed by `EntityId` (spec §9 design notes).
//!
//! Mirrors the teacher's `cortex-causal::graph::stable_graph::IndexedGraph`
//! bimap shape, minus DAG enforcement — this graph is expected to contain
//! cycles (spec §9).

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Direction;

use cortexpool_core::ids::EntityId;
use cortexpool_core::models::Fact;

/// Edge payload: just the predicate that produced the edge. Multiple facts
/// between the same pair of entities collapse onto distinct parallel edges
/// (`StableGraph` is a multigraph), one per originating fact.
#[derive(Debug, Clone)]
pub struct EdgeWeight {
    pub predicate: String,
}

/// A fact graph indexed by `EntityId`, built fresh from the current fact
/// list on every spread pass.
pub struct IndexedGraph {
    graph: StableGraph<EntityId, EdgeWeight>,
    index: HashMap<EntityId, NodeIndex>,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Rebuild a graph from the current fact list: one node per entity that
    /// appears as a subject or object, one edge per fact with a non-null
    /// object.
    pub fn from_facts(facts: &[Fact]) -> Self {
        let mut graph = Self::new();
        for fact in facts {
            let subject_idx = graph.ensure_node(fact.subject_id);
            if let Some(object_id) = fact.object_id {
                let object_idx = graph.ensure_node(object_id);
                graph.graph.add_edge(
                    subject_idx,
                    object_idx,
                    EdgeWeight {
                        predicate: fact.predicate.clone(),
                    },
                );
            }
        }
        graph
    }

    pub fn ensure_node(&mut self, id: EntityId) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.index.insert(id, idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every fact-derived neighbor of `id`, whether `id` appears as subject
    /// or object of the originating fact (spec §4.4: "enumerate all facts
    /// where it appears as subject or object").
    pub fn neighbors_with_edge(&self, id: EntityId) -> Vec<(EntityId, &EdgeWeight)> {
        let Some(&idx) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut result = Vec::new();

        for neighbor_idx in self.graph.neighbors_directed(idx, Direction::Outgoing) {
            if let Some(edge_idx) = self.graph.find_edge(idx, neighbor_idx) {
                if let (Some(&neighbor), Some(weight)) = (
                    self.graph.node_weight(neighbor_idx),
                    self.graph.edge_weight(edge_idx),
                ) {
                    result.push((neighbor, weight));
                }
            }
        }
        for neighbor_idx in self.graph.neighbors_directed(idx, Direction::Incoming) {
            if let Some(edge_idx) = self.graph.find_edge(neighbor_idx, idx) {
                if let (Some(&neighbor), Some(weight)) = (
                    self.graph.node_weight(neighbor_idx),
                    self.graph.edge_weight(edge_idx),
                ) {
                    result.push((neighbor, weight));
                }
            }
        }
        result
    }
}

impl Default for IndexedGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::ids::FactId;
    use cortexpool_core::models::Tier;
    use chrono::Utc;

    fn fact(subject: i64, predicate: &str, object: Option<i64>) -> Fact {
        let now = Utc::now();
        Fact {
            id: FactId(1),
            subject_id: EntityId(subject),
            predicate: predicate.to_string(),
            object_id: object.map(EntityId),
            content: String::new(),
            tier: Tier::Semantic,
            importance: 0.6,
            confidence: 0.7,
            source: "conversation".to_string(),
            last_used: now,
            use_count: 0,
            created_at: now,
            ttl_ms: None,
        }
    }

    #[test]
    fn unary_fact_adds_a_node_but_no_edge() {
        let graph = IndexedGraph::from_facts(&[fact(1, "is", None)]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn neighbors_are_visible_from_both_endpoints() {
        let graph = IndexedGraph::from_facts(&[fact(1, "created", Some(2))]);
        let from_subject = graph.neighbors_with_edge(EntityId(1));
        let from_object = graph.neighbors_with_edge(EntityId(2));
        assert_eq!(from_subject.len(), 1);
        assert_eq!(from_subject[0].0, EntityId(2));
        assert_eq!(from_object.len(), 1);
        assert_eq!(from_object[0].0, EntityId(1));
    }

    #[test]
    fn self_loop_fact_does_not_panic() {
        let graph = IndexedGraph::from_facts(&[fact(1, "related-to", Some(1))]);
        let neighbors = graph.neighbors_with_edge(EntityId(1));
        assert_eq!(neighbors.len(), 2); // seen once outgoing, once incoming
    }
}

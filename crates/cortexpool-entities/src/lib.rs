//! # cortexpool-entities
//!
//! Entity resolution (spec §4.2): exact / alias / fuzzy lookup, and entity
//! creation with alias accumulation and confidence blending.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use cortexpool_core::errors::CortexResult;
use cortexpool_core::ids::EntityId;
use cortexpool_core::models::{Entity, EntityType};
use cortexpool_core::traits::{EntityDraft, IPersistenceAdapter};
use cortexpool_similarity::{normalize, similarity};

/// A candidate duplicate-entity pair surfaced by `suggest_entity_merges`
/// (spec §4.2).
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSuggestion {
    pub entity1: EntityId,
    pub entity2: EntityId,
    pub similarity: f64,
    pub reason: String,
}

/// Exact / alias / fuzzy entity lookup and creation (spec §4.2).
pub struct EntityResolver {
    adapter: Arc<dyn IPersistenceAdapter>,
}

impl EntityResolver {
    pub fn new(adapter: Arc<dyn IPersistenceAdapter>) -> Self {
        Self { adapter }
    }

    /// At most one entity, trying in order: exact canonical match, alias
    /// substring match, fuzzy match (threshold 0.8, ties broken by higher
    /// similarity then lower id).
    pub fn resolve_entity(&self, query: &str) -> CortexResult<Option<Entity>> {
        let canonical = normalize(query);

        if let Some(entity) = self.adapter.get_entity_by_canonical_name(&canonical)? {
            tracing::debug!(query, "resolved entity by exact canonical match");
            return Ok(Some(entity));
        }

        let entities = self.adapter.list_entities()?;

        if let Some(entity) = entities.iter().find(|e| {
            e.aliases
                .iter()
                .any(|alias| alias_matches(&canonical, alias))
        }) {
            tracing::debug!(query, "resolved entity by alias substring match");
            return Ok(Some(entity.clone()));
        }

        let mut fuzzy = self.rank_fuzzy(&entities, &canonical, 0.8);
        if let Some((entity, score)) = fuzzy.pop() {
            tracing::debug!(query, score, "resolved entity by fuzzy match");
            return Ok(Some(entity));
        }

        Ok(None)
    }

    /// Scan all entities, taking the max of similarity against the
    /// canonical name and every alias (normalized); keep those at or above
    /// `threshold`, sorted descending (spec §4.2 `findFuzzyMatches`).
    pub fn find_fuzzy_matches(&self, query: &str, threshold: f64) -> CortexResult<Vec<(Entity, f64)>> {
        let canonical = normalize(query);
        let entities = self.adapter.list_entities()?;
        let mut ranked = self.rank_fuzzy(&entities, &canonical, threshold);
        ranked.reverse(); // rank_fuzzy returns ascending (best last); callers want descending
        Ok(ranked)
    }

    /// Internal helper returning matches **ascending** by score (best last,
    /// ties broken by higher id last) so `resolve_entity` can `pop()` the
    /// single best match cheaply.
    fn rank_fuzzy(&self, entities: &[Entity], canonical: &str, threshold: f64) -> Vec<(Entity, f64)> {
        let mut scored: Vec<(Entity, f64)> = entities
            .iter()
            .filter_map(|e| {
                let mut best = similarity(canonical, &e.canonical_name);
                for alias in &e.aliases {
                    best = best.max(similarity(canonical, &normalize(alias)));
                }
                if best >= threshold {
                    Some((e.clone(), best))
                } else {
                    None
                }
            })
            .collect();

        // Descending by score, ties broken by lower id first — then reverse
        // so the ascending form used internally has the best match last.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id.get().cmp(&b.0.id.get()))
        });
        scored.reverse();
        scored
    }

    /// Resolve-or-create: if an entity with the same canonical name exists,
    /// append the alias if novel and blend confidence as an arithmetic
    /// mean; type is never overwritten on re-observation. Otherwise insert
    /// a new entity (spec §4.2 `addEntity`).
    pub fn add_entity(&self, name: &str, entity_type: EntityType, confidence: f64) -> CortexResult<Entity> {
        let canonical = normalize(name);

        if let Some(mut existing) = self.adapter.get_entity_by_canonical_name(&canonical)? {
            if !existing.has_alias(name) {
                existing.aliases.push(name.to_string());
            }
            existing.confidence = (existing.confidence + confidence) / 2.0;
            self.adapter.update_entity(&existing)?;
            return Ok(existing);
        }

        let draft = EntityDraft {
            name: name.to_string(),
            canonical_name: canonical,
            entity_type,
            aliases: vec![name.to_string()],
            confidence,
        };
        self.adapter.insert_entity(draft, Utc::now())
    }

    /// O(N^2) pairwise pass over all entities, returning duplicate-merge
    /// suggestions (spec §4.2 `suggestEntityMerges`).
    pub fn suggest_entity_merges(&self, threshold: f64) -> CortexResult<Vec<MergeSuggestion>> {
        let entities = self.adapter.list_entities()?;
        let facts = self.adapter.list_facts()?;

        let mut suggestions = Vec::new();
        for i in 0..entities.len() {
            for j in (i + 1)..entities.len() {
                let (a, b) = (&entities[i], &entities[j]);
                let sim = similarity(&a.canonical_name, &b.canonical_name);
                if sim < threshold {
                    continue;
                }

                let preds_a: HashSet<&str> = facts
                    .iter()
                    .filter(|f| f.subject_id == a.id)
                    .map(|f| f.predicate.as_str())
                    .collect();
                let preds_b: HashSet<&str> = facts
                    .iter()
                    .filter(|f| f.subject_id == b.id)
                    .map(|f| f.predicate.as_str())
                    .collect();
                let shared: Vec<&str> = preds_a.intersection(&preds_b).copied().collect();

                let reason = if shared.is_empty() {
                    "High name similarity".to_string()
                } else {
                    let mut shared_sorted = shared;
                    shared_sorted.sort_unstable();
                    format!("Shared relationships: {}", shared_sorted.join(", "))
                };

                suggestions.push(MergeSuggestion {
                    entity1: a.id,
                    entity2: b.id,
                    similarity: sim,
                    reason,
                });
            }
        }
        Ok(suggestions)
    }
}

fn alias_matches(canonical_query: &str, alias: &str) -> bool {
    let alias_norm = normalize(alias);
    alias_norm.contains(canonical_query) || canonical_query.contains(&alias_norm)
}

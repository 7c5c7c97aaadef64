//! spec §4.7 step 4: memory compression (similar-fact merging,
//! redundant-edge pruning, aged-fact summarization).

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use cortexpool_core::config::ConsolidationConfig;
use cortexpool_core::errors::CortexResult;
use cortexpool_core::ids::{EntityId, FactId};
use cortexpool_core::models::Tier;
use cortexpool_core::traits::IPersistenceAdapter;
use cortexpool_similarity::similarity;

/// Runs all three compression sub-passes in order and returns the total
/// number of facts merged, pruned or summarized.
pub fn compress_memory(adapter: &dyn IPersistenceAdapter, config: &ConsolidationConfig) -> CortexResult<i64> {
    let merged = merge_similar_facts(adapter, config)?;
    let pruned = prune_redundant_edges(adapter)?;
    let summarized = summarize_aged_facts(adapter, config)?;
    Ok(merged + pruned + summarized)
}

/// Within the semantic tier, pairwise: if two facts share `(subject,
/// predicate)` and their content similarity exceeds the threshold, merge
/// into the lower-id fact and delete the other.
fn merge_similar_facts(adapter: &dyn IPersistenceAdapter, config: &ConsolidationConfig) -> CortexResult<i64> {
    let mut facts: Vec<_> = adapter
        .list_facts()?
        .into_iter()
        .filter(|f| f.tier == Tier::Semantic)
        .collect();
    facts.sort_by_key(|f| f.id.get());

    let mut deleted: HashSet<FactId> = HashSet::new();
    let mut merges = 0;

    for i in 0..facts.len() {
        if deleted.contains(&facts[i].id) {
            continue;
        }
        for j in (i + 1)..facts.len() {
            if deleted.contains(&facts[j].id) {
                continue;
            }
            let (lo, hi) = (&facts[i], &facts[j]);
            if lo.subject_id != hi.subject_id || lo.predicate != hi.predicate {
                continue;
            }
            if similarity(&lo.content, &hi.content) <= config.similar_fact_threshold {
                continue;
            }

            let mut survivor = facts[i].clone();
            survivor.confidence = (survivor.confidence + hi.confidence).min(1.0);
            survivor.importance = survivor.importance.max(hi.importance);
            survivor.use_count += hi.use_count;
            survivor.last_used = survivor.last_used.max(hi.last_used);
            adapter.update_fact(&survivor)?;
            facts[i] = survivor;

            adapter.delete_fact(hi.id)?;
            deleted.insert(hi.id);
            merges += 1;
        }
    }

    Ok(merges)
}

/// For every `(subject, predicate, object)` triple with a non-null object
/// appearing more than once, keep the row with max importance (ties broken
/// by max use count) and delete the rest.
fn prune_redundant_edges(adapter: &dyn IPersistenceAdapter) -> CortexResult<i64> {
    let facts = adapter.list_facts()?;
    let mut groups: HashMap<(EntityId, String, EntityId), Vec<_>> = HashMap::new();

    for fact in facts {
        if let Some(object_id) = fact.object_id {
            groups
                .entry((fact.subject_id, fact.predicate.clone(), object_id))
                .or_default()
                .push(fact);
        }
    }

    let mut pruned = 0;
    for (_, mut members) in groups {
        if members.len() < 2 {
            continue;
        }
        members.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.use_count.cmp(&a.use_count))
        });
        for fact in &members[1..] {
            adapter.delete_fact(fact.id)?;
            pruned += 1;
        }
    }

    Ok(pruned)
}

/// For semantic facts old enough, important enough, used enough and long
/// enough, replace content with a fixed-length summary marker.
fn summarize_aged_facts(adapter: &dyn IPersistenceAdapter, config: &ConsolidationConfig) -> CortexResult<i64> {
    let now = Utc::now();
    let min_age = chrono::Duration::days(config.summarization_min_age_days);
    let mut summarized = 0;

    for mut fact in adapter.list_facts()? {
        if fact.tier != Tier::Semantic {
            continue;
        }
        if now - fact.created_at < min_age {
            continue;
        }
        if fact.importance <= config.summarization_min_importance {
            continue;
        }
        if fact.use_count <= config.summarization_min_use_count {
            continue;
        }
        if fact.content.len() < config.summarization_min_content_len {
            continue;
        }

        let prefix: String = fact.content.chars().take(config.summarization_prefix_len).collect();
        fact.content = format!("[Summarized: {prefix}...]");
        adapter.update_fact(&fact)?;
        summarized += 1;
    }

    Ok(summarized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::models::EntityType;
    use cortexpool_core::traits::{EntityDraft, FactDraft};
    use cortexpool_storage::SqliteAdapter;

    fn seed_entity(adapter: &SqliteAdapter) -> cortexpool_core::ids::EntityId {
        adapter
            .insert_entity(
                EntityDraft {
                    name: "William".into(),
                    canonical_name: "william".into(),
                    entity_type: EntityType::Person,
                    aliases: vec!["William".into()],
                    confidence: 0.8,
                },
                Utc::now(),
            )
            .unwrap()
            .id
    }

    #[test]
    fn near_duplicate_semantic_facts_are_merged() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        let subject = seed_entity(&adapter);
        let now = Utc::now();
        for content in ["likes the Rust programming language", "likes the Rust programming languag"] {
            adapter
                .insert_fact(
                    FactDraft {
                        subject_id: subject,
                        predicate: "prefers".into(),
                        object_id: None,
                        content: content.into(),
                        tier: Tier::Semantic,
                        importance: 0.6,
                        confidence: 0.5,
                        source: "conversation".into(),
                        ttl_ms: None,
                    },
                    now,
                )
                .unwrap();
        }

        let merged = merge_similar_facts(&adapter, &ConsolidationConfig::default()).unwrap();
        assert_eq!(merged, 1);
        assert_eq!(adapter.list_facts().unwrap().len(), 1);
    }

    #[test]
    fn redundant_edges_keep_only_highest_importance_row() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        let subject = seed_entity(&adapter);
        let object = adapter
            .insert_entity(
                EntityDraft {
                    name: "Rust".into(),
                    canonical_name: "rust".into(),
                    entity_type: EntityType::Tool,
                    aliases: vec!["Rust".into()],
                    confidence: 0.8,
                },
                Utc::now(),
            )
            .unwrap()
            .id;
        let now = Utc::now();
        for importance in [0.2, 0.9] {
            adapter
                .insert_fact(
                    FactDraft {
                        subject_id: subject,
                        predicate: "uses".into(),
                        object_id: Some(object),
                        content: "uses Rust".into(),
                        tier: Tier::Semantic,
                        importance,
                        confidence: 0.5,
                        source: "conversation".into(),
                        ttl_ms: None,
                    },
                    now,
                )
                .unwrap();
        }

        let pruned = prune_redundant_edges(&adapter).unwrap();
        assert_eq!(pruned, 1);
        let remaining = adapter.list_facts().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!((remaining[0].importance - 0.9).abs() < 1e-9);
    }
}

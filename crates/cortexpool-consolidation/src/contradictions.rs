//! spec §4.7 step 2: contradiction detection.

use std::collections::HashMap;

use chrono::Utc;

use cortexpool_core::errors::CortexResult;
use cortexpool_core::ids::{EntityId, FactId};
use cortexpool_core::models::Contradiction;
use cortexpool_core::traits::IPersistenceAdapter;

/// Pairs facts sharing `(subject, predicate)` with distinct content and
/// records one row per ordered pair into the contradictions log. Every
/// reflection pass records every live contradictory pair again — spec §9
/// leaves de-duplication across runs unspecified, so this engine does not
/// attempt it (see DESIGN.md).
pub fn detect_contradictions(adapter: &dyn IPersistenceAdapter) -> CortexResult<i64> {
    let facts = adapter.list_facts()?;
    let mut groups: HashMap<(EntityId, String), Vec<(FactId, &str)>> = HashMap::new();

    for fact in &facts {
        groups
            .entry((fact.subject_id, fact.predicate.clone()))
            .or_default()
            .push((fact.id, fact.content.as_str()));
    }

    let now = Utc::now();
    let mut recorded = 0;

    for mut members in groups.into_values() {
        if members.len() < 2 {
            continue;
        }
        members.sort_by_key(|(id, _)| id.get());
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let (id1, content1) = members[i];
                let (id2, content2) = members[j];
                if content1 != content2 {
                    adapter.insert_contradiction(&Contradiction {
                        fact1_id: id1,
                        fact2_id: id2,
                        detected_at: now,
                    })?;
                    recorded += 1;
                }
            }
        }
    }

    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::models::{EntityType, Tier};
    use cortexpool_core::traits::{EntityDraft, FactDraft};
    use cortexpool_storage::SqliteAdapter;

    #[test]
    fn differing_content_on_same_subject_predicate_is_flagged() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        let now = Utc::now();
        let entity = adapter
            .insert_entity(
                EntityDraft {
                    name: "William".into(),
                    canonical_name: "william".into(),
                    entity_type: EntityType::Person,
                    aliases: vec!["William".into()],
                    confidence: 0.8,
                },
                now,
            )
            .unwrap();
        for content in ["likes tea", "likes coffee"] {
            adapter
                .insert_fact(
                    FactDraft {
                        subject_id: entity.id,
                        predicate: "prefers".into(),
                        object_id: None,
                        content: content.into(),
                        tier: Tier::Semantic,
                        importance: 0.6,
                        confidence: 0.7,
                        source: "conversation".into(),
                        ttl_ms: None,
                    },
                    now,
                )
                .unwrap();
        }

        let recorded = detect_contradictions(&adapter).unwrap();
        assert_eq!(recorded, 1);
        assert_eq!(adapter.list_contradictions().unwrap().len(), 1);
    }
}

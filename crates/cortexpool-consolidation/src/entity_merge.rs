//! spec §4.7 step 3: duplicate-entity consolidation.

use std::collections::HashMap;

use cortexpool_core::errors::CortexResult;
use cortexpool_core::traits::IPersistenceAdapter;

/// Groups entities by `canonical_name`; for every group of size >1, keeps
/// the first-seen (lowest id) survivor, rewrites fact references from the
/// duplicates to it, merges alias sets, averages confidences, and deletes
/// the duplicates. Returns the number of entities removed.
///
/// In this engine `entities.canonical_name` carries a unique index, so
/// `addEntity`/`resolveEntity` never produce duplicates in the first place
/// — this phase exists for data arriving through a path that bypasses the
/// resolver (bulk import, a future writer), matching the general contract
/// spec §4.7 describes.
pub fn consolidate_duplicate_entities(adapter: &dyn IPersistenceAdapter) -> CortexResult<i64> {
    let mut groups: HashMap<String, Vec<cortexpool_core::models::Entity>> = HashMap::new();
    for entity in adapter.list_entities()? {
        groups.entry(entity.canonical_name.clone()).or_default().push(entity);
    }

    let mut removed = 0;

    for (_, mut members) in groups {
        if members.len() < 2 {
            continue;
        }
        members.sort_by_key(|e| e.id.get());
        let mut survivor = members.remove(0);

        let confidence_sum: f64 = survivor.confidence + members.iter().map(|e| e.confidence).sum::<f64>();
        survivor.confidence = confidence_sum / (members.len() as f64 + 1.0);

        for duplicate in &members {
            for alias in &duplicate.aliases {
                if !survivor.has_alias(alias) {
                    survivor.aliases.push(alias.clone());
                }
            }
            adapter.rewrite_fact_entity_refs(duplicate.id, survivor.id)?;
        }

        adapter.update_entity(&survivor)?;

        for duplicate in &members {
            adapter.delete_entity(duplicate.id)?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cortexpool_core::models::EntityType;
    use cortexpool_core::traits::EntityDraft;
    use cortexpool_storage::SqliteAdapter;

    #[test]
    fn single_canonical_name_group_is_a_no_op() {
        let adapter = SqliteAdapter::in_memory().unwrap();
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
            .unwrap();
        let removed = consolidate_duplicate_entities(&adapter).unwrap();
        assert_eq!(removed, 0);
    }
}

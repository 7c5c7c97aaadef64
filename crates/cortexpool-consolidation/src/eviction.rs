//! spec §4.9: episodic TTL eviction. Not part of `reflect()`'s phase
//! sequence — called explicitly (spec §9 leaves its scheduling to the
//! caller).

use chrono::Utc;

use cortexpool_core::errors::CortexResult;
use cortexpool_core::models::Tier;
use cortexpool_core::traits::IPersistenceAdapter;

/// Deletes every episodic fact with a non-null TTL that has elapsed.
/// Returns the number deleted.
pub fn cleanup_expired_episodic(adapter: &dyn IPersistenceAdapter) -> CortexResult<i64> {
    let now = Utc::now();
    let mut deleted = 0;

    for fact in adapter.list_facts()? {
        if fact.tier == Tier::Episodic && fact.is_expired(now) {
            adapter.delete_fact(fact.id)?;
            deleted += 1;
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::models::EntityType;
    use cortexpool_core::traits::{EntityDraft, FactDraft};
    use cortexpool_storage::SqliteAdapter;

    #[test]
    fn elapsed_ttl_evicts_episodic_fact() {
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
        let fact = adapter
            .insert_fact(
                FactDraft {
                    subject_id: entity.id,
                    predicate: "mentioned".into(),
                    object_id: None,
                    content: "asked about the weather".into(),
                    tier: Tier::Episodic,
                    importance: 0.3,
                    confidence: 0.7,
                    source: "conversation".into(),
                    ttl_ms: Some(1),
                },
                now - chrono::Duration::seconds(10),
            )
            .unwrap();

        let deleted = cleanup_expired_episodic(&adapter).unwrap();
        assert_eq!(deleted, 1);
        assert!(adapter.get_fact(fact.id).unwrap().is_none());
    }
}

//! spec §4.7 step 1: time decay.

use chrono::Utc;

use cortexpool_core::config::DecayConfig;
use cortexpool_core::errors::CortexResult;
use cortexpool_core::traits::IPersistenceAdapter;

/// Applies exponential decay to every fact's importance, converging toward
/// its tier's `baseImportance`; deletes any fact that decays below the
/// importance floor, or that has gone unused past its tier's `maxAge`
/// (spec §3 tier table — the decay formula alone asymptotes at
/// `baseImportance`, which sits above the floor for every tier, so `maxAge`
/// is what actually retires long-dormant facts). Returns the number deleted.
pub fn time_decay(adapter: &dyn IPersistenceAdapter, decay: &DecayConfig) -> CortexResult<i64> {
    let now = Utc::now();
    let mut deleted = 0;

    for mut fact in adapter.list_facts()? {
        let tier = decay.for_tier(fact.tier);
        let hours_since_use = (now - fact.last_used).num_seconds() as f64 / 3600.0;

        let past_max_age = tier
            .max_age_hours
            .is_some_and(|max_age| hours_since_use > max_age);

        let new_importance = tier.base_importance
            + (fact.importance - tier.base_importance) * (-tier.decay_rate_per_hour * hours_since_use).exp();

        if past_max_age || new_importance < decay.importance_floor {
            adapter.delete_fact(fact.id)?;
            deleted += 1;
        } else {
            fact.importance = new_importance;
            adapter.update_fact(&fact)?;
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::traits::FactDraft;
    use cortexpool_core::traits::EntityDraft;
    use cortexpool_core::models::{EntityType, Tier};
    use cortexpool_storage::SqliteAdapter;

    #[test]
    fn stale_low_importance_fact_is_deleted() {
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
        let mut fact = adapter
            .insert_fact(
                FactDraft {
                    subject_id: entity.id,
                    predicate: "is".into(),
                    object_id: None,
                    content: "a developer".into(),
                    tier: Tier::Episodic,
                    importance: 0.31,
                    confidence: 0.7,
                    source: "conversation".into(),
                    ttl_ms: None,
                },
                now,
            )
            .unwrap();
        fact.last_used = now - chrono::Duration::hours(48);
        adapter.update_fact(&fact).unwrap();

        let deleted = time_decay(&adapter, &DecayConfig::default()).unwrap();
        assert_eq!(deleted, 1);
        assert!(adapter.get_fact(fact.id).unwrap().is_none());
    }
}

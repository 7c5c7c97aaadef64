//! # cortexpool-session
//!
//! Co-reference tracker (spec §4.8): short-lived pronoun -> entity
//! bindings, cached with a TTL and backed by a persisted fallback.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use moka::sync::Cache;

use cortexpool_core::config::SessionConfig;
use cortexpool_core::errors::CortexResult;
use cortexpool_core::ids::EntityId;
use cortexpool_core::models::{CoReference, Entity};
use cortexpool_core::traits::IPersistenceAdapter;
use cortexpool_entities::EntityResolver;
use cortexpool_similarity::normalize;

/// Closed pronoun vocabulary (spec §4.8).
const CLOSED_PRONOUNS: &[&str] = &[
    "he", "she", "it", "they", "him", "her", "them", "this", "that", "the project", "the file",
];

pub struct CoReferenceTracker {
    adapter: Arc<dyn IPersistenceAdapter>,
    resolver: EntityResolver,
    cache: Cache<String, CoReference>,
    binding_ttl: Duration,
}

impl CoReferenceTracker {
    pub fn new(adapter: Arc<dyn IPersistenceAdapter>, config: SessionConfig) -> Self {
        let resolver = EntityResolver::new(adapter.clone());
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(StdDuration::from_secs(config.binding_ttl_minutes as u64 * 60))
            .build();
        Self {
            adapter,
            resolver,
            cache,
            binding_ttl: Duration::minutes(config.binding_ttl_minutes),
        }
    }

    /// spec §4.8 `addCoReference`: upserts by pronoun, keyed on its
    /// normalized form.
    pub fn add_co_reference(&self, pronoun: &str, entity_id: EntityId, context: &str) -> CortexResult<()> {
        let key = normalize(pronoun);
        let co_reference = CoReference {
            pronoun: key.clone(),
            entity_id,
            context: context.to_string(),
            last_seen: Utc::now(),
        };
        self.adapter.upsert_co_reference(&co_reference)?;
        self.cache.insert(key, co_reference);
        Ok(())
    }

    /// spec §4.8 `resolveCoReference`: `None` unless `pronoun` is in the
    /// closed set. Otherwise tries the cache, then the persisted table,
    /// then falls back to resolving an entity from `current_context`.
    pub fn resolve_co_reference(&self, pronoun: &str, current_context: &[String]) -> CortexResult<Option<Entity>> {
        let key = normalize(pronoun);
        if !CLOSED_PRONOUNS.contains(&key.as_str()) {
            return Ok(None);
        }

        let now = Utc::now();

        if let Some(cached) = self.cache.get(&key) {
            if self.within_window(cached.last_seen, now) {
                return self.adapter.get_entity(cached.entity_id);
            }
        }

        if let Some(persisted) = self.adapter.get_co_reference(&key)? {
            if self.within_window(persisted.last_seen, now) {
                self.cache.insert(key, persisted.clone());
                return self.adapter.get_entity(persisted.entity_id);
            }
        }

        for candidate in current_context {
            if let Some(entity) = self.resolver.resolve_entity(candidate)? {
                self.add_co_reference(pronoun, entity.id, candidate)?;
                return Ok(Some(entity));
            }
        }

        Ok(None)
    }

    fn within_window(&self, last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - last_seen <= self.binding_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::config::DecayConfig;
    use cortexpool_memory::{AddFactInput, FactStore};
    use cortexpool_storage::SqliteAdapter;

    fn tracker() -> (CoReferenceTracker, FactStore) {
        let adapter: Arc<dyn IPersistenceAdapter> = Arc::new(SqliteAdapter::in_memory().unwrap());
        let store = FactStore::new(adapter.clone(), DecayConfig::default());
        (CoReferenceTracker::new(adapter, SessionConfig::default()), store)
    }

    #[test]
    fn non_pronoun_resolves_to_none() {
        let (tracker, _store) = tracker();
        assert!(tracker.resolve_co_reference("William", &[]).unwrap().is_none());
    }

    #[test]
    fn cached_binding_is_returned_within_window() {
        let (tracker, store) = tracker();
        let fact = store.add_fact(AddFactInput::new("William", "is", "a developer")).unwrap();
        tracker.add_co_reference("he", fact.subject_id, "William is a developer").unwrap();

        let resolved = tracker.resolve_co_reference("He", &[]).unwrap().unwrap();
        assert_eq!(resolved.id, fact.subject_id);
    }

    #[test]
    fn falls_back_to_context_on_miss() {
        let (tracker, store) = tracker();
        let fact = store.add_fact(AddFactInput::new("William", "is", "a developer")).unwrap();

        let resolved = tracker
            .resolve_co_reference("they", &["William".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, fact.subject_id);
    }

    #[test]
    fn multi_word_pronoun_the_project_is_recognized() {
        let (tracker, store) = tracker();
        let fact = store.add_fact(AddFactInput::new("OpenLiam", "is", "a project")).unwrap();
        let resolved = tracker
            .resolve_co_reference("The Project", &["OpenLiam".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, fact.subject_id);
    }
}

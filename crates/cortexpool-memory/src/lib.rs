//! # cortexpool-memory
//!
//! Fact store (spec §4.3): insert/update/get facts with tier-derived
//! defaults and optional TTL.

use std::sync::Arc;

use chrono::Utc;

use cortexpool_core::config::DecayConfig;
use cortexpool_core::errors::{CortexError, CortexResult};
use cortexpool_core::ids::FactId;
use cortexpool_core::models::{Entity, EntityType, Fact, Tier};
use cortexpool_core::traits::{FactDraft, IPersistenceAdapter};
use cortexpool_entities::EntityResolver;

/// Arguments to [`FactStore::add_fact`], matching spec §4.3's `addFact`
/// input shape. `subject`/`object` are surface-form names, resolved (or
/// created) through the entity resolver.
#[derive(Debug, Clone)]
pub struct AddFactInput {
    pub subject: String,
    pub predicate: String,
    pub object: Option<String>,
    pub content: String,
    pub tier: Tier,
    pub confidence: f64,
    pub source: String,
    pub ttl_ms: Option<i64>,
}

impl AddFactInput {
    /// Convenience constructor applying spec §4.3's defaults
    /// (`tier=semantic`, `confidence=0.7`).
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: None,
            content: content.into(),
            tier: Tier::Semantic,
            confidence: 0.7,
            source: "conversation".to_string(),
            ttl_ms: None,
        }
    }

    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }
}

/// Maps a predicate to the entity type its subject is inferred to have
/// (spec §4.3 step 1's "fixed mapping ... full table in source", filled
/// in from the closed predicate vocabulary of spec §6).
pub fn infer_type(predicate: &str) -> Option<EntityType> {
    match predicate {
        "knows" | "teachers" | "caregiver" | "autistic" => Some(EntityType::Person),
        "created" | "fork-of" | "created-by" => Some(EntityType::Project),
        "runs-on" | "model" | "uses" => Some(EntityType::Tool),
        "prefers" => Some(EntityType::Preference),
        "github" => Some(EntityType::Website),
        "learned" | "mentioned" | "discussed" | "queried" | "recalled" | "is" | "has"
        | "affiliated-with" | "related-to" | "used-for" => Some(EntityType::Concept),
        _ => None,
    }
}

/// Insert/update/get facts with tier-derived defaults and optional TTL
/// (spec §4.3).
pub struct FactStore {
    adapter: Arc<dyn IPersistenceAdapter>,
    resolver: EntityResolver,
    decay: DecayConfig,
}

impl FactStore {
    pub fn new(adapter: Arc<dyn IPersistenceAdapter>, decay: DecayConfig) -> Self {
        let resolver = EntityResolver::new(adapter.clone());
        Self {
            adapter,
            resolver,
            decay,
        }
    }

    /// spec §4.3 `addFact`.
    pub fn add_fact(&self, input: AddFactInput) -> CortexResult<Fact> {
        let subject_type = infer_type(&input.predicate).ok_or_else(|| {
            CortexError::Invalid(format!("unknown predicate '{}'", input.predicate))
        })?;

        let subject = self.resolve_or_create(&input.subject, subject_type, input.confidence)?;
        let object_id = match &input.object {
            Some(name) => Some(self.resolve_or_create(name, EntityType::Other, input.confidence)?.id),
            None => None,
        };

        let base_importance = self.decay.for_tier(input.tier).base_importance;

        let ttl_ms = match (input.tier, input.ttl_ms) {
            (Tier::Episodic, None) => Some(self.decay.episodic_default_ttl_ms),
            (_, ttl) => ttl,
        };

        let draft = FactDraft {
            subject_id: subject.id,
            predicate: input.predicate,
            object_id,
            content: input.content,
            tier: input.tier,
            importance: base_importance,
            confidence: input.confidence,
            source: input.source,
            ttl_ms,
        };

        let now = Utc::now();
        let fact = self.adapter.insert_fact(draft, now)?;
        tracing::debug!(fact_id = fact.id.get(), "added fact");
        Ok(fact)
    }

    /// spec §4.3 `useFact`: importance += 0.1 (capped at 1.0), bumps
    /// `lastUsed`/`useCount`.
    pub fn use_fact(&self, id: FactId) -> CortexResult<Fact> {
        let mut fact = self
            .adapter
            .get_fact(id)?
            .ok_or_else(|| CortexError::Invalid(format!("no fact with id {}", id.get())))?;
        fact.record_use(Utc::now());
        self.adapter.update_fact(&fact)?;
        Ok(fact)
    }

    /// spec §4.3 `bulkAdd`: sequential, no cross-item atomicity.
    pub fn bulk_add(&self, inputs: Vec<AddFactInput>) -> CortexResult<Vec<Fact>> {
        inputs.into_iter().map(|input| self.add_fact(input)).collect()
    }

    fn resolve_or_create(&self, name: &str, hint: EntityType, confidence: f64) -> CortexResult<Entity> {
        if let Some(existing) = self.resolver.resolve_entity(name)? {
            return Ok(existing);
        }
        self.resolver.add_entity(name, hint, confidence)
    }
}

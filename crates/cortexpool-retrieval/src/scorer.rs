//! Per-fact relevance scoring (spec §4.5). Pure given the current
//! activation map and topic list — no global mutable state is touched.

use chrono::{DateTime, Utc};

use cortexpool_core::models::{Entity, Fact};
use cortexpool_similarity::normalize;

pub struct RelevanceScorer;

impl RelevanceScorer {
    /// spec §4.5's scoring formula, clamped to `[0, 1]`.
    pub fn score(fact: &Fact, subject: &Entity, topics: &[String], activation: f64, now: DateTime<Utc>) -> f64 {
        let mut score = fact.importance * fact.confidence;

        for topic in topics {
            let normalized_topic = normalize(topic);
            if substring_comparable(&subject.canonical_name, &normalized_topic) {
                score += 0.4;
            }
            if subject
                .aliases
                .iter()
                .any(|alias| normalize(alias).contains(&normalized_topic))
            {
                score += 0.3;
            }
        }

        score += 0.3 * activation;
        score += subject.entity_type.type_prior();

        let hours_since_use = (now - fact.last_used).num_seconds() as f64 / 3600.0;
        score += (0.2 - 0.01 * hours_since_use).max(0.0);

        score.min(1.0)
    }
}

fn substring_comparable(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::ids::{EntityId, FactId};
    use cortexpool_core::models::{EntityType, Tier};

    fn entity(canonical_name: &str, entity_type: EntityType) -> Entity {
        Entity {
            id: EntityId(1),
            name: canonical_name.to_string(),
            canonical_name: canonical_name.to_string(),
            entity_type,
            aliases: vec![],
            confidence: 0.8,
            created_at: Utc::now(),
        }
    }

    fn fact(importance: f64, confidence: f64, last_used: DateTime<Utc>) -> Fact {
        Fact {
            id: FactId(1),
            subject_id: EntityId(1),
            predicate: "is".to_string(),
            object_id: None,
            content: "a developer".to_string(),
            tier: Tier::Semantic,
            importance,
            confidence,
            source: "conversation".to_string(),
            last_used,
            use_count: 0,
            created_at: last_used,
            ttl_ms: None,
        }
    }

    #[test]
    fn score_never_exceeds_one() {
        let now = Utc::now();
        let e = entity("william", EntityType::Person);
        let f = fact(1.0, 1.0, now);
        let score = RelevanceScorer::score(&f, &e, &["william".to_string()], 1.0, now);
        assert!(score <= 1.0);
    }

    #[test]
    fn topic_substring_match_adds_bonus() {
        let now = Utc::now();
        let e = entity("william", EntityType::Concept);
        let f = fact(0.0, 1.0, now - chrono::Duration::hours(100));
        let with_topic = RelevanceScorer::score(&f, &e, &["william".to_string()], 0.0, now);
        let without_topic = RelevanceScorer::score(&f, &e, &[], 0.0, now);
        assert!(with_topic > without_topic);
    }

    #[test]
    fn recency_term_decays_to_zero() {
        let now = Utc::now();
        let e = entity("william", EntityType::Other);
        let recent = fact(0.0, 0.0, now);
        let stale = fact(0.0, 0.0, now - chrono::Duration::hours(30));
        let recent_score = RelevanceScorer::score(&recent, &e, &[], 0.0, now);
        let stale_score = RelevanceScorer::score(&stale, &e, &[], 0.0, now);
        assert!(recent_score > stale_score);
        assert_eq!(stale_score, 0.0);
    }
}

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use cortexpool_core::errors::{CortexError, CortexResult, StorageError};
use cortexpool_core::ids::{EntityId, FactId};
use cortexpool_core::models::{
    ActivationHistoryEntry, CoReference, Contradiction, Entity, ExportDocument, Fact,
    PoolEntry, ReflectionLogEntry, Topic,
};
use cortexpool_core::traits::{EntityDraft, FactDraft, IPersistenceAdapter};

use crate::rows;
use crate::to_storage_err;

/// SQLite-backed `IPersistenceAdapter`. A single mutex-guarded connection
/// serves both reads and writes — the engine is meant to be owned by one
/// caller at a time (spec §5), so there is no read-pool to size the way the
/// teacher's multi-connection `cortex-storage` does for its server workload.
pub struct SqliteAdapter {
    conn: Mutex<Connection>,
}

impl SqliteAdapter {
    pub fn open(path: &str) -> CortexResult<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(to_storage_err)?;
        crate::migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> CortexResult<Self> {
        Self::open(":memory:")
    }

    /// Locks the connection, converting mutex poisoning into
    /// `CortexError::ConcurrencyError` instead of panicking (matches the
    /// teacher's `GraphManager::read`/`write` lock helpers).
    fn lock(&self) -> CortexResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| CortexError::ConcurrencyError(e.to_string()))
    }
}

impl IPersistenceAdapter for SqliteAdapter {
    fn insert_entity(&self, draft: EntityDraft, now: DateTime<Utc>) -> CortexResult<Entity> {
        let conn = self.lock()?;
        let aliases_json = serde_json::to_string(&draft.aliases).map_err(StorageError::Serialization)?;
        conn.execute(
            "INSERT INTO entities (name, canonical_name, entity_type, aliases, confidence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.name,
                draft.canonical_name,
                draft.entity_type.as_str(),
                aliases_json,
                draft.confidence,
                now.to_rfc3339(),
            ],
        )
        .map_err(to_storage_err)?;
        let id = conn.last_insert_rowid();
        Ok(Entity {
            id: EntityId(id),
            name: draft.name,
            canonical_name: draft.canonical_name,
            entity_type: draft.entity_type,
            aliases: draft.aliases,
            confidence: draft.confidence,
            created_at: now,
        })
    }

    fn update_entity(&self, entity: &Entity) -> CortexResult<()> {
        let conn = self.lock()?;
        let aliases_json =
            serde_json::to_string(&entity.aliases).map_err(StorageError::Serialization)?;
        conn.execute(
            "UPDATE entities SET name = ?2, canonical_name = ?3, aliases = ?4, confidence = ?5
             WHERE id = ?1",
            params![
                entity.id.get(),
                entity.name,
                entity.canonical_name,
                aliases_json,
                entity.confidence,
            ],
        )
        .map_err(to_storage_err)?;
        Ok(())
    }

    fn get_entity(&self, id: EntityId) -> CortexResult<Option<Entity>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, canonical_name, entity_type, aliases, confidence, created_at
                 FROM entities WHERE id = ?1",
            )
            .map_err(to_storage_err)?;
        let row = stmt
            .query_row(params![id.get()], rows::entity_from_row)
            .optional()
            .map_err(to_storage_err)?;
        row.map(rows::build_entity).transpose()
    }

    fn get_entity_by_canonical_name(&self, canonical_name: &str) -> CortexResult<Option<Entity>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, canonical_name, entity_type, aliases, confidence, created_at
                 FROM entities WHERE canonical_name = ?1",
            )
            .map_err(to_storage_err)?;
        let row = stmt
            .query_row(params![canonical_name], rows::entity_from_row)
            .optional()
            .map_err(to_storage_err)?;
        row.map(rows::build_entity).transpose()
    }

    fn list_entities(&self) -> CortexResult<Vec<Entity>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, canonical_name, entity_type, aliases, confidence, created_at
                 FROM entities",
            )
            .map_err(to_storage_err)?;
        let raw = stmt
            .query_map([], rows::entity_from_row)
            .map_err(to_storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_storage_err)?;
        raw.into_iter().map(rows::build_entity).collect()
    }

    fn delete_entity(&self, id: EntityId) -> CortexResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM entities WHERE id = ?1", params![id.get()])
            .map_err(to_storage_err)?;
        Ok(())
    }

    fn insert_fact(&self, draft: FactDraft, now: DateTime<Utc>) -> CortexResult<Fact> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO facts (
                subject_id, predicate, object_id, content, tier, importance, confidence,
                source, last_used, use_count, created_at, ttl_ms
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11)",
            params![
                draft.subject_id.get(),
                draft.predicate,
                draft.object_id.map(|e| e.get()),
                draft.content,
                draft.tier.as_str(),
                draft.importance,
                draft.confidence,
                draft.source,
                now.to_rfc3339(),
                now.to_rfc3339(),
                draft.ttl_ms,
            ],
        )
        .map_err(to_storage_err)?;
        let id = conn.last_insert_rowid();
        Ok(Fact {
            id: FactId(id),
            subject_id: draft.subject_id,
            predicate: draft.predicate,
            object_id: draft.object_id,
            content: draft.content,
            tier: draft.tier,
            importance: draft.importance,
            confidence: draft.confidence,
            source: draft.source,
            last_used: now,
            use_count: 0,
            created_at: now,
            ttl_ms: draft.ttl_ms,
        })
    }

    fn update_fact(&self, fact: &Fact) -> CortexResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE facts SET
                subject_id = ?2, predicate = ?3, object_id = ?4, content = ?5, tier = ?6,
                importance = ?7, confidence = ?8, source = ?9, last_used = ?10,
                use_count = ?11, ttl_ms = ?12
             WHERE id = ?1",
            params![
                fact.id.get(),
                fact.subject_id.get(),
                fact.predicate,
                fact.object_id.map(|e| e.get()),
                fact.content,
                fact.tier.as_str(),
                fact.importance,
                fact.confidence,
                fact.source,
                fact.last_used.to_rfc3339(),
                fact.use_count,
                fact.ttl_ms,
            ],
        )
        .map_err(to_storage_err)?;
        Ok(())
    }

    fn get_fact(&self, id: FactId) -> CortexResult<Option<Fact>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, subject_id, predicate, object_id, content, tier, importance,
                        confidence, source, last_used, use_count, created_at, ttl_ms
                 FROM facts WHERE id = ?1",
            )
            .map_err(to_storage_err)?;
        let row = stmt
            .query_row(params![id.get()], rows::fact_from_row)
            .optional()
            .map_err(to_storage_err)?;
        row.map(rows::build_fact).transpose()
    }

    fn list_facts(&self) -> CortexResult<Vec<Fact>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, subject_id, predicate, object_id, content, tier, importance,
                        confidence, source, last_used, use_count, created_at, ttl_ms
                 FROM facts",
            )
            .map_err(to_storage_err)?;
        let raw = stmt
            .query_map([], rows::fact_from_row)
            .map_err(to_storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_storage_err)?;
        raw.into_iter().map(rows::build_fact).collect()
    }

    fn delete_fact(&self, id: FactId) -> CortexResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM facts WHERE id = ?1", params![id.get()])
            .map_err(to_storage_err)?;
        Ok(())
    }

    fn rewrite_fact_entity_refs(&self, from: EntityId, to: EntityId) -> CortexResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE facts SET subject_id = ?2 WHERE subject_id = ?1",
            params![from.get(), to.get()],
        )
        .map_err(to_storage_err)?;
        conn.execute(
            "UPDATE facts SET object_id = ?2 WHERE object_id = ?1",
            params![from.get(), to.get()],
        )
        .map_err(to_storage_err)?;
        Ok(())
    }

    fn replace_pool(&self, entries: &[PoolEntry]) -> CortexResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(to_storage_err)?;
        tx.execute("DELETE FROM pool", []).map_err(to_storage_err)?;
        for (rank, entry) in entries.iter().enumerate() {
            tx.execute(
                "INSERT INTO pool (fact_id, relevance_score, added_at, rank) VALUES (?1, ?2, ?3, ?4)",
                params![
                    entry.fact_id.get(),
                    entry.relevance_score,
                    entry.added_at.to_rfc3339(),
                    rank as i64,
                ],
            )
            .map_err(to_storage_err)?;
        }
        tx.commit().map_err(to_storage_err)?;
        Ok(())
    }

    fn get_pool(&self) -> CortexResult<Vec<PoolEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT fact_id, relevance_score, added_at FROM pool ORDER BY rank ASC")
            .map_err(to_storage_err)?;
        let raw = stmt
            .query_map([], |row| {
                let fact_id: i64 = row.get(0)?;
                let score: f64 = row.get(1)?;
                let added_at: String = row.get(2)?;
                Ok((fact_id, score, added_at))
            })
            .map_err(to_storage_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_storage_err)?;
        raw.into_iter()
            .map(|(fact_id, score, added_at)| {
                Ok(PoolEntry {
                    fact_id: FactId(fact_id),
                    relevance_score: score,
                    added_at: rows::parse_dt(&added_at)?,
                })
            })
            .collect()
    }

    fn upsert_topic(&self, topic: &Topic) -> CortexResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO topics (topic, weight, last_seen) VALUES (?1, ?2, ?3)
             ON CONFLICT(topic) DO UPDATE SET weight = excluded.weight, last_seen = excluded.last_seen",
            params![topic.topic, topic.weight, topic.last_seen.to_rfc3339()],
        )
        .map_err(to_storage_err)?;
        Ok(())
    }

    fn get_topic(&self, topic: &str) -> CortexResult<Option<Topic>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT topic, weight, last_seen FROM topics WHERE topic = ?1")
            .map_err(to_storage_err)?;
        let row = stmt
            .query_row(params![topic], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, f64>(1)?, r.get::<_, String>(2)?))
            })
            .optional()
            .map_err(to_storage_err)?;
        row.map(|(topic, weight, last_seen)| {
            Ok(Topic {
                topic,
                weight,
                last_seen: rows::parse_dt(&last_seen)?,
            })
        })
        .transpose()
    }

    fn list_topics(&self) -> CortexResult<Vec<Topic>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT topic, weight, last_seen FROM topics")
            .map_err(to_storage_err)?;
        let mut out = Vec::new();
        let mut rows_iter = stmt.query([]).map_err(to_storage_err)?;
        while let Some(row) = rows_iter.next().map_err(to_storage_err)? {
            out.push(rows::build_topic(row)?);
        }
        Ok(out)
    }

    fn insert_contradiction(&self, contradiction: &Contradiction) -> CortexResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO contradictions (fact1_id, fact2_id, detected_at) VALUES (?1, ?2, ?3)",
            params![
                contradiction.fact1_id.get(),
                contradiction.fact2_id.get(),
                contradiction.detected_at.to_rfc3339(),
            ],
        )
        .map_err(to_storage_err)?;
        Ok(())
    }

    fn list_contradictions(&self) -> CortexResult<Vec<Contradiction>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT fact1_id, fact2_id, detected_at FROM contradictions")
            .map_err(to_storage_err)?;
        let mut out = Vec::new();
        let mut rows_iter = stmt.query([]).map_err(to_storage_err)?;
        while let Some(row) = rows_iter.next().map_err(to_storage_err)? {
            out.push(rows::build_contradiction(row)?);
        }
        Ok(out)
    }

    fn append_reflection_log(&self, entry: &ReflectionLogEntry) -> CortexResult<()> {
        let conn = self.lock()?;
        let details = serde_json::to_string(&entry.details).map_err(StorageError::Serialization)?;
        conn.execute(
            "INSERT INTO reflections (ran_at, contradictions_found, entities_merged, facts_compressed, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.ran_at.to_rfc3339(),
                entry.contradictions_found,
                entry.entities_merged,
                entry.facts_compressed,
                details,
            ],
        )
        .map_err(to_storage_err)?;
        Ok(())
    }

    fn list_reflection_log(&self) -> CortexResult<Vec<ReflectionLogEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, ran_at, contradictions_found, entities_merged, facts_compressed, details
                 FROM reflections ORDER BY id ASC",
            )
            .map_err(to_storage_err)?;
        let mut out = Vec::new();
        let mut rows_iter = stmt.query([]).map_err(to_storage_err)?;
        while let Some(row) = rows_iter.next().map_err(to_storage_err)? {
            out.push(rows::build_reflection_entry(row)?);
        }
        Ok(out)
    }

    fn upsert_co_reference(&self, co_reference: &CoReference) -> CortexResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO co_references (pronoun, entity_id, context, last_seen) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(pronoun) DO UPDATE SET entity_id = excluded.entity_id, context = excluded.context, last_seen = excluded.last_seen",
            params![
                co_reference.pronoun,
                co_reference.entity_id.get(),
                co_reference.context,
                co_reference.last_seen.to_rfc3339(),
            ],
        )
        .map_err(to_storage_err)?;
        Ok(())
    }

    fn get_co_reference(&self, pronoun: &str) -> CortexResult<Option<CoReference>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT pronoun, entity_id, context, last_seen FROM co_references WHERE pronoun = ?1")
            .map_err(to_storage_err)?;
        let row = stmt
            .query_row(params![pronoun], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, i64>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })
            .optional()
            .map_err(to_storage_err)?;
        row.map(|(pronoun, entity_id, context, last_seen)| {
            Ok(CoReference {
                pronoun,
                entity_id: EntityId(entity_id),
                context,
                last_seen: rows::parse_dt(&last_seen)?,
            })
        })
        .transpose()
    }

    fn list_co_references(&self) -> CortexResult<Vec<CoReference>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT pronoun, entity_id, context, last_seen FROM co_references")
            .map_err(to_storage_err)?;
        let mut out = Vec::new();
        let mut rows_iter = stmt.query([]).map_err(to_storage_err)?;
        while let Some(row) = rows_iter.next().map_err(to_storage_err)? {
            out.push(rows::build_co_reference(row)?);
        }
        Ok(out)
    }

    fn append_activation_history(
        &self,
        entries: &[ActivationHistoryEntry],
        cap: usize,
    ) -> CortexResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(to_storage_err)?;
        for entry in entries.iter().take(cap) {
            tx.execute(
                "INSERT INTO activation_history (entity_id, activation, source, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    entry.entity_id.get(),
                    entry.activation,
                    entry.source,
                    entry.timestamp.to_rfc3339(),
                ],
            )
            .map_err(to_storage_err)?;
        }
        tx.commit().map_err(to_storage_err)?;
        Ok(())
    }

    fn get_activation_history(
        &self,
        entity_id: EntityId,
        since: DateTime<Utc>,
    ) -> CortexResult<Vec<ActivationHistoryEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT entity_id, activation, source, timestamp FROM activation_history
                 WHERE entity_id = ?1 AND timestamp >= ?2 ORDER BY timestamp ASC",
            )
            .map_err(to_storage_err)?;
        let mut out = Vec::new();
        let mut rows_iter = stmt
            .query(params![entity_id.get(), since.to_rfc3339()])
            .map_err(to_storage_err)?;
        while let Some(row) = rows_iter.next().map_err(to_storage_err)? {
            out.push(rows::build_activation_entry(row)?);
        }
        Ok(out)
    }

    fn list_activation_history(&self) -> CortexResult<Vec<ActivationHistoryEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT entity_id, activation, source, timestamp FROM activation_history")
            .map_err(to_storage_err)?;
        let mut out = Vec::new();
        let mut rows_iter = stmt.query([]).map_err(to_storage_err)?;
        while let Some(row) = rows_iter.next().map_err(to_storage_err)? {
            out.push(rows::build_activation_entry(row)?);
        }
        Ok(out)
    }

    fn export(&self) -> CortexResult<ExportDocument> {
        Ok(ExportDocument {
            entities: self.list_entities()?,
            facts: self.list_facts()?,
            pool: self.get_pool()?,
            topics: self.list_topics()?,
            co_references: self.list_co_references()?,
            activation_history: self.list_activation_history()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortexpool_core::models::EntityType;
    use cortexpool_core::models::Tier;

    #[test]
    fn insert_and_get_entity_round_trips() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        let now = Utc::now();
        let entity = adapter
            .insert_entity(
                EntityDraft {
                    name: "William".to_string(),
                    canonical_name: "william".to_string(),
                    entity_type: EntityType::Person,
                    aliases: vec!["William".to_string()],
                    confidence: 0.9,
                },
                now,
            )
            .unwrap();
        let fetched = adapter.get_entity(entity.id).unwrap().unwrap();
        assert_eq!(fetched.canonical_name, "william");
        assert_eq!(fetched.aliases, vec!["William".to_string()]);
    }

    #[test]
    fn canonical_name_unique_index_rejects_duplicates() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        let now = Utc::now();
        let draft = EntityDraft {
            name: "William".to_string(),
            canonical_name: "william".to_string(),
            entity_type: EntityType::Person,
            aliases: vec!["William".to_string()],
            confidence: 0.9,
        };
        adapter.insert_entity(draft.clone(), now).unwrap();
        assert!(adapter.insert_entity(draft, now).is_err());
    }

    #[test]
    fn pool_replace_is_atomic_and_ordered() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        let now = Utc::now();
        let entity = adapter
            .insert_entity(
                EntityDraft {
                    name: "X".to_string(),
                    canonical_name: "x".to_string(),
                    entity_type: EntityType::Other,
                    aliases: vec![],
                    confidence: 0.5,
                },
                now,
            )
            .unwrap();
        let fact = adapter
            .insert_fact(
                FactDraft {
                    subject_id: entity.id,
                    predicate: "is".to_string(),
                    object_id: None,
                    content: "x is x".to_string(),
                    tier: Tier::Semantic,
                    importance: 0.6,
                    confidence: 0.7,
                    source: "conversation".to_string(),
                    ttl_ms: None,
                },
                now,
            )
            .unwrap();
        adapter
            .replace_pool(&[PoolEntry {
                fact_id: fact.id,
                relevance_score: 0.9,
                added_at: now,
            }])
            .unwrap();
        let pool = adapter.get_pool().unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].fact_id, fact.id);
    }
}

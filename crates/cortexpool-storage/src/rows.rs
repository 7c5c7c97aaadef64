//! Row <-> domain-model conversions, kept together so the column order in
//! `migrations` and the `SELECT`s in `adapter` stay honest against each
//! other (mirrors the teacher's `row_to_base_memory` pattern in
//! `cortex-storage/src/queries/memory_crud.rs`).

use chrono::{DateTime, Utc};
use rusqlite::Row;

use cortexpool_core::errors::{CortexResult, StorageError};
use cortexpool_core::ids::{EntityId, FactId};
use cortexpool_core::models::{
    ActivationHistoryEntry, CoReference, Contradiction, Entity, EntityType, Fact, ReflectionLogEntry,
    Tier, Topic,
};

use crate::to_storage_err;

pub(crate) fn parse_dt(s: &str) -> CortexResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Sqlite {
            message: format!("parse datetime '{s}': {e}"),
        }.into())
}

pub(crate) fn entity_from_row(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, String, String, f64, String)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

pub(crate) fn build_entity(
    (id, name, canonical_name, entity_type_str, aliases_json, confidence, created_at_str): (
        i64,
        String,
        String,
        String,
        String,
        f64,
        String,
    ),
) -> CortexResult<Entity> {
    let entity_type = EntityType::parse(&entity_type_str).ok_or_else(|| StorageError::Sqlite {
        message: format!("unknown entity_type '{entity_type_str}'"),
    })?;
    let aliases: Vec<String> = serde_json::from_str(&aliases_json).map_err(to_storage_err_json)?;
    Ok(Entity {
        id: EntityId(id),
        name,
        canonical_name,
        entity_type,
        aliases,
        confidence,
        created_at: parse_dt(&created_at_str)?,
    })
}

fn to_storage_err_json(e: serde_json::Error) -> cortexpool_core::CortexError {
    StorageError::Serialization(e).into()
}

#[allow(clippy::type_complexity)]
pub(crate) fn fact_from_row(
    row: &Row<'_>,
) -> rusqlite::Result<(
    i64,
    i64,
    String,
    Option<i64>,
    String,
    String,
    f64,
    f64,
    String,
    String,
    i64,
    String,
    Option<i64>,
)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
        row.get(12)?,
    ))
}

#[allow(clippy::type_complexity)]
pub(crate) fn build_fact(
    (id, subject_id, predicate, object_id, content, tier_str, importance, confidence, source, last_used_str, use_count, created_at_str, ttl_ms): (
        i64,
        i64,
        String,
        Option<i64>,
        String,
        String,
        f64,
        f64,
        String,
        String,
        i64,
        String,
        Option<i64>,
    ),
) -> CortexResult<Fact> {
    let tier = Tier::parse(&tier_str).ok_or_else(|| StorageError::Sqlite {
        message: format!("unknown tier '{tier_str}'"),
    })?;
    Ok(Fact {
        id: FactId(id),
        subject_id: EntityId(subject_id),
        predicate,
        object_id: object_id.map(EntityId),
        content,
        tier,
        importance,
        confidence,
        source,
        last_used: parse_dt(&last_used_str)?,
        use_count,
        created_at: parse_dt(&created_at_str)?,
        ttl_ms,
    })
}

pub(crate) fn build_topic(row: &Row<'_>) -> CortexResult<Topic> {
    let topic: String = row.get(0).map_err(|e| to_storage_err(e))?;
    let weight: f64 = row.get(1).map_err(|e| to_storage_err(e))?;
    let last_seen: String = row.get(2).map_err(|e| to_storage_err(e))?;
    Ok(Topic {
        topic,
        weight,
        last_seen: parse_dt(&last_seen)?,
    })
}

pub(crate) fn build_co_reference(row: &Row<'_>) -> CortexResult<CoReference> {
    let pronoun: String = row.get(0).map_err(|e| to_storage_err(e))?;
    let entity_id: i64 = row.get(1).map_err(|e| to_storage_err(e))?;
    let context: String = row.get(2).map_err(|e| to_storage_err(e))?;
    let last_seen: String = row.get(3).map_err(|e| to_storage_err(e))?;
    Ok(CoReference {
        pronoun,
        entity_id: EntityId(entity_id),
        context,
        last_seen: parse_dt(&last_seen)?,
    })
}

pub(crate) fn build_activation_entry(row: &Row<'_>) -> CortexResult<ActivationHistoryEntry> {
    let entity_id: i64 = row.get(0).map_err(|e| to_storage_err(e))?;
    let activation: f64 = row.get(1).map_err(|e| to_storage_err(e))?;
    let source: String = row.get(2).map_err(|e| to_storage_err(e))?;
    let timestamp: String = row.get(3).map_err(|e| to_storage_err(e))?;
    Ok(ActivationHistoryEntry {
        entity_id: EntityId(entity_id),
        activation,
        source,
        timestamp: parse_dt(&timestamp)?,
    })
}

pub(crate) fn build_contradiction(row: &Row<'_>) -> CortexResult<Contradiction> {
    let fact1_id: i64 = row.get(0).map_err(|e| to_storage_err(e))?;
    let fact2_id: i64 = row.get(1).map_err(|e| to_storage_err(e))?;
    let detected_at: String = row.get(2).map_err(|e| to_storage_err(e))?;
    Ok(Contradiction {
        fact1_id: FactId(fact1_id),
        fact2_id: FactId(fact2_id),
        detected_at: parse_dt(&detected_at)?,
    })
}

pub(crate) fn build_reflection_entry(row: &Row<'_>) -> CortexResult<ReflectionLogEntry> {
    let id: i64 = row.get(0).map_err(|e| to_storage_err(e))?;
    let ran_at: String = row.get(1).map_err(|e| to_storage_err(e))?;
    let contradictions_found: i64 = row.get(2).map_err(|e| to_storage_err(e))?;
    let entities_merged: i64 = row.get(3).map_err(|e| to_storage_err(e))?;
    let facts_compressed: i64 = row.get(4).map_err(|e| to_storage_err(e))?;
    let details_str: String = row.get(5).map_err(|e| to_storage_err(e))?;
    let details = serde_json::from_str(&details_str).map_err(to_storage_err_json)?;
    Ok(ReflectionLogEntry {
        id,
        ran_at: parse_dt(&ran_at)?,
        contradictions_found,
        entities_merged,
        facts_compressed,
        details,
    })
}

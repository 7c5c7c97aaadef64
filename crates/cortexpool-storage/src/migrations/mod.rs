//! Schema creation. One `execute_batch` call, matching the teacher's
//! `cortex-storage::migrations` module shape but collapsed to a single
//! versioned script since the engine has no migration history to replay yet.

use rusqlite::Connection;

use cortexpool_core::errors::CortexResult;

use crate::to_storage_err;

pub fn run(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(SCHEMA).map_err(|e| to_storage_err(e).into())
}

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS entities (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    canonical_name  TEXT NOT NULL UNIQUE,
    entity_type     TEXT NOT NULL,
    aliases         TEXT NOT NULL,
    confidence      REAL NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS facts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id      INTEGER NOT NULL REFERENCES entities(id),
    predicate       TEXT NOT NULL,
    object_id       INTEGER REFERENCES entities(id),
    content         TEXT NOT NULL,
    tier            TEXT NOT NULL,
    importance      REAL NOT NULL,
    confidence      REAL NOT NULL,
    source          TEXT NOT NULL,
    last_used       TEXT NOT NULL,
    use_count       INTEGER NOT NULL,
    created_at      TEXT NOT NULL,
    ttl_ms          INTEGER
);

CREATE INDEX IF NOT EXISTS idx_facts_subject ON facts(subject_id);
CREATE INDEX IF NOT EXISTS idx_facts_object ON facts(object_id);
CREATE INDEX IF NOT EXISTS idx_facts_tier ON facts(tier);
CREATE INDEX IF NOT EXISTS idx_facts_importance ON facts(importance DESC);
CREATE INDEX IF NOT EXISTS idx_facts_tier_ttl ON facts(tier, ttl_ms);

CREATE TABLE IF NOT EXISTS pool (
    fact_id         INTEGER NOT NULL,
    relevance_score REAL NOT NULL,
    added_at        TEXT NOT NULL,
    rank            INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS topics (
    topic       TEXT PRIMARY KEY,
    weight      REAL NOT NULL,
    last_seen   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contradictions (
    fact1_id     INTEGER NOT NULL,
    fact2_id     INTEGER NOT NULL,
    detected_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reflections (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    ran_at               TEXT NOT NULL,
    contradictions_found INTEGER NOT NULL,
    entities_merged      INTEGER NOT NULL,
    facts_compressed     INTEGER NOT NULL,
    details              TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS co_references (
    pronoun    TEXT PRIMARY KEY,
    entity_id  INTEGER NOT NULL REFERENCES entities(id),
    context    TEXT NOT NULL,
    last_seen  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS activation_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_id   INTEGER NOT NULL,
    activation  REAL NOT NULL,
    source      TEXT NOT NULL,
    timestamp   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activation_history_entity ON activation_history(entity_id);
"#;

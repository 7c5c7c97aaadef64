//! # cortexpool-consolidation
//!
//! Reflection/maintenance (spec §4.7) and episodic TTL eviction (spec §4.9).

mod compression;
mod contradictions;
mod decay;
mod entity_merge;
mod eviction;

pub use eviction::cleanup_expired_episodic;

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use cortexpool_core::config::{ConsolidationConfig, DecayConfig};
use cortexpool_core::errors::CortexResult;
use cortexpool_core::models::ReflectionLogEntry;
use cortexpool_core::traits::IPersistenceAdapter;
use cortexpool_retrieval::RetrievalPipeline;

/// The `{contradictions, entities, compressed}` counts spec §4.7's
/// `reflect()` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReflectionReport {
    pub contradictions: i64,
    pub entities: i64,
    pub compressed: i64,
    pub decayed: i64,
}

pub struct Consolidator {
    adapter: Arc<dyn IPersistenceAdapter>,
    decay: DecayConfig,
    consolidation: ConsolidationConfig,
}

impl Consolidator {
    pub fn new(adapter: Arc<dyn IPersistenceAdapter>, decay: DecayConfig, consolidation: ConsolidationConfig) -> Self {
        Self {
            adapter,
            decay,
            consolidation,
        }
    }

    /// Runs every phase of spec §4.7's `reflect()` in order. No phase
    /// aborts later phases: a failing phase is logged and counted as zero
    /// (spec §7).
    pub fn reflect(
        &self,
        current_topics: Option<&[String]>,
        pipeline: Option<&mut RetrievalPipeline>,
        pool_size: usize,
    ) -> CortexResult<ReflectionReport> {
        let decayed = self.catch_phase("time_decay", || decay::time_decay(self.adapter.as_ref(), &self.decay));
        let contradictions =
            self.catch_phase("contradiction_detection", || contradictions::detect_contradictions(self.adapter.as_ref()));
        let entities = self.catch_phase("duplicate_entity_consolidation", || {
            entity_merge::consolidate_duplicate_entities(self.adapter.as_ref())
        });
        let compressed =
            self.catch_phase("memory_compression", || compression::compress_memory(self.adapter.as_ref(), &self.consolidation));

        if let (Some(topics), Some(pipeline)) = (current_topics, pipeline) {
            self.catch_phase("refresh_pool", || {
                pipeline.retrieve(topics, pool_size)?;
                Ok(0)
            });
        }

        let report = ReflectionReport {
            contradictions,
            entities,
            compressed,
            decayed,
        };
        self.append_log(&report)?;
        Ok(report)
    }

    fn append_log(&self, report: &ReflectionReport) -> CortexResult<()> {
        let entry = ReflectionLogEntry {
            id: 0, // assigned by the adapter
            ran_at: Utc::now(),
            contradictions_found: report.contradictions,
            entities_merged: report.entities,
            facts_compressed: report.compressed,
            details: json!({ "decayed": report.decayed }),
        };
        self.adapter.append_reflection_log(&entry)
    }

    fn catch_phase<F>(&self, name: &str, f: F) -> i64
    where
        F: FnOnce() -> CortexResult<i64>,
    {
        match f() {
            Ok(count) => count,
            Err(err) => {
                tracing::error!(phase = name, error = %err, "reflection phase failed, continuing");
                0
            }
        }
    }
}

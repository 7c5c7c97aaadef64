/// Errors from a single reflection phase. Per spec §7, a phase failure is
/// logged and swallowed by the orchestrator rather than aborting later
/// phases — this type exists so each phase has something concrete to log.
#[derive(Debug, thiserror::Error)]
pub enum ConsolidationError {
    #[error("decay phase failed: {0}")]
    Decay(String),

    #[error("contradiction detection failed: {0}")]
    ContradictionDetection(String),

    #[error("entity consolidation failed: {0}")]
    EntityConsolidation(String),

    #[error("memory compression failed: {0}")]
    MemoryCompression(String),
}

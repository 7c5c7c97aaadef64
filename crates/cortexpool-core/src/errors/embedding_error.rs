/// Errors from the pluggable vector embedder (spec §7 `Vector` — always
/// recovered internally by the retrieval pipeline, never surfaced to callers
/// of `retrieve`).
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedder request failed: {0}")]
    Request(String),

    #[error("embedder returned malformed response: {0}")]
    MalformedResponse(String),

    #[error("no vector backend configured")]
    NotConfigured,
}

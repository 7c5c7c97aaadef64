use super::{ConsolidationError, EmbeddingError, RetrievalError, SessionError, StorageError};

/// Top-level error type for the CortexPool memory engine.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum CortexError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("consolidation error: {0}")]
    Consolidation(#[from] ConsolidationError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("invalid parameter: {0}")]
    Invalid(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),
}

/// Convenience alias used throughout the workspace.
pub type CortexResult<T> = Result<T, CortexError>;

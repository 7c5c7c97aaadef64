/// Errors from scoring and pool materialization.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("invalid pool size: {0}")]
    InvalidPoolSize(usize),

    #[error("vector backend failed: {0}")]
    VectorBackend(String),
}

mod cortex_error;
mod storage_error;
mod retrieval_error;
mod consolidation_error;
mod embedding_error;
mod session_error;

pub use consolidation_error::ConsolidationError;
pub use cortex_error::{CortexError, CortexResult};
pub use embedding_error::EmbeddingError;
pub use retrieval_error::RetrievalError;
pub use session_error::SessionError;
pub use storage_error::StorageError;

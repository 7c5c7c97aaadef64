use crate::errors::CortexResult;
use crate::ids::FactId;

/// Pluggable external embedder (spec §6 "Vector embedder (optional)").
///
/// The only async boundary in the core (spec §5): everything else in the
/// engine is synchronous and local.
#[allow(async_fn_in_trait)]
pub trait IVectorBackend: Send + Sync {
    /// `embed(text) -> vector<float, dimensions>`.
    async fn embed(&self, text: &str) -> CortexResult<Vec<f32>>;

    /// `searchByVector(queryText, limit) -> [(factId, score)]`.
    async fn search_by_vector(
        &self,
        query_text: &str,
        limit: usize,
    ) -> CortexResult<Vec<(FactId, f64)>>;
}

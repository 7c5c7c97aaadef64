//! # cortexpool-embeddings
//!
//! `HttpVectorBackend`: the one concrete `IVectorBackend` implementation
//! shipped with the engine, calling out to a configurable HTTP embedding
//! service (spec §6 "external embedding service").

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cortexpool_core::config::EmbeddingConfig;
use cortexpool_core::errors::{CortexResult, EmbeddingError};
use cortexpool_core::ids::FactId;
use cortexpool_core::traits::IVectorBackend;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    vector: Vec<f32>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
}

#[derive(Deserialize)]
struct SearchHit {
    fact_id: i64,
    score: f64,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

/// Talks to an external embedding service over HTTP. `POST {endpoint}/embed`
/// returns a dense vector; `POST {endpoint}/search` returns ranked
/// `(factId, score)` pairs for a text query.
pub struct HttpVectorBackend {
    client: reqwest::Client,
    config: EmbeddingConfig,
}

impl HttpVectorBackend {
    pub fn new(config: EmbeddingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("reqwest client builds with a plain timeout");
        Self { client, config }
    }
}

impl IVectorBackend for HttpVectorBackend {
    async fn embed(&self, text: &str) -> CortexResult<Vec<f32>> {
        if !self.config.enabled {
            return Err(EmbeddingError::NotConfigured.into());
        }

        let url = format!("{}/embed", self.config.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        if body.vector.len() != self.config.dimensions {
            tracing::warn!(
                expected = self.config.dimensions,
                actual = body.vector.len(),
                "embedder returned unexpected vector width"
            );
        }
        Ok(body.vector)
    }

    async fn search_by_vector(&self, query_text: &str, limit: usize) -> CortexResult<Vec<(FactId, f64)>> {
        if !self.config.enabled {
            return Err(EmbeddingError::NotConfigured.into());
        }

        let url = format!("{}/search", self.config.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&SearchRequest {
                query: query_text,
                limit,
            })
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .map(|hit| (FactId(hit.fact_id), hit.score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_backend_rejects_embed_without_a_network_call() {
        let backend = HttpVectorBackend::new(EmbeddingConfig::default());
        let err = backend.embed("hello").await.unwrap_err();
        assert!(matches!(err, cortexpool_core::CortexError::Embedding(EmbeddingError::NotConfigured)));
    }

    #[tokio::test]
    async fn disabled_backend_rejects_search_without_a_network_call() {
        let backend = HttpVectorBackend::new(EmbeddingConfig::default());
        let err = backend.search_by_vector("topic", 5).await.unwrap_err();
        assert!(matches!(err, cortexpool_core::CortexError::Embedding(EmbeddingError::NotConfigured)));
    }
}

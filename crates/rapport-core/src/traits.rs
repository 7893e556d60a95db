//! Backend traits decoupling the search service from Postgres and Ollama.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{HybridWeights, LogHit};

// =============================================================================
// STORE TRAITS
// =============================================================================

/// Store of relationship interaction logs supporting the three search
/// strategies. Each query is scoped to one user and returns at most `limit`
/// rows with only the strategy's own score column populated (the hybrid
/// query blends its two arm scores itself).
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Full-text search ranked by `ts_rank`.
    async fn keyword_search(&self, query: &str, user_id: Uuid, limit: i64) -> Result<Vec<LogHit>>;

    /// Vector similarity search ranked by cosine similarity.
    async fn semantic_search(
        &self,
        embedding: &crate::Vector,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<LogHit>>;

    /// Blended full-text + vector search. The store owns the weight
    /// combination; callers receive a single `hybrid_score` per row.
    async fn hybrid_search(
        &self,
        query: &str,
        embedding: &crate::Vector,
        user_id: Uuid,
        limit: i64,
        weights: HybridWeights,
    ) -> Result<Vec<LogHit>>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for generating text embeddings.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate embeddings for the given texts.
    ///
    /// Returns a vector of embedding vectors, one per input text. Every
    /// returned vector has exactly `dimension()` components.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<crate::Vector>>;

    /// Get the expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

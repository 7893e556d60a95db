//! Search orchestration: strategy resolution, query embedding, store
//! dispatch, ranking, and response composition.
//!
//! Failure phases are strict. Everything before ranking (bad input, missing
//! embedding, store failure) aborts the request; once hits are ranked, the
//! request cannot fail outright and composition can only degrade the answer.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use rapport_core::{
    defaults, EmbeddingBackend, Error, HybridWeights, LogHit, LogStore, Result, SearchOutcome,
    Vector,
};

use crate::composer::ResponseComposer;
use crate::ranker::rank;
use crate::strategy::Strategy;

/// A search request as received from the boundary.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: String,
    /// Requested result cap. `None` or a non-positive value falls back to
    /// the default of 10 before the store query, so the ranker's
    /// return-all rule for non-positive limits is never reached from here.
    pub match_count: Option<i64>,
    /// Per-request hybrid weight override; falls back to the service
    /// defaults when absent.
    pub weights: Option<HybridWeights>,
}

/// Multi-strategy search service over relationship logs.
pub struct SearchService {
    store: Arc<dyn LogStore>,
    embedder: Arc<dyn EmbeddingBackend>,
    composer: ResponseComposer,
    weights: HybridWeights,
}

impl SearchService {
    /// Create a service with default hybrid weights.
    pub fn new(
        store: Arc<dyn LogStore>,
        embedder: Arc<dyn EmbeddingBackend>,
        composer: ResponseComposer,
    ) -> Self {
        Self {
            store,
            embedder,
            composer,
            weights: HybridWeights::default(),
        }
    }

    /// Override the hybrid blend weights.
    pub fn with_weights(mut self, weights: HybridWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Execute a search scoped to one user.
    #[instrument(skip(self, request), fields(
        subsystem = "search",
        component = "service",
        op = "search",
        user_id = %user_id,
        search_type = %request.search_type,
    ))]
    pub async fn search(&self, request: &SearchRequest, user_id: Uuid) -> Result<SearchOutcome> {
        let start = Instant::now();

        // Strategy resolution happens before any I/O so an unknown
        // search_type never costs a backend or store call.
        let strategy = Strategy::from_str(&request.search_type)?;

        let query = request.query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query must not be empty".to_string()));
        }

        let limit = request
            .match_count
            .filter(|c| *c > 0)
            .unwrap_or(defaults::MATCH_COUNT);

        let embedding = if strategy.requires_embedding() {
            Some(self.embed_query(query).await?)
        } else {
            None
        };

        let weights = request.weights.unwrap_or(self.weights);

        let fetch_start = Instant::now();
        let hits = self
            .dispatch(strategy, query, embedding.as_ref(), user_id, limit, weights)
            .await?;
        debug!(
            strategy = %strategy,
            result_count = hits.len(),
            duration_ms = fetch_start.elapsed().as_millis() as u64,
            "Store retrieval complete"
        );

        let ranked = rank(hits, strategy.score_kind(), limit);

        // Past this point the request cannot fail outright (unless the
        // composer runs in fatal mode); a degraded answer still carries
        // the ranked results.
        let answer = self.composer.compose(query, &ranked).await?;

        info!(
            strategy = %strategy,
            result_count = ranked.len(),
            answered = answer.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search completed"
        );

        Ok(SearchOutcome {
            count: ranked.len(),
            results: ranked,
            answer,
        })
    }

    async fn embed_query(&self, query: &str) -> Result<Vector> {
        let vectors = self.embedder.embed_texts(&[query.to_string()]).await?;

        let vector = vectors.into_iter().next().ok_or_else(|| {
            Error::Precondition("embedding backend returned no vector for query".to_string())
        })?;

        let expected = self.embedder.dimension();
        if vector.as_slice().len() != expected {
            return Err(Error::Embedding(format!(
                "query embedding has dimension {} (expected {})",
                vector.as_slice().len(),
                expected
            )));
        }

        Ok(vector)
    }

    async fn dispatch(
        &self,
        strategy: Strategy,
        query: &str,
        embedding: Option<&Vector>,
        user_id: Uuid,
        limit: i64,
        weights: HybridWeights,
    ) -> Result<Vec<LogHit>> {
        match strategy {
            Strategy::Keyword => self.store.keyword_search(query, user_id, limit).await,
            Strategy::Semantic => {
                let embedding = embedding.ok_or_else(|| {
                    Error::Precondition("semantic search requires a query embedding".to_string())
                })?;
                self.store.semantic_search(embedding, user_id, limit).await
            }
            Strategy::Hybrid => {
                let embedding = embedding.ok_or_else(|| {
                    Error::Precondition("hybrid search requires a query embedding".to_string())
                })?;
                self.store
                    .hybrid_search(query, embedding, user_id, limit, weights)
                    .await
            }
        }
    }
}

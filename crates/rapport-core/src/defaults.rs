//! Centralized default constants for the rapport system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// EMBEDDING
// =============================================================================

/// Default embedding model name (Ollama).
pub const EMBED_MODEL: &str = "all-minilm";

/// Default embedding vector dimension for all-minilm (MiniLM-L6-v2).
pub const EMBED_DIMENSION: usize = 384;

// =============================================================================
// SEARCH
// =============================================================================

/// Default number of results returned by a search.
pub const MATCH_COUNT: i64 = 10;

/// Default full-text weight for hybrid search.
pub const HYBRID_FULL_TEXT_WEIGHT: f32 = 0.6;

/// Default semantic weight for hybrid search.
pub const HYBRID_SEMANTIC_WEIGHT: f32 = 0.4;

/// Candidate overfetch factor for each arm of the hybrid query.
pub const HYBRID_OVERFETCH: i64 = 2;

// =============================================================================
// COMPOSITION
// =============================================================================

/// Number of top-ranked logs included in the generation context.
pub const CONTEXT_TOP_K: usize = 5;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Default rate limit: max generation calls per period.
pub const RATE_LIMIT_CALLS: usize = 10;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model name (Ollama).
pub const GEN_MODEL: &str = "llama3.2";

/// Timeout for embedding requests in seconds.
pub const EMBED_TIMEOUT_SECS: u64 = 30;

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

//! # rapport-core
//!
//! Core types, traits, and abstractions shared across the rapport workspace.
//!
//! This crate provides:
//! - The error taxonomy and `Result` alias used by every subsystem
//! - Domain models for interaction logs and search results
//! - Backend traits for the log store, embedding, and generation services
//! - The sliding-window rate limiter guarding generation calls
//! - Structured logging field constants
//! - Shared default constants

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod ratelimit;
pub mod traits;

pub use error::{Error, Result};
pub use models::{HybridWeights, LogHit, RankedLog, ScoreKind, SearchOutcome};
pub use ratelimit::RateLimiter;
pub use traits::{EmbeddingBackend, GenerationBackend, LogStore};

/// Embedding vector type, shared with the pgvector column type.
pub use pgvector::Vector;

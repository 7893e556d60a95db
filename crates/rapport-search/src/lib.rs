//! # rapport-search
//!
//! Multi-strategy search over relationship interaction logs.
//!
//! This crate provides:
//! - Strategy resolution (`keyword`, `semantic`, `hybrid`)
//! - Score normalization and ranking with a missing-score default of 0.0
//! - Rate-limited response composition with graceful degradation
//! - The `SearchService` orchestrating resolve → embed → query → rank →
//!   compose

pub mod composer;
pub mod ranker;
pub mod service;
pub mod strategy;

// Re-export core types
pub use rapport_core::*;

pub use composer::{ComposerConfig, ResponseComposer};
pub use ranker::rank;
pub use service::{SearchRequest, SearchService};
pub use strategy::Strategy;

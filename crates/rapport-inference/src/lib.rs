//! # rapport-inference
//!
//! LLM inference backend abstraction for rapport.
//!
//! This crate provides:
//! - Ollama embedding and generation backends (default)
//! - A deterministic mock backend for testing (feature `mock`)
//!
//! # Feature Flags
//!
//! - `ollama` (default): Enable Ollama backend
//! - `mock`: Enable mock backend for tests
//! - `integration`: Enable integration tests that require a live server
//!
//! # Example
//!
//! ```rust,no_run
//! use rapport_inference::OllamaBackend;
//! use rapport_core::EmbeddingBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OllamaBackend::from_env().unwrap();
//!     let texts = vec!["Hello".to_string()];
//!     let embeddings = backend.embed_texts(&texts).await.unwrap();
//! }
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

// Mock inference backend for testing
#[cfg(feature = "mock")]
pub mod mock;

// Re-export core types
pub use rapport_core::*;

#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;

#[cfg(feature = "mock")]
pub use mock::MockInferenceBackend;

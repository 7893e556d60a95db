//! Mock inference backend for deterministic testing.
//!
//! Implements the core embedding and generation traits with deterministic
//! outputs and an observable call log, so search and composition tests can
//! assert how many backend calls happened and in which order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rapport_inference::mock::MockInferenceBackend;
//! use rapport_core::EmbeddingBackend;
//!
//! let backend = MockInferenceBackend::new()
//!     .with_dimension(384)
//!     .with_fixed_response("Test answer");
//!
//! let vectors = backend.embed_texts(&["hi".to_string()]).await.unwrap();
//! assert_eq!(vectors[0].as_slice().len(), 384);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use rapport_core::{EmbeddingBackend, Error, GenerationBackend, Result, Vector};

/// A single recorded backend call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
}

#[derive(Debug, Clone)]
struct MockConfig {
    dimension: usize,
    fixed_responses: HashMap<String, String>,
    default_response: String,
    fail_embedding: bool,
    fail_generation: bool,
    empty_embeddings: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            dimension: rapport_core::defaults::EMBED_DIMENSION,
            fixed_responses: HashMap::new(),
            default_response: "Mock response".to_string(),
            fail_embedding: false,
            fail_generation: false,
            empty_embeddings: false,
        }
    }
}

/// Mock inference backend for testing.
#[derive(Clone)]
pub struct MockInferenceBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockInferenceBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        Arc::make_mut(&mut self.config).dimension = dimension;
        self
    }

    /// Set a fixed response for generation requests.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a response mapping for a specific prompt.
    pub fn with_response_mapping(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(input.into(), output.into());
        self
    }

    /// Make every embedding call fail.
    pub fn with_failing_embedding(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_embedding = true;
        self
    }

    /// Make every generation call fail.
    pub fn with_failing_generation(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_generation = true;
        self
    }

    /// Make embedding calls return no vectors at all.
    pub fn with_empty_embeddings(mut self) -> Self {
        Arc::make_mut(&mut self.config).empty_embeddings = true;
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Number of embed calls made so far.
    pub fn embed_call_count(&self) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == "embed")
            .count()
    }

    /// Number of generation calls made so far.
    pub fn generate_call_count(&self) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == "generate")
            .count()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
        });
    }

    /// Deterministic embedding derived from the text bytes, normalized to
    /// unit length. Equal texts always produce equal vectors.
    fn generate_embedding(text: &str, dimension: usize) -> Vector {
        let mut values = vec![0.0f32; dimension];
        if dimension == 0 {
            return Vector::from(values);
        }

        // FNV-1a over the bytes, reseeded per component.
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in text.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        for value in values.iter_mut() {
            hash ^= hash >> 33;
            hash = hash.wrapping_mul(0xff51afd7ed558ccd);
            hash ^= hash >> 33;
            *value = ((hash % 2000) as f32 / 1000.0) - 1.0;
        }

        let magnitude: f32 = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in values.iter_mut() {
                *value /= magnitude;
            }
        }
        Vector::from(values)
    }
}

impl Default for MockInferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for MockInferenceBackend {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
        for text in texts {
            self.log_call("embed", text);
        }

        if self.config.fail_embedding {
            return Err(Error::Embedding("simulated embedding failure".to_string()));
        }
        if self.config.empty_embeddings {
            return Ok(vec![]);
        }

        Ok(texts
            .iter()
            .map(|t| Self::generate_embedding(t, self.config.dimension))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}

#[async_trait]
impl GenerationBackend for MockInferenceBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.log_call("generate", prompt);

        if self.config.fail_generation {
            return Err(Error::Generation(
                "simulated generation failure".to_string(),
            ));
        }

        if let Some(response) = self.config.fixed_responses.get(prompt) {
            return Ok(response.clone());
        }
        Ok(self.config.default_response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-gen"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeddings_are_deterministic_and_normalized() {
        let backend = MockInferenceBackend::new().with_dimension(384);
        let texts = vec!["hello".to_string(), "hello".to_string()];

        let vectors = backend.embed_texts(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].as_slice(), vectors[1].as_slice());
        assert_eq!(vectors[0].as_slice().len(), 384);

        let magnitude: f32 = vectors[0].as_slice().iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn different_texts_embed_differently() {
        let backend = MockInferenceBackend::new();
        let vectors = backend
            .embed_texts(&["alpha".to_string(), "beta".to_string()])
            .await
            .unwrap();
        assert_ne!(vectors[0].as_slice(), vectors[1].as_slice());
    }

    #[tokio::test]
    async fn failing_embedding_returns_error() {
        let backend = MockInferenceBackend::new().with_failing_embedding();
        let result = backend.embed_texts(&["x".to_string()]).await;
        assert!(matches!(result, Err(Error::Embedding(_))));
        assert_eq!(backend.embed_call_count(), 1);
    }

    #[tokio::test]
    async fn failing_generation_returns_error() {
        let backend = MockInferenceBackend::new().with_failing_generation();
        let result = backend.generate("prompt").await;
        assert!(matches!(result, Err(Error::Generation(_))));
        assert_eq!(backend.generate_call_count(), 1);
    }

    #[tokio::test]
    async fn response_mapping_takes_priority() {
        let backend = MockInferenceBackend::new()
            .with_fixed_response("default")
            .with_response_mapping("special", "mapped");

        assert_eq!(backend.generate("special").await.unwrap(), "mapped");
        assert_eq!(backend.generate("other").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn call_log_records_operations() {
        let backend = MockInferenceBackend::new();
        backend.embed_texts(&["a".to_string()]).await.unwrap();
        backend.generate("b").await.unwrap();

        let calls = backend.get_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].operation, "embed");
        assert_eq!(calls[1].operation, "generate");

        backend.clear_calls();
        assert!(backend.get_calls().is_empty());
    }
}

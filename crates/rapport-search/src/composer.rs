//! Response composition: bounded context, prompt assembly, and the
//! rate-limited generation call.
//!
//! Composition is strictly additive. Whatever happens here (rate limit
//! denial, backend failure), the ranked results the caller already holds
//! are never discarded; only the answer degrades to `None`.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use rapport_core::{defaults, Error, GenerationBackend, RankedLog, RateLimiter, Result};

/// Composer configuration.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// How many top-ranked logs feed the generation context.
    pub context_top_k: usize,
    /// When true, a failed generation call aborts the request instead of
    /// degrading the answer. Rate limit denials always degrade.
    pub fatal_generation: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            context_top_k: defaults::CONTEXT_TOP_K,
            fatal_generation: false,
        }
    }
}

/// Composes a natural-language answer from ranked logs.
pub struct ResponseComposer {
    generator: Arc<dyn GenerationBackend>,
    limiter: Arc<RateLimiter>,
    config: ComposerConfig,
}

impl ResponseComposer {
    /// Create a composer with default configuration.
    pub fn new(generator: Arc<dyn GenerationBackend>, limiter: Arc<RateLimiter>) -> Self {
        Self::with_config(generator, limiter, ComposerConfig::default())
    }

    /// Create a composer with custom configuration.
    pub fn with_config(
        generator: Arc<dyn GenerationBackend>,
        limiter: Arc<RateLimiter>,
        config: ComposerConfig,
    ) -> Self {
        Self {
            generator,
            limiter,
            config,
        }
    }

    /// Format the top-K ranked logs into context lines.
    ///
    /// One line per log: `<timestamp>: <content> (with <display_name>)`.
    pub fn build_context(&self, ranked: &[RankedLog]) -> String {
        ranked
            .iter()
            .take(self.config.context_top_k)
            .map(|log| {
                format!(
                    "{}: {} (with {})",
                    log.occurred_at.to_rfc3339(),
                    log.content,
                    log.display_name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Assemble the full generation prompt.
    pub fn build_prompt(&self, query: &str, context: &str) -> String {
        format!(
            "Answer based on these interactions:\n{}\n\nQuestion: {}",
            context, query
        )
    }

    /// Compose an answer for the query from the ranked logs.
    ///
    /// Returns `Ok(None)` when there is nothing to compose from, when the
    /// rate limiter denies the call, or when generation fails in non-fatal
    /// mode. Only fatal-mode generation failures surface as `Err`.
    #[instrument(skip(self, query, ranked), fields(
        subsystem = "search",
        component = "composer",
        op = "compose",
        result_count = ranked.len(),
    ))]
    pub async fn compose(&self, query: &str, ranked: &[RankedLog]) -> Result<Option<String>> {
        if ranked.is_empty() {
            // Nothing to summarize; do not consume a rate limit slot.
            debug!("No ranked results, skipping composition");
            return Ok(None);
        }

        if !self.limiter.attempt() {
            warn!(
                max_calls = self.limiter.max_calls(),
                period_secs = self.limiter.period().as_secs(),
                "Generation rate limited, degrading answer to null"
            );
            return Ok(None);
        }

        let context = self.build_context(ranked);
        let prompt = self.build_prompt(query, &context);
        debug!(prompt_len = prompt.len(), "Prompt assembled");

        match self.generator.generate(&prompt).await {
            Ok(answer) => {
                debug!(response_len = answer.len(), "Answer composed");
                Ok(Some(answer))
            }
            Err(e) if self.config.fatal_generation => {
                Err(Error::Generation(format!("generation failed: {}", e)))
            }
            Err(e) => {
                warn!(error = %e, "Generation failed, degrading answer to null");
                Ok(None)
            }
        }
    }
}

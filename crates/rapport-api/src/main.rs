//! rapport-api server binary.
//!
//! Startup order: env, tracing, database (with migrations), inference
//! backends, rate limiter, search service, HTTP listener.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::prelude::*;

use rapport_api::{app, AppState};
use rapport_core::{
    defaults, EmbeddingBackend, GenerationBackend, RateLimiter,
};
use rapport_db::{Database, PgLogStore, PoolConfig};
use rapport_inference::OllamaBackend;
use rapport_search::{ComposerConfig, ResponseComposer, SearchService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "rapport_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rapport_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("rapport-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/rapport".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::SERVER_PORT);

    // Generation rate limiting configuration
    // LLM_RATE_LIMIT_CALLS: generation calls per period (default: 10)
    // LLM_RATE_LIMIT_PERIOD_SECS: period in seconds (default: 60 = 1 minute)
    let rate_limit_calls: usize = std::env::var("LLM_RATE_LIMIT_CALLS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::RATE_LIMIT_CALLS);
    let rate_limit_period_secs: u64 = std::env::var("LLM_RATE_LIMIT_PERIOD_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults::RATE_LIMIT_PERIOD_SECS);

    // When set, a failed generation call fails the whole search instead of
    // degrading the answer to null.
    let fatal_generation: bool = std::env::var("GENERATION_FATAL")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    info!(
        "Generation rate limit: {} calls per {} seconds",
        rate_limit_calls, rate_limit_period_secs
    );

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect_with_config(&database_url, PoolConfig::from_env()).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Inference backends (Ollama, configured via OLLAMA_* env vars)
    let backend = Arc::new(OllamaBackend::from_env()?);
    let embedder: Arc<dyn EmbeddingBackend> = backend.clone();
    let generator: Arc<dyn GenerationBackend> = backend;
    info!(
        embed_model = embedder.model_name(),
        gen_model = generator.model_name(),
        "Inference backends ready"
    );

    let limiter = Arc::new(RateLimiter::new(
        rate_limit_calls,
        std::time::Duration::from_secs(rate_limit_period_secs),
    ));

    let composer = ResponseComposer::with_config(
        generator,
        limiter,
        ComposerConfig {
            fatal_generation,
            ..ComposerConfig::default()
        },
    );

    let store = Arc::new(PgLogStore::new(db.pool.clone()));
    let service = Arc::new(SearchService::new(store, embedder, composer));

    let state = AppState { service };
    let router = app(state);

    // Start server
    let addr: std::net::SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

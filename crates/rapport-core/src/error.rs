//! Error types for rapport.

use thiserror::Error;

/// Result type alias using rapport's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rapport operations.
///
/// Fatal kinds (`InvalidInput`, `Precondition`, `Database`, `Embedding`)
/// abort a search before ranking. Non-fatal kinds (`RateLimited`,
/// `Generation`) only degrade the composed answer and never discard
/// already-computed ranked results.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Embedding generation failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Text generation failed (distinct from rate limiting)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Generation call denied admission by the rate limiter
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// A required precondition was not met (e.g. semantic search without
    /// a query embedding)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for error kinds that abort a search request outright.
    ///
    /// Non-fatal kinds degrade only the generated answer; the enclosing
    /// search response still carries its ranked results.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::RateLimited(_) | Error::Generation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidInput(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

//! # rapport-db
//!
//! PostgreSQL database layer for rapport.
//!
//! This crate provides:
//! - Connection pool management
//! - The relationship log store with full-text (tsvector), vector
//!   (pgvector), and hybrid search
//! - Embedded schema migrations (feature `migrations`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use rapport_db::Database;
//! use rapport_core::LogStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/rapport").await?;
//!     let hits = db.logs.keyword_search("coffee", user_id, 10).await?;
//!     println!("{} hits", hits.len());
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod pool;

// Re-export core types
pub use rapport_core::*;

pub use logs::{NewLog, PgLogStore};
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Combined database context.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Relationship log store.
    pub logs: PgLogStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            logs: PgLogStore::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }
}

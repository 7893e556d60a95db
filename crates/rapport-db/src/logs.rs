//! Relationship log store with keyword, semantic, and hybrid search.
//!
//! All three queries are scoped to one user and ordered by their score
//! column. The hybrid query normalizes and blends both arm scores in SQL,
//! so callers never re-combine weights.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pgvector::Vector;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use rapport_core::{defaults, Error, HybridWeights, LogHit, LogStore, Result};

/// A new interaction log to insert.
#[derive(Debug, Clone)]
pub struct NewLog {
    pub user_id: Uuid,
    pub relationship_id: Uuid,
    pub display_name: String,
    pub content: String,
    pub occurred_at: DateTime<Utc>,
    pub embedding: Option<Vector>,
}

/// Log store backed by PostgreSQL tsvector + pgvector.
#[derive(Clone)]
pub struct PgLogStore {
    pool: Pool<Postgres>,
}

impl PgLogStore {
    /// Create a new PgLogStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert an interaction log, returning its id.
    pub async fn insert(&self, log: NewLog) -> Result<Uuid> {
        let row = sqlx::query(
            r#"
            INSERT INTO relationship_log
                (user_id, relationship_id, display_name, content, occurred_at, embedding)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING log_id
            "#,
        )
        .bind(log.user_id)
        .bind(log.relationship_id)
        .bind(&log.display_name)
        .bind(&log.content)
        .bind(log.occurred_at)
        .bind(log.embedding)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.get("log_id"))
    }
}

fn base_hit(row: &sqlx::postgres::PgRow) -> LogHit {
    LogHit {
        log_id: row.get("log_id"),
        relationship_id: row.get("relationship_id"),
        content: row.get("content"),
        display_name: row.get("display_name"),
        occurred_at: row.get("occurred_at"),
        keyword_score: None,
        semantic_score: None,
        hybrid_score: None,
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn keyword_search(&self, query: &str, user_id: Uuid, limit: i64) -> Result<Vec<LogHit>> {
        // Normalization flag 32 divides by rank + 1 for scores in [0, 1).
        let rows = sqlx::query(
            r#"
            SELECT log_id, relationship_id, content, display_name, occurred_at,
                   ts_rank(tsv, websearch_to_tsquery('english', $1), 32) AS keyword_score
            FROM relationship_log
            WHERE user_id = $2
              AND tsv @@ websearch_to_tsquery('english', $1)
            ORDER BY keyword_score DESC
            LIMIT $3
            "#,
        )
        .bind(query)
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let hits = rows
            .into_iter()
            .map(|row| {
                let mut hit = base_hit(&row);
                hit.keyword_score = row.get::<Option<f32>, _>("keyword_score");
                hit
            })
            .collect();

        Ok(hits)
    }

    async fn semantic_search(
        &self,
        embedding: &Vector,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<LogHit>> {
        // <=> is cosine distance; similarity = 1 - distance. The cast to
        // real is required because the operator returns float8.
        let rows = sqlx::query(
            r#"
            SELECT log_id, relationship_id, content, display_name, occurred_at,
                   (1 - (embedding <=> $1))::real AS semantic_score
            FROM relationship_log
            WHERE user_id = $2
              AND embedding IS NOT NULL
            ORDER BY embedding <=> $1
            LIMIT $3
            "#,
        )
        .bind(embedding)
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let hits = rows
            .into_iter()
            .map(|row| {
                let mut hit = base_hit(&row);
                hit.semantic_score = row.get::<Option<f32>, _>("semantic_score");
                hit
            })
            .collect();

        Ok(hits)
    }

    async fn hybrid_search(
        &self,
        query: &str,
        embedding: &Vector,
        user_id: Uuid,
        limit: i64,
        weights: HybridWeights,
    ) -> Result<Vec<LogHit>> {
        let overfetch = limit.saturating_mul(defaults::HYBRID_OVERFETCH);

        // Each arm overfetches its own top candidates; the outer query
        // unions the candidate ids and blends the two scores. A log that
        // only one arm found still surfaces with the other score as 0.
        let rows = sqlx::query(
            r#"
            WITH keyword AS (
                SELECT log_id,
                       ts_rank(tsv, websearch_to_tsquery('english', $1), 32) AS score
                FROM relationship_log
                WHERE user_id = $3
                  AND tsv @@ websearch_to_tsquery('english', $1)
                ORDER BY score DESC
                LIMIT $4
            ),
            semantic AS (
                SELECT log_id,
                       (1 - (embedding <=> $2))::real AS score
                FROM relationship_log
                WHERE user_id = $3
                  AND embedding IS NOT NULL
                ORDER BY embedding <=> $2
                LIMIT $4
            ),
            candidates AS (
                SELECT log_id FROM keyword
                UNION
                SELECT log_id FROM semantic
            )
            SELECT l.log_id, l.relationship_id, l.content, l.display_name, l.occurred_at,
                   (COALESCE(k.score, 0) * $5 + COALESCE(s.score, 0) * $6)::real AS hybrid_score
            FROM candidates c
            JOIN relationship_log l ON l.log_id = c.log_id
            LEFT JOIN keyword k ON k.log_id = c.log_id
            LEFT JOIN semantic s ON s.log_id = c.log_id
            ORDER BY hybrid_score DESC
            LIMIT $7
            "#,
        )
        .bind(query)
        .bind(embedding)
        .bind(user_id)
        .bind(overfetch)
        .bind(weights.full_text)
        .bind(weights.semantic)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let hits = rows
            .into_iter()
            .map(|row| {
                let mut hit = base_hit(&row);
                hit.hybrid_score = row.get::<Option<f32>, _>("hybrid_score");
                hit
            })
            .collect();

        Ok(hits)
    }
}

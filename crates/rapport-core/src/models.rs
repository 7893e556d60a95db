//! Domain models for relationship interaction logs and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which score column a search strategy produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    /// Postgres full-text `ts_rank` score.
    Keyword,
    /// pgvector cosine similarity score.
    Semantic,
    /// Store-blended keyword + semantic score.
    Hybrid,
}

impl std::fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword => write!(f, "keyword"),
            Self::Semantic => write!(f, "semantic"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Blend weights for the hybrid query. The store applies these when
/// combining the two normalized arm scores; callers never re-combine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    pub full_text: f32,
    pub semantic: f32,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            full_text: crate::defaults::HYBRID_FULL_TEXT_WEIGHT,
            semantic: crate::defaults::HYBRID_SEMANTIC_WEIGHT,
        }
    }
}

/// A single row returned by one of the store's search queries.
///
/// Each strategy populates only its own score column; the others come back
/// as `None`. Downstream ranking treats a missing score as 0.0 rather than
/// rejecting the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogHit {
    pub log_id: Uuid,
    pub relationship_id: Uuid,
    pub content: String,
    pub display_name: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hybrid_score: Option<f32>,
}

impl LogHit {
    /// The score for the given kind, if the row carries one.
    pub fn score(&self, kind: ScoreKind) -> Option<f32> {
        match kind {
            ScoreKind::Keyword => self.keyword_score,
            ScoreKind::Semantic => self.semantic_score,
            ScoreKind::Hybrid => self.hybrid_score,
        }
    }
}

/// A log hit after ranking: single resolved score, strategy-agnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLog {
    pub log_id: Uuid,
    pub relationship_id: Uuid,
    pub content: String,
    pub display_name: String,
    pub occurred_at: DateTime<Utc>,
    pub score: f32,
}

/// Final outcome of a search request: the ranked results plus the
/// optionally composed answer. `answer` is `None` when composition was
/// skipped, rate limited, or degraded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<RankedLog>,
    pub answer: Option<String>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(keyword: Option<f32>, semantic: Option<f32>, hybrid: Option<f32>) -> LogHit {
        LogHit {
            log_id: Uuid::new_v4(),
            relationship_id: Uuid::new_v4(),
            content: "Coffee with Sam".to_string(),
            display_name: "Sam".to_string(),
            occurred_at: Utc::now(),
            keyword_score: keyword,
            semantic_score: semantic,
            hybrid_score: hybrid,
        }
    }

    #[test]
    fn score_kind_display() {
        assert_eq!(ScoreKind::Keyword.to_string(), "keyword");
        assert_eq!(ScoreKind::Semantic.to_string(), "semantic");
        assert_eq!(ScoreKind::Hybrid.to_string(), "hybrid");
    }

    #[test]
    fn hybrid_weights_default() {
        let w = HybridWeights::default();
        assert!((w.full_text - 0.6).abs() < f32::EPSILON);
        assert!((w.semantic - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn hit_score_selects_matching_kind() {
        let h = hit(Some(0.9), Some(0.5), None);
        assert_eq!(h.score(ScoreKind::Keyword), Some(0.9));
        assert_eq!(h.score(ScoreKind::Semantic), Some(0.5));
        assert_eq!(h.score(ScoreKind::Hybrid), None);
    }

    #[test]
    fn hit_serialization_skips_missing_scores() {
        let h = hit(Some(0.7), None, None);
        let json = serde_json::to_value(&h).unwrap();
        assert!(json.get("keyword_score").is_some());
        assert!(json.get("semantic_score").is_none());
        assert!(json.get("hybrid_score").is_none());
    }

    #[test]
    fn outcome_serializes_null_answer() {
        let outcome = SearchOutcome {
            results: vec![],
            answer: None,
            count: 0,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("answer").unwrap().is_null());
        assert_eq!(json.get("count").unwrap().as_u64(), Some(0));
    }
}

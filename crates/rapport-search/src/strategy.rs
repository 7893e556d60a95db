//! Search strategy resolution.
//!
//! The strategy set is closed: an unrecognized name is rejected before any
//! store or backend call happens.

use std::str::FromStr;

use rapport_core::{Error, ScoreKind};

/// The three supported search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Postgres full-text search.
    Keyword,
    /// pgvector cosine similarity search.
    Semantic,
    /// Store-blended full-text + vector search.
    Hybrid,
}

impl Strategy {
    /// The score column this strategy populates.
    pub fn score_kind(&self) -> ScoreKind {
        match self {
            Self::Keyword => ScoreKind::Keyword,
            Self::Semantic => ScoreKind::Semantic,
            Self::Hybrid => ScoreKind::Hybrid,
        }
    }

    /// Whether this strategy needs a query embedding before dispatch.
    pub fn requires_embedding(&self) -> bool {
        matches!(self, Self::Semantic | Self::Hybrid)
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" => Ok(Self::Keyword),
            "semantic" => Ok(Self::Semantic),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(Error::InvalidInput(format!(
                "unknown search_type: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword => write!(f, "keyword"),
            Self::Semantic => write!(f, "semantic"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

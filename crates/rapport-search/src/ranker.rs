//! Score normalization and ranking.
//!
//! Hits are sorted by the active strategy's score column in descending
//! order. A hit missing that column ranks with score 0.0 instead of being
//! rejected, so heterogeneous store payloads never abort a search. The sort
//! is stable, preserving store order among ties.

use std::cmp::Ordering;

use rapport_core::{LogHit, RankedLog, ScoreKind};

/// Rank hits by the given score kind and truncate to `limit`.
///
/// A non-positive `limit` or one larger than the hit count returns all
/// ranked hits.
pub fn rank(hits: Vec<LogHit>, kind: ScoreKind, limit: i64) -> Vec<RankedLog> {
    let mut ranked: Vec<RankedLog> = hits
        .into_iter()
        .map(|hit| RankedLog {
            score: hit.score(kind).unwrap_or(0.0),
            log_id: hit.log_id,
            relationship_id: hit.relationship_id,
            content: hit.content,
            display_name: hit.display_name,
            occurred_at: hit.occurred_at,
        })
        .collect();

    // NaN scores compare as equal, keeping the sort total and stable.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    if limit > 0 && (limit as usize) < ranked.len() {
        ranked.truncate(limit as usize);
    }

    ranked
}

//! Pick aggregation and ranking.
//!
//! Merges candidates across every polled sport, sorts by expected
//! value descending, truncates to the top picks, and packages the
//! cycle's result snapshot. Admission already happened in the
//! analyzer — the ranker never re-filters, only sorts and truncates.

use chrono::{DateTime, Utc};

use crate::types::{PickCandidate, ResultSnapshot};

/// How many picks a snapshot carries. Everything below the cut is
/// discarded — no runner-up list is retained.
pub const TOP_PICKS_LIMIT: usize = 5;

/// Sort descending by EV (stable: ties keep discovery order) and
/// truncate to the default limit.
pub fn rank(candidates: Vec<PickCandidate>) -> Vec<PickCandidate> {
    rank_with_limit(candidates, TOP_PICKS_LIMIT)
}

/// Limit-parameterized ranking.
pub fn rank_with_limit(mut candidates: Vec<PickCandidate>, limit: usize) -> Vec<PickCandidate> {
    candidates.sort_by(|a, b| {
        b.expected_value
            .partial_cmp(&a.expected_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(limit);
    candidates
}

/// Package one poll cycle's output into a result snapshot.
///
/// `sports_polled` lists every polled sport whether or not it yielded
/// picks; `poll_errors` carries one entry per failed fetch. The count
/// of admitted candidates is recorded before truncation.
pub fn build_snapshot(
    candidates: Vec<PickCandidate>,
    limit: usize,
    sports_polled: Vec<String>,
    poll_errors: Vec<String>,
    month: u32,
    now: DateTime<Utc>,
) -> ResultSnapshot {
    let candidates_considered = candidates.len();

    ResultSnapshot {
        top_picks: rank_with_limit(candidates, limit),
        generated_at: now,
        sports_polled,
        poll_errors,
        candidates_considered,
        month,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

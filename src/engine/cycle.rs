//! The poll cycle — rotate, fetch, analyze, rank.
//!
//! One cycle polls the rotated sport set concurrently, scores every
//! fetched game, and packages the ranked snapshot. A single sport's
//! fetch failure is recorded and never aborts the rest of the cycle.
//!
//! Cycles are serialized by the external trigger (cron or manual run);
//! nothing here enforces mutual exclusion. If two cycles ever do
//! overlap, the snapshot store's last-write-wins semantics decides
//! which result survives.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{info, warn};

use crate::engine::analyzer::GameAnalyzer;
use crate::engine::ranker;
use crate::provider::OddsProvider;
use crate::rotation::{self, TRACKED_SPORT_QUOTA};
use crate::types::{PickCandidate, ResultSnapshot};

/// Drives one rotate → fetch → analyze → rank cycle.
pub struct PollEngine {
    provider: Arc<dyn OddsProvider>,
    analyzer: GameAnalyzer,
    quota: usize,
    top_limit: usize,
}

impl PollEngine {
    pub fn new(provider: Arc<dyn OddsProvider>, analyzer: GameAnalyzer) -> Self {
        Self {
            provider,
            analyzer,
            quota: TRACKED_SPORT_QUOTA,
            top_limit: ranker::TOP_PICKS_LIMIT,
        }
    }

    /// Override the sport quota and top-picks limit (config-driven).
    pub fn with_limits(mut self, quota: usize, top_limit: usize) -> Self {
        self.quota = quota;
        self.top_limit = top_limit;
        self
    }

    /// Run one poll cycle for the given calendar month.
    ///
    /// Every selected sport is fetched concurrently; failures become
    /// error entries with zero games. Candidates accumulate in
    /// discovery order (selection order → game order → outcome order)
    /// so that EV ties rank deterministically.
    pub async fn run_cycle(&self, month: u32, now: DateTime<Utc>) -> ResultSnapshot {
        let sports = rotation::tracked_sports_with_quota(month, self.quota);
        info!(
            month,
            sports = sports.len(),
            tracked = %sports.iter().map(|s| s.name).collect::<Vec<_>>().join(", "),
            "Starting poll cycle"
        );

        let fetches = sports.iter().map(|sport| self.provider.fetch_games(sport));
        let results = join_all(fetches).await;

        let mut candidates: Vec<PickCandidate> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for (sport, result) in sports.iter().zip(results) {
            match result {
                Ok(games) => {
                    let before = candidates.len();
                    for game in &games {
                        candidates.extend(self.analyzer.analyze(game));
                    }
                    info!(
                        sport = sport.name,
                        games = games.len(),
                        admitted = candidates.len() - before,
                        "Sport analyzed"
                    );
                }
                Err(e) => {
                    warn!(sport = sport.name, error = %e, "Sport fetch failed, continuing");
                    errors.push(format!("{}: {e}", sport.name));
                }
            }
        }

        let sports_polled = sports.iter().map(|s| s.name.to_string()).collect();
        let snapshot = ranker::build_snapshot(
            candidates,
            self.top_limit,
            sports_polled,
            errors,
            month,
            now,
        );

        info!(%snapshot, "Poll cycle complete");
        snapshot
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

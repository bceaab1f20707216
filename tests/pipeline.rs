//! Full poll-cycle integration tests.
//!
//! Drives rotation → fetch → analyze → rank → store against a
//! deterministic in-memory odds provider — no external dependencies.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use edgeline::engine::analyzer::{AnalyzerConfig, GameAnalyzer};
use edgeline::engine::cycle::PollEngine;
use edgeline::ledger::{BetLedger, BetSlip};
use edgeline::provider::OddsProvider;
use edgeline::rotation::SportDescriptor;
use edgeline::storage;
use edgeline::types::{Bookmaker, GameRecord, MarketOffer, Outcome, SettlementState};

// ---------------------------------------------------------------------------
// Deterministic provider
// ---------------------------------------------------------------------------

/// In-memory odds provider with known games per sport and a set of
/// sports that always fail, for exercising the error path.
struct StubProvider {
    failing: HashSet<&'static str>,
}

impl StubProvider {
    fn new(failing: &[&'static str]) -> Self {
        Self {
            failing: failing.iter().copied().collect(),
        }
    }

    fn make_game(sport_title: &str, home: &str, away: &str, home_price: i32, away_price: i32) -> GameRecord {
        GameRecord {
            sport_key: sport_title.to_lowercase().replace(' ', "_"),
            sport_title: sport_title.to_string(),
            commence_time: Utc.with_ymd_and_hms(2026, 1, 15, 0, 10, 0).unwrap(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            bookmakers: vec![Bookmaker {
                key: "draftkings".to_string(),
                title: "DraftKings".to_string(),
                markets: vec![MarketOffer {
                    key: "h2h".to_string(),
                    outcomes: vec![
                        Outcome { name: home.to_string(), price: home_price },
                        Outcome { name: away.to_string(), price: away_price },
                    ],
                }],
            }],
        }
    }
}

#[async_trait]
impl OddsProvider for StubProvider {
    async fn fetch_games(&self, sport: &SportDescriptor) -> Result<Vec<GameRecord>> {
        if self.failing.contains(sport.key) {
            anyhow::bail!("API error 500 Internal Server Error");
        }

        Ok(match sport.key {
            // Strong home favorite (high-EV pick) plus an away dog
            // that fails the admission filter.
            "basketball_nba" => vec![
                Self::make_game("NBA", "Boston Celtics", "Miami Heat", -110, -105),
                Self::make_game("NBA", "Denver Nuggets", "Utah Jazz", -180, 155),
            ],
            // Game priced outside the admission bounds on both sides.
            "basketball_ncaab" => vec![
                Self::make_game("NCAAB", "Duke", "Wagner", -900, 650),
            ],
            // Game with no moneyline offer from the designated book.
            "soccer_epl" => {
                let mut game = Self::make_game("EPL", "Arsenal", "Chelsea", -120, 110);
                game.bookmakers[0].key = "fanduel".to_string();
                vec![game]
            }
            _ => Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn engine(failing: &[&'static str]) -> PollEngine {
    PollEngine::new(
        Arc::new(StubProvider::new(failing)),
        GameAnalyzer::new(AnalyzerConfig::default()),
    )
}

fn temp_path(prefix: &str) -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("edgeline_it_{prefix}_{}.json", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

// ---------------------------------------------------------------------------
// Cycle behavior
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cycle_produces_ranked_admitted_picks() {
    let snapshot = engine(&[]).run_cycle(0, Utc::now()).await;

    // January rotation polls a full quota of sports, all listed
    // whether or not they yielded picks.
    assert_eq!(snapshot.sports_polled.len(), 8);
    assert!(snapshot.sports_polled.contains(&"NBA".to_string()));
    assert!(snapshot.sports_polled.contains(&"Tennis ATP".to_string()));
    assert!(snapshot.poll_errors.is_empty());
    assert_eq!(snapshot.month, 0);

    // Every surviving pick satisfies the admission filter, and the
    // out-of-bounds NCAAB lines produced nothing.
    assert!(!snapshot.top_picks.is_empty());
    assert!(snapshot.top_picks.len() <= 5);
    for pick in &snapshot.top_picks {
        assert!(pick.expected_value > -0.03, "{pick}");
        assert!(pick.american_odds.abs() < 250, "{pick}");
        assert_ne!(pick.sport_name, "NCAAB");
        assert_ne!(pick.sport_name, "EPL"); // wrong book → no offer
    }

    // Sorted by EV descending.
    for pair in snapshot.top_picks.windows(2) {
        assert!(pair[0].expected_value >= pair[1].expected_value);
    }

    // The -110 home favorite boosts into the strongest edge.
    let top = snapshot.top_pick().unwrap();
    assert_eq!(top.label, "Boston Celtics -110");
    assert_eq!(top.units, 3);
}

#[tokio::test]
async fn cycle_tolerates_single_sport_failure() {
    let snapshot = engine(&["icehockey_nhl"]).run_cycle(0, Utc::now()).await;

    assert_eq!(snapshot.poll_errors.len(), 1);
    assert!(snapshot.poll_errors[0].starts_with("NHL:"));
    assert!(snapshot.poll_errors[0].contains("500"));

    // The failed sport stays listed, and the others still analyzed.
    assert!(snapshot.sports_polled.contains(&"NHL".to_string()));
    assert!(!snapshot.top_picks.is_empty());
}

#[tokio::test]
async fn cycle_with_all_failures_is_empty_but_complete() {
    let all: Vec<&'static str> = edgeline::rotation::tracked_sports(0)
        .iter()
        .map(|s| s.key)
        .collect();
    let snapshot = engine(&all).run_cycle(0, Utc::now()).await;

    assert!(snapshot.top_picks.is_empty());
    assert_eq!(snapshot.poll_errors.len(), 8);
    assert_eq!(snapshot.sports_polled.len(), 8);
    assert_eq!(snapshot.candidates_considered, 0);
}

// ---------------------------------------------------------------------------
// Snapshot persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cycle_snapshot_roundtrips_through_store() {
    let path = temp_path("cycle_snap");
    let snapshot = engine(&["icehockey_nhl"]).run_cycle(0, Utc::now()).await;

    storage::save_snapshot(&snapshot, Some(&path)).unwrap();
    let loaded = storage::load_snapshot(Some(&path)).unwrap().unwrap();

    assert_eq!(loaded.top_picks.len(), snapshot.top_picks.len());
    assert_eq!(loaded.poll_errors, snapshot.poll_errors);
    assert_eq!(loaded.sports_polled, snapshot.sports_polled);
    assert_eq!(loaded.candidates_considered, snapshot.candidates_considered);

    storage::delete_snapshot(Some(&path)).unwrap();
}

#[tokio::test]
async fn stale_snapshot_detection_is_consumer_side() {
    let mut snapshot = engine(&[]).run_cycle(0, Utc::now()).await;
    snapshot.generated_at = Utc::now() - Duration::hours(30);

    let path = temp_path("stale_snap");
    storage::save_snapshot(&snapshot, Some(&path)).unwrap();

    // The store hands back stale data without complaint; the consumer
    // judges freshness from generated_at.
    let loaded = storage::load_snapshot(Some(&path)).unwrap().unwrap();
    let now = Utc::now();
    assert!(loaded.is_stale(now, Duration::hours(24)));
    assert_eq!(loaded.freshness_label(now), "1 days ago");

    storage::delete_snapshot(Some(&path)).unwrap();
}

// ---------------------------------------------------------------------------
// Pick → ledger flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn top_pick_converts_into_settled_bet() {
    let snapshot = engine(&[]).run_cycle(0, Utc::now()).await;
    let pick = snapshot.top_pick().unwrap();

    // Convert the recommendation into a logged wager (free-text seed
    // values, exactly what a tracker form would submit).
    let mut ledger = BetLedger::new();
    let id = ledger
        .record(BetSlip {
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            sport: pick.sport_name.clone(),
            game: pick.game_label.clone(),
            pick: pick.label.clone(),
            odds: Some(pick.american_odds),
            stake: Some(dec!(50)),
        })
        .unwrap()
        .id;

    ledger.settle(id, SettlementState::Win).unwrap();

    let stats = ledger.statistics();
    assert_eq!(stats.count, 1);
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.win_rate_percent, 100.0);
    // -110 favorite pays 50 * 100/110 = 45.45 after cent rounding.
    assert_eq!(stats.total_profit, dec!(45.45));

    // Persist and rehydrate through the bet store.
    let path = temp_path("ledger");
    storage::save_bets(ledger.bets(), Some(&path)).unwrap();
    let rehydrated = BetLedger::from_bets(storage::load_bets(Some(&path)).unwrap());
    assert_eq!(rehydrated.statistics(), stats);

    std::fs::remove_file(&path).unwrap();
}

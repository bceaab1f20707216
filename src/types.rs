//! Shared types for the EDGELINE engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that provider, engine, storage,
//! and ledger modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::odds::signed_odds;

// ---------------------------------------------------------------------------
// Provider game records
// ---------------------------------------------------------------------------

/// Market key for the two-way moneyline market on the odds provider.
pub const MONEYLINE_MARKET: &str = "h2h";

/// One fetched game with per-book market data, as returned by the
/// odds provider. Field names follow the provider's JSON verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub sport_key: String,
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

/// One book's market offerings for a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markets: Vec<MarketOffer>,
}

/// One market (e.g. `h2h`) with its priced outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOffer {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

/// One side of a two-way market: participant name and American odds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    /// American odds line (signed integer).
    pub price: i32,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, signed_odds(self.price))
    }
}

impl GameRecord {
    /// "Away at Home" matchup label used on picks and logged bets.
    pub fn matchup_label(&self) -> String {
        format!("{} at {}", self.away_team, self.home_team)
    }

    /// Whether the named participant is the home side of this game.
    pub fn is_home_side(&self, participant: &str) -> bool {
        participant == self.home_team
    }

    /// The designated book's two-way moneyline market, if offered.
    pub fn moneyline_for(&self, book_key: &str) -> Option<&MarketOffer> {
        self.bookmakers
            .iter()
            .find(|b| b.key == book_key)?
            .markets
            .iter()
            .find(|m| m.key == MONEYLINE_MARKET)
    }

    /// Helper to build a test/sample game with a priced moneyline.
    #[cfg(test)]
    pub fn sample(book: &str, home_price: i32, away_price: i32) -> Self {
        GameRecord {
            sport_key: "basketball_nba".to_string(),
            sport_title: "NBA".to_string(),
            commence_time: Utc::now() + chrono::Duration::hours(6),
            home_team: "Boston Celtics".to_string(),
            away_team: "Miami Heat".to_string(),
            bookmakers: vec![Bookmaker {
                key: book.to_string(),
                title: book.to_string(),
                markets: vec![MarketOffer {
                    key: MONEYLINE_MARKET.to_string(),
                    outcomes: vec![
                        Outcome {
                            name: "Boston Celtics".to_string(),
                            price: home_price,
                        },
                        Outcome {
                            name: "Miami Heat".to_string(),
                            price: away_price,
                        },
                    ],
                }],
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Picks
// ---------------------------------------------------------------------------

/// Confidence tier for a pick, derived from its EV band.
/// Drives the suggested unit size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Suggested stake size in units for this tier.
    pub fn units(&self) -> u32 {
        match self {
            Confidence::Low => 1,
            Confidence::Medium => 2,
            Confidence::High => 3,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Confidence::Low),
            "medium" | "med" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(anyhow::anyhow!("Unknown confidence tier: {s}")),
        }
    }
}

/// A scored wager candidate emitted by the game analyzer.
/// Immutable once created; the ranker only sorts and truncates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickCandidate {
    /// Participant plus signed odds, e.g. "Boston Celtics -180".
    pub label: String,
    /// "Away at Home" matchup label.
    pub game_label: String,
    pub sport_name: String,
    pub american_odds: i32,
    pub confidence: Confidence,
    /// Suggested stake in units (1–3), mirrors the confidence tier.
    pub units: u32,
    pub expected_value: f64,
    pub kickoff_time: DateTime<Utc>,
    /// Generated analysis text for display.
    pub narrative: String,
}

impl fmt::Display for PickCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | {} | EV {:+.1}% | {} ({}u)",
            self.sport_name,
            self.label,
            self.game_label,
            self.expected_value * 100.0,
            self.confidence,
            self.units,
        )
    }
}

// ---------------------------------------------------------------------------
// Result snapshot
// ---------------------------------------------------------------------------

/// The outcome of one poll cycle: top picks plus cycle metadata.
/// Entirely replaces the prior snapshot in the cache (last write wins,
/// no history retained).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSnapshot {
    /// EV-ranked picks, at most the configured top-picks limit.
    pub top_picks: Vec<PickCandidate>,
    pub generated_at: DateTime<Utc>,
    /// Names of every sport polled this cycle, whether or not it
    /// yielded picks.
    pub sports_polled: Vec<String>,
    /// One entry per sport whose fetch failed ("name: reason").
    pub poll_errors: Vec<String>,
    /// Admitted candidates across all sports before truncation.
    pub candidates_considered: usize,
    /// Calendar month (0–11) the rotation was computed for.
    pub month: u32,
}

impl fmt::Display for ResultSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} picks from {} sports ({} candidates, {} errors) @ {}",
            self.top_picks.len(),
            self.sports_polled.len(),
            self.candidates_considered,
            self.poll_errors.len(),
            self.generated_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

impl ResultSnapshot {
    /// The single best pick, if any.
    pub fn top_pick(&self) -> Option<&PickCandidate> {
        self.top_picks.first()
    }

    /// Whether the snapshot is older than the given duration.
    /// Staleness is judged by consumers; the cache itself never expires
    /// entries.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        now - self.generated_at > max_age
    }

    /// Humanized age text for display: "Just now", "12 minutes ago",
    /// "3 hours ago", "2 days ago".
    pub fn freshness_label(&self, now: DateTime<Utc>) -> String {
        let age = now - self.generated_at;
        let mins = age.num_minutes();
        let hours = age.num_hours();

        if mins < 5 {
            "Just now".to_string()
        } else if mins < 60 {
            format!("{mins} minutes ago")
        } else if hours < 24 {
            format!("{hours} hours ago")
        } else {
            format!("{} days ago", hours / 24)
        }
    }
}

// ---------------------------------------------------------------------------
// Logged bets
// ---------------------------------------------------------------------------

/// Settlement state of a logged bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementState {
    Pending,
    Win,
    Loss,
    Push,
}

impl SettlementState {
    pub fn is_settled(&self) -> bool {
        *self != SettlementState::Pending
    }
}

impl fmt::Display for SettlementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementState::Pending => write!(f, "PENDING"),
            SettlementState::Win => write!(f, "WIN"),
            SettlementState::Loss => write!(f, "LOSS"),
            SettlementState::Push => write!(f, "PUSH"),
        }
    }
}

impl std::str::FromStr for SettlementState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SettlementState::Pending),
            "win" | "won" => Ok(SettlementState::Win),
            "loss" | "lost" | "lose" => Ok(SettlementState::Loss),
            "push" => Ok(SettlementState::Push),
            _ => Err(anyhow::anyhow!("Unknown settlement state: {s}")),
        }
    }
}

/// A wager recorded by the user. Owned entirely by the bet ledger;
/// mutated only by settlement transitions, removed only by explicit
/// deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedBet {
    /// Creation-time-derived unique identifier (epoch milliseconds,
    /// bumped on collision).
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub sport: String,
    pub game: String,
    pub pick: String,
    pub odds: i32,
    pub stake: rust_decimal::Decimal,
    pub state: SettlementState,
    /// Realized profit; zero until settled.
    pub profit: rust_decimal::Decimal,
}

impl fmt::Display for LoggedBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} [{}] {} @ {} ${} — {} ({:+})",
            self.id,
            self.date,
            self.sport,
            self.pick,
            signed_odds(self.odds),
            self.stake,
            self.state,
            self.profit,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

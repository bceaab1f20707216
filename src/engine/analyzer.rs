//! Game analysis — situational adjustment, EV scoring, and admission.
//!
//! Turns one fetched game's two-way outcomes into zero or more scored
//! pick candidates. The probability model is a deliberately naive
//! static heuristic: a small home-favorite boost and away-underdog
//! fade around the implied line, nothing more. All of its constants
//! have no documented derivation and historical variants used
//! different values, so every one of them is configurable rather than
//! baked in.

use tracing::debug;

use crate::odds::{expected_value, implied_probability, signed_odds};
use crate::types::{Confidence, GameRecord, PickCandidate};

// ---------------------------------------------------------------------------
// Configuration (defaults — overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// Tunable knobs of the situational model and admission filter.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Designated book whose moneyline market is analyzed.
    pub book: String,
    /// Probability boost applied to home favorites.
    pub home_favorite_boost: f64,
    /// Upper cap on the boosted home-favorite probability.
    pub home_prob_cap: f64,
    /// Probability fade applied to away underdogs.
    pub away_underdog_fade: f64,
    /// Lower floor on the faded away-underdog probability.
    pub away_prob_floor: f64,
    /// Admission filter: candidates need EV strictly above this.
    pub min_ev: f64,
    /// Admission filter: candidates need |odds| strictly below this.
    pub max_abs_odds: i32,
    /// EV above this → high confidence, 3 units.
    pub strong_ev: f64,
    /// EV above this → medium confidence, 2 units.
    pub moderate_ev: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            book: "draftkings".to_string(),
            home_favorite_boost: 0.025,
            home_prob_cap: 0.72,
            away_underdog_fade: 0.015,
            away_prob_floor: 0.22,
            min_ev: -0.03,
            max_abs_odds: 250,
            strong_ev: 0.04,
            moderate_ev: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Scores one game's outcomes against the situational model.
pub struct GameAnalyzer {
    config: AnalyzerConfig,
}

impl GameAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Access the analyzer configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one fetched game. A game with no data for the
    /// designated book's moneyline market yields an empty result —
    /// "no offer", not a failure.
    pub fn analyze(&self, game: &GameRecord) -> Vec<PickCandidate> {
        let Some(market) = game.moneyline_for(&self.config.book) else {
            return Vec::new();
        };

        let mut picks = Vec::new();

        for outcome in &market.outcomes {
            let implied = implied_probability(outcome.price);
            let is_home = game.is_home_side(&outcome.name);
            let estimated = self.adjust(implied, is_home, outcome.price);
            let ev = expected_value(estimated, outcome.price);

            // Admission filter: drop long shots and clearly negative
            // EV. Rejection is silent — excluded, not an error.
            if ev <= self.config.min_ev || outcome.price.abs() >= self.config.max_abs_odds {
                debug!(
                    outcome = %outcome.name,
                    odds = outcome.price,
                    ev = format!("{:+.1}%", ev * 100.0),
                    "Outcome rejected by admission filter"
                );
                continue;
            }

            let confidence = self.grade(ev);

            picks.push(PickCandidate {
                label: format!("{} {}", outcome.name, signed_odds(outcome.price)),
                game_label: game.matchup_label(),
                sport_name: game.sport_title.clone(),
                american_odds: outcome.price,
                confidence,
                units: confidence.units(),
                expected_value: ev,
                kickoff_time: game.commence_time,
                narrative: narrative(&self.config, &outcome.name, is_home, implied, estimated, ev),
            });
        }

        picks
    }

    /// Situational probability adjustment around the implied line.
    /// Home favorites get a capped boost, away underdogs a floored
    /// fade; every other outcome keeps its implied probability.
    fn adjust(&self, implied: f64, is_home: bool, odds: i32) -> f64 {
        let is_favorite = odds < 0;

        if is_home && is_favorite {
            (implied + self.config.home_favorite_boost).min(self.config.home_prob_cap)
        } else if !is_home && !is_favorite {
            (implied - self.config.away_underdog_fade).max(self.config.away_prob_floor)
        } else {
            implied
        }
    }

    /// Map an EV to its confidence tier.
    fn grade(&self, ev: f64) -> Confidence {
        if ev > self.config.strong_ev {
            Confidence::High
        } else if ev > self.config.moderate_ev {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

// ---------------------------------------------------------------------------
// Narrative generation
// ---------------------------------------------------------------------------

/// Templated analysis text keyed on the EV band. Kept separate from
/// the EV math so it can be tested and swapped independently.
pub fn narrative(
    config: &AnalyzerConfig,
    team: &str,
    is_home: bool,
    implied: f64,
    estimated: f64,
    ev: f64,
) -> String {
    let location = if is_home { "at home" } else { "on the road" };
    let implied_pct = implied * 100.0;
    let estimated_pct = estimated * 100.0;
    let ev_pct = ev * 100.0;

    if ev > config.strong_ev {
        format!(
            "{team} {location}. Market implies {implied_pct:.1}% win probability, \
             but situational analysis suggests {estimated_pct:.1}%. \
             Strong +{ev_pct:.1}% expected value."
        )
    } else if ev > config.moderate_ev {
        format!(
            "{team} {location} with modest edge. Market pricing at {implied_pct:.1}% \
             vs. estimated {estimated_pct:.1}% gives +{ev_pct:.1}% EV."
        )
    } else {
        format!("{team} {location}. Near fair value with slight situational edge.")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

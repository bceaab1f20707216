//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`. Every section carries
//! defaults, so a partial (or absent) config file still yields a
//! runnable configuration — the defaults are the documented heuristic
//! values, not placeholders.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::engine::analyzer::AnalyzerConfig;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub provider: ProviderConfig,
    pub model: ModelConfig,
    pub storage: StorageConfig,
    pub bankroll: BankrollConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Sports polled per cycle — the provider quota.
    pub tracked_sport_quota: usize,
    /// Picks retained in each snapshot.
    pub top_picks_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tracked_sport_quota: crate::rotation::TRACKED_SPORT_QUOTA,
            top_picks_limit: crate::engine::ranker::TOP_PICKS_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    /// Env var holding the odds API key.
    pub api_key_env: String,
    pub region: String,
    /// Designated book whose two-way market is analyzed.
    pub bookmaker: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ODDS_API_KEY".to_string(),
            region: "us".to_string(),
            bookmaker: "draftkings".to_string(),
        }
    }
}

/// Situational-model and admission knobs. The magnitudes have no
/// documented derivation (historical variants used different values),
/// hence config-backed rather than hard-coded.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    pub home_favorite_boost: f64,
    pub home_prob_cap: f64,
    pub away_underdog_fade: f64,
    pub away_prob_floor: f64,
    pub min_ev: f64,
    pub max_abs_odds: i32,
    pub strong_ev: f64,
    pub moderate_ev: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let defaults = AnalyzerConfig::default();
        Self {
            home_favorite_boost: defaults.home_favorite_boost,
            home_prob_cap: defaults.home_prob_cap,
            away_underdog_fade: defaults.away_underdog_fade,
            away_prob_floor: defaults.away_prob_floor,
            min_ev: defaults.min_ev,
            max_abs_odds: defaults.max_abs_odds,
            strong_ev: defaults.strong_ev,
            moderate_ev: defaults.moderate_ev,
        }
    }
}

impl ModelConfig {
    /// Build the analyzer configuration for the designated book.
    pub fn to_analyzer_config(&self, bookmaker: &str) -> AnalyzerConfig {
        AnalyzerConfig {
            book: bookmaker.to_string(),
            home_favorite_boost: self.home_favorite_boost,
            home_prob_cap: self.home_prob_cap,
            away_underdog_fade: self.away_underdog_fade,
            away_prob_floor: self.away_prob_floor,
            min_ev: self.min_ev,
            max_abs_odds: self.max_abs_odds,
            strong_ev: self.strong_ev,
            moderate_ev: self.moderate_ev,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub snapshot_path: String,
    pub bets_path: String,
    /// Published picks document consumed by display clients; the
    /// local snapshot store is the fallback when unset or unreachable.
    pub artifact_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "picks_snapshot.json".to_string(),
            bets_path: "bet_ledger.json".to_string(),
            artifact_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BankrollConfig {
    /// Dollar value of one unit, for suggested-stake display.
    pub unit_stake: Decimal,
}

impl Default for BankrollConfig {
    fn default() -> Self {
        Self {
            unit_stake: dec!(50),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is
    /// absent. A present-but-invalid file is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}

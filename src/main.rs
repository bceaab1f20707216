//! EDGELINE — Sports Odds Value-Pick Engine
//!
//! Entry point for the scheduled poll job. Loads configuration,
//! initialises structured logging, runs one rotate→fetch→analyze→rank
//! cycle, stores the snapshot, and exits. External scheduling (cron,
//! twice daily) serializes cycles; overlap is resolved by the
//! snapshot store's last-write-wins semantics.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use edgeline::config::AppConfig;
use edgeline::engine::analyzer::GameAnalyzer;
use edgeline::engine::cycle::PollEngine;
use edgeline::provider::theoddsapi::OddsApiClient;
use edgeline::storage;
use edgeline::types::ResultSnapshot;

const BANNER: &str = r#"
  _____ ____   ____ _____ _     ___ _   _ _____
 | ____|  _ \ / ___| ____| |   |_ _| \ | | ____|
 |  _| | | | | |  _|  _| | |    | ||  \| |  _|
 | |___| |_| | |_| | |___| |___ | || |\  | |___
 |_____|____/ \____|_____|_____|___|_| \_|_____|

  Sports Odds Value-Pick Engine
  v0.1.0 — Scheduled Poll Job
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML (defaults when absent)
    let cfg = AppConfig::load_or_default("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");

    let now = Utc::now();
    let month = now.month0();

    info!(
        month,
        quota = cfg.engine.tracked_sport_quota,
        top_picks = cfg.engine.top_picks_limit,
        book = %cfg.provider.bookmaker,
        "EDGELINE starting poll cycle"
    );

    // -- Initialise components -------------------------------------------

    let api_key = AppConfig::resolve_env(&cfg.provider.api_key_env)?;

    let provider = OddsApiClient::new(
        api_key,
        cfg.provider.region.clone(),
        cfg.provider.bookmaker.clone(),
    )?;

    let analyzer = GameAnalyzer::new(cfg.model.to_analyzer_config(&cfg.provider.bookmaker));

    let engine = PollEngine::new(Arc::new(provider), analyzer)
        .with_limits(cfg.engine.tracked_sport_quota, cfg.engine.top_picks_limit);

    // -- Run one cycle and persist ---------------------------------------

    let snapshot = engine.run_cycle(month, now).await;

    // Store inaccessibility is the one fatal condition: a cycle whose
    // result cannot be persisted must fail loudly to the scheduler.
    storage::save_snapshot(&snapshot, Some(&cfg.storage.snapshot_path))?;

    log_cycle_report(&snapshot, cfg.bankroll.unit_stake);

    info!(
        picks = snapshot.top_picks.len(),
        path = %cfg.storage.snapshot_path,
        "EDGELINE cycle persisted, exiting."
    );

    Ok(())
}

/// Log a human-readable cycle summary with suggested stakes.
fn log_cycle_report(snapshot: &ResultSnapshot, unit_stake: Decimal) {
    info!(
        sports = snapshot.sports_polled.len(),
        candidates = snapshot.candidates_considered,
        picks = snapshot.top_picks.len(),
        errors = snapshot.poll_errors.len(),
        "Cycle complete"
    );

    for pick in &snapshot.top_picks {
        let suggested = unit_stake * Decimal::from(pick.units);
        info!(
            pick = %pick.label,
            game = %pick.game_label,
            sport = %pick.sport_name,
            ev = format!("{:+.1}%", pick.expected_value * 100.0),
            confidence = %pick.confidence,
            stake = format!("${suggested}"),
            "Recommended pick"
        );
    }

    for error in &snapshot.poll_errors {
        warn!(error = %error, "Sport fetch failed this cycle");
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("edgeline=info"));

    let json_logging = std::env::var("EDGELINE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

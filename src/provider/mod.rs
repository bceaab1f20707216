//! Odds provider integrations.
//!
//! Defines the `OddsProvider` trait and the client for The Odds API,
//! the sole upstream source of game lines. The trait exists so the
//! engine can be driven by a deterministic in-memory provider in tests.

pub mod theoddsapi;

use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::rotation::SportDescriptor;
use crate::types::GameRecord;

/// Abstraction over an upstream odds source.
///
/// Implementors fetch upcoming games with per-book market data for one
/// sport. A non-success response or network failure surfaces as an
/// error; the poll cycle converts it into "zero games plus one error
/// entry" rather than aborting the run.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OddsProvider: Send + Sync {
    /// Fetch upcoming games for the given sport.
    async fn fetch_games(&self, sport: &SportDescriptor) -> Result<Vec<GameRecord>>;

    /// Provider name for logging and identification.
    fn name(&self) -> &str;
}

//! The Odds API client.
//!
//! Read-only client for upcoming-game odds lines.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Base URL: https://api.the-odds-api.com/v4/
//! Quota: request-metered per API key — the sport rotation exists to
//! stay inside it. Auth: `apiKey` query parameter.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::OddsProvider;
use crate::rotation::SportDescriptor;
use crate::types::GameRecord;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://api.the-odds-api.com/v4";
const PROVIDER_NAME: &str = "the-odds-api";

/// Odds format requested from the provider. The whole engine speaks
/// American odds; never change this without changing the odds math.
const ODDS_FORMAT: &str = "american";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The Odds API platform client.
pub struct OddsApiClient {
    http: Client,
    api_key: String,
    /// Provider region filter, e.g. "us".
    region: String,
    /// Designated book whose lines are fetched, e.g. "draftkings".
    bookmaker: String,
}

impl OddsApiClient {
    /// Create a new client for the given API key, region, and
    /// designated book.
    pub fn new(api_key: String, region: String, bookmaker: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("EDGELINE/0.1.0 (sports-odds-engine)")
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            api_key,
            region,
            bookmaker,
        })
    }

    fn odds_url(&self, sport_key: &str) -> String {
        format!(
            "{BASE_URL}/sports/{}/odds?apiKey={}&regions={}&oddsFormat={ODDS_FORMAT}&bookmakers={}",
            urlencoding::encode(sport_key),
            self.api_key,
            self.region,
            self.bookmaker,
        )
    }
}

// ---------------------------------------------------------------------------
// OddsProvider trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl OddsProvider for OddsApiClient {
    /// Fetch upcoming games with the designated book's lines for one
    /// sport. Games missing the book or its moneyline market come back
    /// as-is — the analyzer treats those as "no offer".
    async fn fetch_games(&self, sport: &SportDescriptor) -> Result<Vec<GameRecord>> {
        debug!(sport = sport.key, book = %self.bookmaker, "Fetching odds");

        let resp = self
            .http
            .get(self.odds_url(sport.key))
            .send()
            .await
            .with_context(|| format!("Odds request failed for {}", sport.name))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("API error {status}: {body}");
        }

        let games: Vec<GameRecord> = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse odds response for {}", sport.name))?;

        info!(sport = sport.name, games = games.len(), "Odds fetched");

        Ok(games)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client() -> OddsApiClient {
        OddsApiClient::new(
            "test-key".to_string(),
            "us".to_string(),
            "draftkings".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_client() {
        let client = make_client();
        assert_eq!(client.name(), "the-odds-api");
    }

    #[test]
    fn test_odds_url_shape() {
        let client = make_client();
        let url = client.odds_url("basketball_nba");
        assert!(url.starts_with("https://api.the-odds-api.com/v4/sports/basketball_nba/odds?"));
        assert!(url.contains("apiKey=test-key"));
        assert!(url.contains("regions=us"));
        assert!(url.contains("oddsFormat=american"));
        assert!(url.contains("bookmakers=draftkings"));
    }

    #[test]
    fn test_odds_url_encodes_sport_key() {
        let client = make_client();
        let url = client.odds_url("soccer_uefa champs");
        assert!(url.contains("soccer_uefa%20champs"));
    }
}

//! Published snapshot artifact.
//!
//! The scheduled poll job publishes its snapshot as a static JSON
//! document; display consumers read that document instead of polling
//! the odds provider themselves. This client fetches it read-only and
//! plugs into the same `SnapshotSource` interface as the local cache.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::SnapshotSource;
use crate::types::ResultSnapshot;

/// Read-only client for the published picks document.
pub struct PublishedArtifact {
    http: Client,
    url: String,
}

impl PublishedArtifact {
    pub fn new(url: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("EDGELINE/0.1.0 (sports-odds-engine)")
            .build()
            .context("Failed to build HTTP client for published artifact")?;

        Ok(Self { http, url })
    }

    /// Fetch and parse the published snapshot document.
    pub async fn fetch(&self) -> Result<ResultSnapshot> {
        debug!(url = %self.url, "Fetching published snapshot");

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("Published artifact request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Published artifact unavailable: {status}");
        }

        let snapshot: ResultSnapshot = resp
            .json()
            .await
            .context("Failed to parse published snapshot")?;

        Ok(snapshot)
    }
}

#[async_trait]
impl SnapshotSource for PublishedArtifact {
    async fn latest(&self) -> Result<Option<ResultSnapshot>> {
        Ok(Some(self.fetch().await?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

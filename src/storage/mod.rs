//! Persistence layer.
//!
//! Saves and loads the latest result snapshot and the bet ledger
//! to/from JSON files. Both stores are single-key blobs: a store
//! unconditionally replaces the prior value, and the bet sequence is
//! rewritten in full on every mutation. There is no merging, history,
//! or TTL — staleness is judged by consumers from `generated_at`.
//!
//! Known race: overlapping poll cycles would race on the snapshot
//! file with no staleness check; the last writer wins even if its
//! data is older. The external trigger serializes cycles, so this is
//! documented rather than locked against.

pub mod artifact;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::types::{LoggedBet, ResultSnapshot};
use artifact::PublishedArtifact;

/// Default snapshot file path.
const DEFAULT_SNAPSHOT_FILE: &str = "picks_snapshot.json";

/// Default bet ledger file path.
const DEFAULT_BETS_FILE: &str = "bet_ledger.json";

// ---------------------------------------------------------------------------
// Snapshot store
// ---------------------------------------------------------------------------

/// Save a result snapshot, unconditionally replacing any prior value.
pub fn save_snapshot(snapshot: &ResultSnapshot, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_SNAPSHOT_FILE);
    let json = serde_json::to_string_pretty(snapshot)
        .context("Failed to serialise result snapshot")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write snapshot to {path}"))?;

    debug!(path, picks = snapshot.top_picks.len(), "Snapshot saved");
    Ok(())
}

/// Load the most recent snapshot.
/// Returns None if none has ever been stored (first use).
pub fn load_snapshot(path: Option<&str>) -> Result<Option<ResultSnapshot>> {
    let path = path.unwrap_or(DEFAULT_SNAPSHOT_FILE);

    if !Path::new(path).exists() {
        info!(path, "No cached snapshot found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read snapshot from {path}"))?;

    let snapshot: ResultSnapshot = serde_json::from_str(&json)
        .context(format!("Failed to parse snapshot from {path}"))?;

    info!(
        path,
        picks = snapshot.top_picks.len(),
        generated_at = %snapshot.generated_at,
        "Snapshot loaded from disk"
    );

    Ok(Some(snapshot))
}

/// Delete the snapshot file (for testing or reset).
pub fn delete_snapshot(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_SNAPSHOT_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .context(format!("Failed to delete snapshot file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Bet store
// ---------------------------------------------------------------------------

/// Persist the full bet sequence as one blob, rewritten on every
/// mutation. The ledger is the sole writer.
pub fn save_bets(bets: &[LoggedBet], path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_BETS_FILE);
    let json = serde_json::to_string_pretty(bets)
        .context("Failed to serialise bet ledger")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write bets to {path}"))?;

    debug!(path, bets = bets.len(), "Bet ledger saved");
    Ok(())
}

/// Load the full bet sequence. An absent file is a fresh ledger, not
/// an error.
pub fn load_bets(path: Option<&str>) -> Result<Vec<LoggedBet>> {
    let path = path.unwrap_or(DEFAULT_BETS_FILE);

    if !Path::new(path).exists() {
        info!(path, "No bet ledger found, starting fresh");
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read bets from {path}"))?;

    let bets: Vec<LoggedBet> = serde_json::from_str(&json)
        .context(format!("Failed to parse bets from {path}"))?;

    info!(path, bets = bets.len(), "Bet ledger loaded from disk");

    Ok(bets)
}

// ---------------------------------------------------------------------------
// Snapshot sources
// ---------------------------------------------------------------------------

/// Read interface over "the most recent snapshot", regardless of
/// where it lives. The published artifact and the local cache are two
/// views of the same data, not separate models.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// The latest known snapshot, or None if no data exists yet.
    async fn latest(&self) -> Result<Option<ResultSnapshot>>;
}

/// Durable local snapshot store (the cache written after each cycle).
pub struct FileSnapshotStore {
    path: Option<String>,
}

impl FileSnapshotStore {
    pub fn new(path: Option<String>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotStore {
    async fn latest(&self) -> Result<Option<ResultSnapshot>> {
        load_snapshot(self.path.as_deref())
    }
}

/// Availability-selected reader: prefer the published artifact when
/// configured and reachable, fall back to the local store otherwise.
pub struct SnapshotReader {
    artifact: Option<PublishedArtifact>,
    store: FileSnapshotStore,
}

impl SnapshotReader {
    pub fn new(artifact: Option<PublishedArtifact>, store: FileSnapshotStore) -> Self {
        Self { artifact, store }
    }

    /// The freshest available snapshot. An unreachable artifact is
    /// downgraded to a warning; only the local store's failure
    /// surfaces as an error.
    pub async fn latest(&self) -> Result<Option<ResultSnapshot>> {
        if let Some(artifact) = &self.artifact {
            match artifact.fetch().await {
                Ok(snapshot) => return Ok(Some(snapshot)),
                Err(e) => {
                    warn!(error = %e, "Published artifact unavailable, falling back to local store");
                }
            }
        }

        self.store.latest().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, PickCandidate, SettlementState};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn temp_path(prefix: &str) -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("edgeline_test_{prefix}_{}.json", uuid::Uuid::new_v4()));
        p.to_string_lossy().to_string()
    }

    fn make_snapshot() -> ResultSnapshot {
        ResultSnapshot {
            top_picks: vec![PickCandidate {
                label: "Boston Celtics -180".to_string(),
                game_label: "Miami Heat at Boston Celtics".to_string(),
                sport_name: "NBA".to_string(),
                american_odds: -180,
                confidence: Confidence::Medium,
                units: 2,
                expected_value: 0.0389,
                kickoff_time: Utc::now(),
                narrative: "Boston Celtics at home with modest edge.".to_string(),
            }],
            generated_at: Utc::now(),
            sports_polled: vec!["NBA".to_string()],
            poll_errors: Vec::new(),
            candidates_considered: 3,
            month: 0,
        }
    }

    fn make_bet(id: i64) -> LoggedBet {
        LoggedBet {
            id,
            date: chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            sport: "NBA".to_string(),
            game: "Miami Heat at Boston Celtics".to_string(),
            pick: "Boston Celtics -180".to_string(),
            odds: -180,
            stake: dec!(50),
            state: SettlementState::Pending,
            profit: dec!(0),
        }
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let path = temp_path("snap");
        save_snapshot(&make_snapshot(), Some(&path)).unwrap();

        let loaded = load_snapshot(Some(&path)).unwrap();
        assert!(loaded.is_some());
        let loaded = loaded.unwrap();
        assert_eq!(loaded.top_picks.len(), 1);
        assert_eq!(loaded.top_picks[0].american_odds, -180);

        delete_snapshot(Some(&path)).unwrap();
    }

    #[test]
    fn test_snapshot_load_nonexistent() {
        let loaded = load_snapshot(Some("/tmp/edgeline_nonexistent_snap.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_snapshot_store_replaces_prior_value() {
        let path = temp_path("snap_replace");
        save_snapshot(&make_snapshot(), Some(&path)).unwrap();

        let mut newer = make_snapshot();
        newer.top_picks.clear();
        newer.candidates_considered = 0;
        save_snapshot(&newer, Some(&path)).unwrap();

        let loaded = load_snapshot(Some(&path)).unwrap().unwrap();
        assert!(loaded.top_picks.is_empty());

        delete_snapshot(Some(&path)).unwrap();
    }

    #[test]
    fn test_delete_snapshot_nonexistent_ok() {
        assert!(delete_snapshot(Some("/tmp/edgeline_never_existed.json")).is_ok());
    }

    #[test]
    fn test_bets_save_and_load() {
        let path = temp_path("bets");
        let bets = vec![make_bet(1), make_bet(2)];
        save_bets(&bets, Some(&path)).unwrap();

        let loaded = load_bets(Some(&path)).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].stake, dec!(50));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bets_load_nonexistent_is_fresh_ledger() {
        let loaded = load_bets(Some("/tmp/edgeline_nonexistent_bets.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_bets_full_rewrite() {
        let path = temp_path("bets_rewrite");
        save_bets(&[make_bet(1), make_bet(2)], Some(&path)).unwrap();
        save_bets(&[make_bet(3)], Some(&path)).unwrap();

        let loaded = load_bets(Some(&path)).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 3);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_store_latest() {
        let path = temp_path("source");
        save_snapshot(&make_snapshot(), Some(&path)).unwrap();

        let store = FileSnapshotStore::new(Some(path.clone()));
        let loaded = tokio_test::block_on(store.latest()).unwrap();
        assert!(loaded.is_some());

        delete_snapshot(Some(&path)).unwrap();
    }

    #[test]
    fn test_reader_falls_back_without_artifact() {
        let path = temp_path("reader");
        save_snapshot(&make_snapshot(), Some(&path)).unwrap();

        let reader = SnapshotReader::new(None, FileSnapshotStore::new(Some(path.clone())));
        let loaded = tokio_test::block_on(reader.latest()).unwrap();
        assert!(loaded.is_some());

        delete_snapshot(Some(&path)).unwrap();
    }
}

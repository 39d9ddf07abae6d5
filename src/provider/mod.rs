//! Statistics provider with a degraded mode.
//!
//! Loads the history from a [`DrawSource`] and computes the snapshot. When
//! the load fails, waits the configured delay and switches to the configured
//! [`FallbackMode`] instead of retrying.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculate::compute_stats;
use crate::config::FallbackConfig;
use crate::models::{DatasetId, StatsSnapshot, MAX_NUMBER, MIN_NUMBER, RANKED_LIST_LEN};
use crate::source::{DrawSource, LoadedHistory};

/// Hot list used by the offline statistics, a rough approximation of the
/// historically most drawn Mega-Sena numbers.
pub const OFFLINE_HOT: [u8; 10] = [5, 10, 53, 23, 4, 54, 33, 24, 51, 42];

/// What to do when the history cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    /// No statistics; every game is uniform
    #[default]
    Random,
    /// Fixed offline statistics (see [`offline_snapshot`])
    OfflineStats,
}

/// Whether the statistics came from real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Live,
    Degraded,
}

/// Statistics ready to serve, with provenance.
#[derive(Debug, Clone)]
pub struct LoadedStats {
    pub mode: DataMode,
    pub snapshot: Option<Arc<StatsSnapshot>>,
    pub dataset_id: Option<DatasetId>,
    pub origin: String,
    pub loaded_at: DateTime<Utc>,
    /// User-facing explanation when degraded
    pub notice: Option<String>,
}

impl LoadedStats {
    /// Compute statistics over a freshly loaded history.
    pub fn from_history(history: LoadedHistory) -> Self {
        let snapshot = compute_stats(&history.draws);
        info!(
            "Computed stats over {} contests (latest {})",
            snapshot.total_contests, snapshot.current_contest
        );
        Self {
            mode: DataMode::Live,
            snapshot: Some(Arc::new(snapshot)),
            dataset_id: Some(history.dataset_id),
            origin: history.origin,
            loaded_at: history.loaded_at,
            notice: None,
        }
    }

    /// Degraded statistics after a failed load.
    pub fn degraded(mode: FallbackMode, reason: &str) -> Self {
        let (snapshot, dataset_id, detail) = match mode {
            FallbackMode::Random => (None, None, "plain random generation"),
            FallbackMode::OfflineStats => (
                Some(Arc::new(offline_snapshot())),
                Some(DatasetId::offline()),
                "offline statistics",
            ),
        };
        Self {
            mode: DataMode::Degraded,
            snapshot,
            dataset_id,
            origin: "offline".to_string(),
            loaded_at: Utc::now(),
            notice: Some(format!(
                "Could not load draw history ({}). Using {}.",
                reason, detail
            )),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.mode == DataMode::Degraded
    }
}

/// Fixed statistics for offline use: the empty-history snapshot with
/// [`OFFLINE_HOT`] as the hot list. The cold list keeps the empty-history
/// order (highest numbers first) but skips the hot numbers, so no number
/// is both hot and cold.
pub fn offline_snapshot() -> StatsSnapshot {
    let mut snapshot = compute_stats(&[]);
    snapshot.hot = OFFLINE_HOT.to_vec();
    snapshot.cold = (MIN_NUMBER..=MAX_NUMBER)
        .rev()
        .filter(|n| !OFFLINE_HOT.contains(n))
        .take(RANKED_LIST_LEN)
        .collect();
    snapshot
}

/// Load statistics, falling back to degraded mode on any failure.
pub async fn load_stats(source: &dyn DrawSource, fallback: &FallbackConfig) -> LoadedStats {
    match source.load().await {
        Ok(history) => LoadedStats::from_history(history),
        Err(e) => {
            warn!("Failed to load draw history from {}: {}", source.describe(), e);
            if fallback.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(fallback.delay_ms)).await;
            }
            warn!("Entering degraded mode ({:?})", fallback.mode);
            LoadedStats::degraded(fallback.mode, &e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    fn no_delay(mode: FallbackMode) -> FallbackConfig {
        FallbackConfig { mode, delay_ms: 0 }
    }

    #[test]
    fn test_offline_snapshot_contents() {
        let snapshot = offline_snapshot();

        assert_eq!(snapshot.hot, OFFLINE_HOT.to_vec());
        assert_eq!(snapshot.overdue, (1..=10).collect::<Vec<_>>());
        assert_eq!(snapshot.cold, vec![60, 59, 58, 57, 56, 55, 52, 50, 49, 48]);
        assert_eq!(snapshot.total_contests, 0);
        assert_eq!(snapshot.frequency.len(), 60);
    }

    #[test]
    fn test_offline_snapshot_hot_and_cold_are_disjoint() {
        let snapshot = offline_snapshot();
        for n in &snapshot.hot {
            assert!(!snapshot.cold.contains(n), "{} is hot and cold", n);
            assert_eq!(snapshot.categories(*n).first(), Some(&crate::models::Category::Hot));
        }
    }

    #[test]
    fn test_fallback_mode_serde() {
        let mode: FallbackMode = serde_json::from_str("\"offline-stats\"").unwrap();
        assert_eq!(mode, FallbackMode::OfflineStats);
        assert_eq!(serde_json::to_string(&FallbackMode::Random).unwrap(), "\"random\"");
    }

    #[tokio::test]
    async fn test_load_stats_live() {
        let source = StaticSource::new(r#"[{"Concurso": 1, "Dezenas": ["01","02","03","04","05","06"]}]"#);
        let loaded = load_stats(&source, &no_delay(FallbackMode::Random)).await;

        assert_eq!(loaded.mode, DataMode::Live);
        assert!(loaded.notice.is_none());
        let snapshot = loaded.snapshot.unwrap();
        assert_eq!(snapshot.total_contests, 1);
        assert_eq!(snapshot.hot, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_load_stats_degraded_random() {
        let source = StaticSource::failing("offline");
        let loaded = load_stats(&source, &no_delay(FallbackMode::Random)).await;

        assert!(loaded.is_degraded());
        assert!(loaded.snapshot.is_none());
        assert!(loaded.dataset_id.is_none());
        assert!(loaded.notice.unwrap().contains("plain random"));
    }

    #[tokio::test]
    async fn test_load_stats_degraded_offline_stats() {
        let source = StaticSource::failing("offline");
        let loaded = load_stats(&source, &no_delay(FallbackMode::OfflineStats)).await;

        assert!(loaded.is_degraded());
        assert_eq!(loaded.dataset_id, Some(DatasetId::offline()));
        assert_eq!(loaded.snapshot.unwrap().hot, OFFLINE_HOT.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_stats_waits_before_degrading() {
        let source = StaticSource::failing("offline");
        let fallback = FallbackConfig {
            mode: FallbackMode::Random,
            delay_ms: 2000,
        };

        let start = tokio::time::Instant::now();
        let loaded = load_stats(&source, &fallback).await;

        assert!(loaded.is_degraded());
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }
}

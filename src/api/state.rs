use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::config::{FallbackConfig, GeneratorConfig};
use crate::provider::{load_stats, DataMode, LoadedStats};
use crate::source::DrawSource;

/// Whether statistics are available yet.
#[derive(Debug, Clone, Default)]
pub enum Readiness {
    #[default]
    Loading,
    Loaded(LoadedStats),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessStatus {
    Loading,
    Live,
    Degraded,
}

impl Readiness {
    pub fn status(&self) -> ReadinessStatus {
        match self {
            Readiness::Loading => ReadinessStatus::Loading,
            Readiness::Loaded(loaded) => match loaded.mode {
                DataMode::Live => ReadinessStatus::Live,
                DataMode::Degraded => ReadinessStatus::Degraded,
            },
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<RwLock<Readiness>>,
    pub generator: Arc<GeneratorConfig>,
}

impl AppState {
    pub fn new(generator: GeneratorConfig) -> Self {
        Self {
            readiness: Arc::new(RwLock::new(Readiness::Loading)),
            generator: Arc::new(generator),
        }
    }

    /// State that is already loaded, mostly for tests.
    pub fn with_loaded(generator: GeneratorConfig, loaded: LoadedStats) -> Self {
        Self {
            readiness: Arc::new(RwLock::new(Readiness::Loaded(loaded))),
            generator: Arc::new(generator),
        }
    }
}

/// Load statistics in the background; generation stays unavailable until
/// this finishes. If the load task dies, the state still leaves `Loading`
/// and enters degraded mode.
pub fn spawn_loader(
    state: AppState,
    source: Arc<dyn DrawSource>,
    fallback: FallbackConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mode = fallback.mode;
        let task = tokio::spawn(async move { load_stats(source.as_ref(), &fallback).await });

        let loaded = match task.await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!("Statistics loader failed: {}", e);
                LoadedStats::degraded(mode, "loader task failed")
            }
        };
        *state.readiness.write().await = Readiness::Loaded(loaded);
        tracing::info!("Statistics ready");
    })
}

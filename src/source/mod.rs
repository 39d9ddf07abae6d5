//! Draw history sources.
//!
//! A source produces the raw JSON payload; decoding into [`DrawRecord`]s is
//! shared. All sources implement the `DrawSource` trait.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use url::Url;

use crate::config::SourceConfig;
use crate::fetch::{FetchError, Fetcher, FetcherConfig};
use crate::models::{decode_draws, DatasetId, DrawRecord};

/// A decoded draw history.
#[derive(Debug, Clone)]
pub struct LoadedHistory {
    pub draws: Vec<DrawRecord>,
    pub dataset_id: DatasetId,
    /// Human-readable origin (URL or path)
    pub origin: String,
    pub loaded_at: DateTime<Utc>,
}

/// Something that can produce a draw-history payload.
#[async_trait]
pub trait DrawSource: Send + Sync {
    /// Where the payload comes from, for logs and notices.
    fn describe(&self) -> String;

    /// Read the raw payload.
    async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError>;

    /// Read and decode the history.
    async fn load(&self) -> Result<LoadedHistory, FetchError> {
        let payload = self.fetch_payload().await?;
        let draws = decode_draws(&payload)?;
        let origin = self.describe();

        if draws.is_empty() {
            warn!("No draws found in {}", origin);
        } else {
            info!("Loaded {} draws from {}", draws.len(), origin);
        }

        Ok(LoadedHistory {
            dataset_id: DatasetId::from_payload(&payload),
            draws,
            origin,
            loaded_at: Utc::now(),
        })
    }
}

/// Remote JSON history over HTTP.
pub struct HttpSource {
    fetcher: Fetcher,
    url: Url,
}

impl HttpSource {
    pub fn new(fetcher: Fetcher, url: Url) -> Self {
        Self { fetcher, url }
    }
}

#[async_trait]
impl DrawSource for HttpSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError> {
        self.fetcher.fetch(&self.url).await
    }
}

/// JSON history on the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DrawSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// In-memory payload for testing, or a source that always fails.
pub struct StaticSource {
    payload: Result<Vec<u8>, String>,
}

impl StaticSource {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: Ok(payload.into()),
        }
    }

    /// A source whose every load fails with a 503.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            payload: Err(message.into()),
        }
    }
}

#[async_trait]
impl DrawSource for StaticSource {
    fn describe(&self) -> String {
        "static payload".to_string()
    }

    async fn fetch_payload(&self) -> Result<Vec<u8>, FetchError> {
        match &self.payload {
            Ok(bytes) => Ok(bytes.clone()),
            Err(message) => Err(FetchError::HttpStatus {
                status: 503,
                message: message.clone(),
            }),
        }
    }
}

/// Build the source described by the configuration.
/// A configured file wins over the URL.
pub fn source_from_config(config: &SourceConfig) -> Result<Arc<dyn DrawSource>, FetchError> {
    if let Some(path) = &config.file {
        return Ok(Arc::new(FileSource::new(path.clone())));
    }

    let url = Url::parse(&config.url)
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.url, e)))?;
    let fetcher = Fetcher::new(FetcherConfig::from(config))?;
    Ok(Arc::new(HttpSource::new(fetcher, url)))
}

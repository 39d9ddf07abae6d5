//! HTTP fetching.
//!
//! Downloads the raw draw history in a single attempt. Nothing is cached or
//! retried; callers decide what to do when a fetch fails.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::SourceConfig;

/// Errors that can occur while loading the draw history.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },

    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum content size to fetch (default 20MB)
    pub max_content_size: usize,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl From<&SourceConfig> for FetcherConfig {
    fn from(source: &SourceConfig) -> Self {
        Self {
            max_content_size: source.max_content_size,
            timeout: Duration::from_secs(source.timeout_seconds),
            user_agent: source.user_agent.clone(),
        }
    }
}

/// Single-attempt HTTP fetcher.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("megasena-stats/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch a URL once and return the response body.
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        if let Some(declared) = response.content_length() {
            let declared = declared as usize;
            if declared > self.config.max_content_size {
                return Err(FetchError::ContentTooLarge {
                    size: declared,
                    max_size: self.config.max_content_size,
                });
            }
        }

        let body = response.bytes().await?;

        if body.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: body.len(),
                max_size: self.config.max_content_size,
            });
        }

        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    fn test_config() -> FetcherConfig {
        FetcherConfig {
            max_content_size: 1024,
            timeout: Duration::from_secs(10),
            user_agent: "test-agent".to_string(),
        }
    }

    /// Serve a small router on an ephemeral port and return the URL of `path`.
    async fn serve(app: Router, path: &str) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}{}", addr, path)).unwrap()
    }

    #[test]
    fn test_fetcher_config_default() {
        let config = FetcherConfig::from(&SourceConfig::default());

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_content_size, 20 * 1024 * 1024);
        assert!(config.user_agent.starts_with("megasena-stats/"));
    }

    #[test]
    fn test_fetcher_config_from_source() {
        let source = SourceConfig {
            timeout_seconds: 5,
            max_content_size: 99,
            ..Default::default()
        };
        let config = FetcherConfig::from(&source);

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_content_size, 99);
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let app = Router::new().route(
            "/megasena.json",
            get(|| async { r#"[{"Concurso": 1, "Dezenas": ["01"]}]"# }),
        );
        let url = serve(app, "/megasena.json").await;
        let fetcher = Fetcher::new(test_config()).unwrap();

        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, br#"[{"Concurso": 1, "Dezenas": ["01"]}]"#.to_vec());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let app = Router::new().route("/gone", get(|| async { StatusCode::NOT_FOUND }));
        let url = serve(app, "/gone").await;
        let fetcher = Fetcher::new(test_config()).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_rate_limited() {
        let app = Router::new().route(
            "/busy",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "12")], "") }),
        );
        let url = serve(app, "/busy").await;
        let fetcher = Fetcher::new(test_config()).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::RateLimited {
                retry_after_secs: 12,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let app = Router::new().route("/big", get(|| async { "x".repeat(4096) }));
        let url = serve(app, "/big").await;
        let fetcher = Fetcher::new(test_config()).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::ContentTooLarge { max_size: 1024, .. }));
    }
}

//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::generate::GenerationMode;
use crate::provider::FallbackMode;

/// Public Mega-Sena history maintained by guilhermeasn/loteria.json.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/guilhermeasn/loteria.json/master/data/megasena.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Where the draw history comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Remote JSON history
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Local JSON history; takes precedence over `url` when set
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Largest payload accepted, in bytes
    #[serde(default = "default_max_content_size")]
    pub max_content_size: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_content_size() -> usize {
    20 * 1024 * 1024 // 20MB
}

fn default_user_agent() -> String {
    format!("megasena-stats/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            file: None,
            timeout_seconds: default_timeout(),
            max_content_size: default_max_content_size(),
            user_agent: default_user_agent(),
        }
    }
}

/// Behaviour when the history cannot be loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default)]
    pub mode: FallbackMode,

    /// Pause before degraded mode is entered after a failed load
    #[serde(default = "default_fallback_delay")]
    pub delay_ms: u64,
}

fn default_fallback_delay() -> u64 {
    2000
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            mode: FallbackMode::default(),
            delay_ms: default_fallback_delay(),
        }
    }
}

/// Generation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub default_mode: GenerationMode,

    /// Pause between revealed balls in the terminal
    #[serde(default = "default_reveal_interval")]
    pub reveal_interval_ms: u64,

    /// Most games a single request may ask for
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
}

fn default_reveal_interval() -> u64 {
    200
}

fn default_max_batch() -> usize {
    20
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_mode: GenerationMode::default(),
            reveal_interval_ms: default_reveal_interval(),
            max_batch: default_max_batch(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub fallback: FallbackConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            source: SourceConfig::default(),
            fallback: FallbackConfig::default(),
            generator: GeneratorConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.file.is_none() {
            Url::parse(&self.source.url).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid source url {}: {}", self.source.url, e))
            })?;
        }

        if self.source.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Source timeout must be greater than 0".to_string(),
            ));
        }

        if self.source.max_content_size == 0 {
            return Err(ConfigError::ValidationError(
                "Max content size must be greater than 0".to_string(),
            ));
        }

        if self.generator.max_batch == 0 {
            return Err(ConfigError::ValidationError(
                "Generator max_batch must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

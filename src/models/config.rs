//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{PageSelectors, SubjectKind};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream site locations
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Retry policy for fetch-and-parse operations
    #[serde(default)]
    pub retry: RetryConfig,

    /// Snapshot cache lifecycle
    #[serde(default)]
    pub cache: CacheConfig,

    /// Page selectors
    #[serde(default)]
    pub selectors: PageSelectors,

    /// HTTP route layer
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.base_url)?;
        url::Url::parse(&self.source.groups_list_url)?;
        url::Url::parse(&self.source.teachers_list_url)?;

        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::validation("retry.max_attempts must be > 0"));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(AppError::validation(
                "retry.base_delay_ms must not exceed retry.max_delay_ms",
            ));
        }
        if self.cache.refresh_interval_mins == 0 {
            return Err(AppError::validation(
                "cache.refresh_interval_mins must be > 0",
            ));
        }
        if self.cache.refresh_interval_mins > MAX_REFRESH_INTERVAL_MINS {
            return Err(AppError::validation(format!(
                "cache.refresh_interval_mins must not exceed {MAX_REFRESH_INTERVAL_MINS} (one week)"
            )));
        }
        if self.cache.init_attempts == 0 {
            return Err(AppError::validation("cache.init_attempts must be > 0"));
        }
        for (name, selector) in self.selectors.all() {
            Selector::parse(selector)
                .map_err(|e| AppError::selector(format!("{name}: {selector}"), format!("{e:?}")))?;
        }
        Ok(())
    }
}

/// Upstream site locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Schedule pages are `base_url?v_gru=<id>` / `base_url?v_prep=<id>`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    #[serde(default = "defaults::groups_list_url")]
    pub groups_list_url: String,

    #[serde(default = "defaults::teachers_list_url")]
    pub teachers_list_url: String,
}

impl SourceConfig {
    pub fn list_url(&self, kind: SubjectKind) -> &str {
        match kind {
            SubjectKind::Group => &self.groups_list_url,
            SubjectKind::Teacher => &self.teachers_list_url,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            groups_list_url: defaults::groups_list_url(),
            teachers_list_url: defaults::teachers_list_url(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept-Language header for HTTP requests
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Timeout per fetch attempt in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// The upstream site serves an incomplete certificate chain
    #[serde(default = "defaults::accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            accept_invalid_certs: defaults::accept_invalid_certs(),
        }
    }
}

/// Bounded retry with linearly growing, capped delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "defaults::base_delay")]
    pub base_delay_ms: u64,

    #[serde(default = "defaults::max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::max_attempts(),
            base_delay_ms: defaults::base_delay(),
            max_delay_ms: defaults::max_delay(),
        }
    }
}

/// Longest accepted refresh interval: one week.
pub const MAX_REFRESH_INTERVAL_MINS: u64 = 7 * 24 * 60;

/// Snapshot cache lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Snapshot file, relative to the storage directory
    #[serde(default = "defaults::cache_path")]
    pub path: PathBuf,

    /// Timer period and staleness threshold
    #[serde(default = "defaults::refresh_interval")]
    pub refresh_interval_mins: u64,

    /// Refresh attempts during initialization before running degraded
    #[serde(default = "defaults::init_attempts")]
    pub init_attempts: u32,

    #[serde(default = "defaults::init_retry_delay")]
    pub init_retry_delay_ms: u64,

    /// Where to dump list pages that yielded no entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Timer period, capped at [`MAX_REFRESH_INTERVAL_MINS`].
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.interval_mins().saturating_mul(60))
    }

    /// Age past which a snapshot is stale, capped like [`Self::refresh_interval`].
    pub fn stale_after(&self) -> chrono::Duration {
        i64::try_from(self.interval_mins())
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .unwrap_or(chrono::Duration::MAX)
    }

    fn interval_mins(&self) -> u64 {
        self.refresh_interval_mins.min(MAX_REFRESH_INTERVAL_MINS)
    }

    pub fn init_retry_delay(&self) -> Duration {
        Duration::from_millis(self.init_retry_delay_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: defaults::cache_path(),
            refresh_interval_mins: defaults::refresh_interval(),
            init_attempts: defaults::init_attempts(),
            init_retry_delay_ms: defaults::init_retry_delay(),
            debug_dir: None,
        }
    }
}

/// HTTP route layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Browser origin allowed by CORS
    #[serde(default = "defaults::cors_origin")]
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            cors_origin: defaults::cors_origin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Source defaults
    pub fn base_url() -> String {
        "https://old.rsvpu.ru/mobile/".into()
    }
    pub fn groups_list_url() -> String {
        "https://old.rsvpu.ru/mobile/?groups".into()
    }
    pub fn teachers_list_url() -> String {
        "https://old.rsvpu.ru/mobile/?prep".into()
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
    }
    pub fn accept_language() -> String {
        "ru-RU,ru;q=0.9".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn accept_invalid_certs() -> bool {
        true
    }

    // Retry defaults
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn base_delay() -> u64 {
        2000
    }
    pub fn max_delay() -> u64 {
        10_000
    }

    // Cache defaults
    pub fn cache_path() -> PathBuf {
        PathBuf::from("cache.json")
    }
    pub fn refresh_interval() -> u64 {
        30
    }
    pub fn init_attempts() -> u32 {
        3
    }
    pub fn init_retry_delay() -> u64 {
        5000
    }

    // Server defaults
    pub fn host() -> String {
        "127.0.0.1".into()
    }
    pub fn port() -> u16 {
        3001
    }
    pub fn cors_origin() -> String {
        "http://localhost:5173".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

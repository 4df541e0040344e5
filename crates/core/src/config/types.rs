use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::matching::ScoreWeights;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Tracker API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API endpoint (default: "https://redacted.sh/ajax.php")
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Tracker API key
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Minimum spacing between requests in milliseconds (default: 2000)
    #[serde(default = "default_min_request_interval")]
    pub min_request_interval_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}

fn default_api_url() -> String {
    "https://redacted.sh/ajax.php".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_min_request_interval() -> u64 {
    2000
}

/// Matching configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MatchingConfig {
    /// Minimum total score for a candidate to count as a match (default: 0.75)
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Albums reconciled in parallel by batch runs (default: 1)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            weights: ScoreWeights::default(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_min_score() -> f64 {
    0.75
}

fn default_concurrency() -> usize {
    1
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    /// Entry lifetime in seconds (default: 7 days)
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            path: default_cache_path(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("redmatch-cache.db")
}

fn default_cache_ttl() -> u64 {
    7 * 24 * 60 * 60
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: SanitizedApiConfig,
    pub matching: MatchingConfig,
    pub cache: CacheConfig,
}

/// Sanitized API config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApiConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub min_request_interval_ms: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: SanitizedApiConfig {
                url: config.api.url.clone(),
                api_key_configured: !config.api.api_key.is_empty(),
                timeout_secs: config.api.timeout_secs,
                min_request_interval_ms: config.api.min_request_interval_ms,
            },
            matching: config.matching.clone(),
            cache: config.cache.clone(),
        }
    }
}

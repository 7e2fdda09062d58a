//! Configuration management for the fortune cache
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Browser User-Agent the blood-type site expects
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

/// Index page listing one link per blood type
pub const DEFAULT_BLOOD_INDEX_URL: &str = "https://uranai.d-square.co.jp/bloodtype_today.html";

/// Horoscope API base; the date is appended as `/YYYY/MM/DD`
pub const DEFAULT_ZODIAC_API_BASE: &str = "http://api.jugemkey.jp/api/horoscope/free";

/// Upper bound on `fetcher.max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP fetcher configuration
    pub fetcher: FetcherConfig,

    /// Feed origins
    pub sources: SourcesConfig,

    /// Refresh driver configuration
    pub refresh: RefreshConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User agent string sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rate limit (requests per second)
    pub requests_per_second: u32,

    /// Retries on 429/5xx responses
    pub max_retries: u32,
}

/// Feed origins
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Blood-type index page
    pub blood_index_url: String,

    /// Horoscope API base URL
    pub zodiac_api_base: String,
}

/// Refresh driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between `update()` ticks
    pub interval_secs: u64,

    /// Fixed UTC offset used to decide what "today" is; local time when unset
    pub utc_offset_hours: Option<i32>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl FetcherConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            requests_per_second: 5,
            max_retries: 2,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            blood_index_url: DEFAULT_BLOOD_INDEX_URL.to_string(),
            zodiac_api_base: DEFAULT_ZODIAC_API_BASE.to_string(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            utc_offset_hours: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            fetcher: FetcherConfig {
                user_agent: std::env::var("FORTUNE_USER_AGENT")
                    .unwrap_or(defaults.fetcher.user_agent),
                request_timeout_secs: env_parse("FORTUNE_REQUEST_TIMEOUT")
                    .unwrap_or(defaults.fetcher.request_timeout_secs),
                requests_per_second: env_parse("FORTUNE_RATE_LIMIT")
                    .unwrap_or(defaults.fetcher.requests_per_second),
                max_retries: env_parse("FORTUNE_MAX_RETRIES")
                    .unwrap_or(defaults.fetcher.max_retries),
            },
            sources: SourcesConfig {
                blood_index_url: std::env::var("FORTUNE_BLOOD_INDEX_URL")
                    .unwrap_or(defaults.sources.blood_index_url),
                zodiac_api_base: std::env::var("FORTUNE_ZODIAC_API_BASE")
                    .unwrap_or(defaults.sources.zodiac_api_base),
            },
            refresh: RefreshConfig {
                interval_secs: env_parse("FORTUNE_REFRESH_INTERVAL")
                    .unwrap_or(defaults.refresh.interval_secs),
                utc_offset_hours: env_parse("FORTUNE_UTC_OFFSET"),
            },
            logging: LoggingConfig {
                level: std::env::var("FORTUNE_LOG_LEVEL").unwrap_or(defaults.logging.level),
                format: std::env::var("FORTUNE_LOG_FORMAT").unwrap_or(defaults.logging.format),
            },
        };

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than 0");
        }

        if self.fetcher.max_retries > MAX_RETRIES_LIMIT {
            anyhow::bail!(
                "max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                self.fetcher.max_retries
            );
        }

        if self.fetcher.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.refresh.interval_secs == 0 {
            anyhow::bail!("refresh interval_secs must be greater than 0");
        }

        if let Some(hours) = self.refresh.utc_offset_hours {
            if !(-23..=23).contains(&hours) {
                anyhow::bail!("utc_offset_hours must be within -23..=23, got {hours}");
            }
        }

        for (name, url) in [
            ("blood_index_url", &self.sources.blood_index_url),
            ("zodiac_api_base", &self.sources.zodiac_api_base),
        ] {
            url::Url::parse(url).with_context(|| format!("{name} is not a valid URL: {url}"))?;
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Get refresh tick interval as Duration
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }

    /// Fixed offset for "today", if configured
    #[must_use]
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.refresh
            .utc_offset_hours
            .and_then(|hours| FixedOffset::east_opt(hours * 3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rate_limit_is_invalid() {
        let mut config = Config::default();
        config.fetcher.requests_per_second = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let mut config = Config::default();
        config.refresh.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_source_url_is_invalid() {
        let mut config = Config::default();
        config.sources.blood_index_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_log_format_is_invalid() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_retries_is_bounded() {
        let mut config = Config::default();
        config.fetcher.max_retries = MAX_RETRIES_LIMIT;
        assert!(config.validate().is_ok());

        config.fetcher.max_retries = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.fetcher.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_utc_offset() {
        let mut config = Config::default();
        assert!(config.utc_offset().is_none());

        config.refresh.utc_offset_hours = Some(9);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[refresh]\ninterval_secs = 60\n").unwrap();
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.fetcher.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.sources.blood_index_url, DEFAULT_BLOOD_INDEX_URL);
    }
}

//! Upstream client configuration.

use std::time::Duration;

use ytthumb_models::UPSTREAM_IMAGE_BASE;

use crate::error::{UpstreamError, UpstreamResult};

/// User-Agent sent with every upstream request.
pub const DEFAULT_USER_AGENT: &str = "YouTube-Thumbnail-Downloader/1.0";

/// Upstream image host configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Scheme and host of the image server, without trailing slash
    pub base_url: String,
    /// Timeout for a single HEAD probe
    pub probe_timeout: Duration,
    /// Timeout for a full GET including the body transfer
    pub fetch_timeout: Duration,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Idle keep-alive connections kept per host
    pub pool_max_idle_per_host: usize,
    /// How long an idle pooled connection is kept
    pub pool_idle_timeout: Duration,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: UPSTREAM_IMAGE_BASE.to_string(),
            probe_timeout: Duration::from_millis(1000),
            fetch_timeout: Duration::from_millis(5000),
            connect_timeout: Duration::from_millis(2000),
            pool_max_idle_per_host: 16,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Create config from environment variables.
    pub fn from_env() -> UpstreamResult<Self> {
        let defaults = Self::default();

        let config = Self {
            base_url: std::env::var("UPSTREAM_BASE_URL").unwrap_or(defaults.base_url),
            probe_timeout: env_millis("PROBE_TIMEOUT_MS").unwrap_or(defaults.probe_timeout),
            fetch_timeout: env_millis("FETCH_TIMEOUT_MS").unwrap_or(defaults.fetch_timeout),
            connect_timeout: env_millis("UPSTREAM_CONNECT_TIMEOUT_MS")
                .unwrap_or(defaults.connect_timeout),
            pool_max_idle_per_host: std::env::var("UPSTREAM_POOL_MAX_IDLE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.pool_max_idle_per_host),
            pool_idle_timeout: defaults.pool_idle_timeout,
            user_agent: defaults.user_agent,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create a config pointing at another host, keeping default timeouts.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> UpstreamResult<()> {
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            UpstreamError::config_error(format!("Invalid UPSTREAM_BASE_URL {:?}: {}", self.base_url, e))
        })?;

        if self.probe_timeout.is_zero() || self.fetch_timeout.is_zero() {
            return Err(UpstreamError::config_error("Upstream timeouts must be non-zero"));
        }

        Ok(())
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
}

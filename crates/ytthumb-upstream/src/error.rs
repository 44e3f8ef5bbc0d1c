//! Upstream error types.

use thiserror::Error;

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Errors that can occur when talking to the image host.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Invalid upstream configuration: {0}")]
    Config(String),

    #[error("Upstream request timed out: {0}")]
    Timeout(String),

    #[error("Failed to fetch thumbnail ({status}): {url}")]
    BadStatus { url: String, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl UpstreamError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classify a transport error, naming the URL for timeouts.
    pub fn from_request(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            Self::Timeout(url.to_string())
        } else {
            Self::Network(err)
        }
    }

    /// True if the upstream answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::BadStatus { status: 404, .. })
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Config(_) => "config",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::BadStatus { .. } => "bad_status",
            UpstreamError::Network(_) => "network",
        }
    }
}

//! Thumbnail image host client.
//!
//! One client is built at startup and shared by every request:
//! - Keep-alive connection pool bounded per host
//! - Independent timeout per call, no retries
//! - Observability (tracing spans, metrics)

use std::time::Instant;

use futures_util::future::join_all;
use reqwest::Client;
use tracing::{debug, info_span, warn, Instrument};
use ytthumb_models::{AvailabilityMap, ResolutionTier, VideoIdentifier};

use crate::config::UpstreamConfig;
use crate::error::{UpstreamError, UpstreamResult};
use crate::metrics::{record_fetch, record_probe};
use crate::stream::ThumbnailStream;

/// Client for `{base_url}/vi/<id>/<tier>.jpg`.
#[derive(Clone)]
pub struct ThumbnailClient {
    http: Client,
    config: UpstreamConfig,
}

impl ThumbnailClient {
    /// Create a new client with its own connection pool.
    pub fn new(config: UpstreamConfig) -> UpstreamResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(UpstreamError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> UpstreamResult<Self> {
        Self::new(UpstreamConfig::from_env()?)
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Image URL for one tier.
    pub fn thumbnail_url(&self, video_id: &VideoIdentifier, tier: ResolutionTier) -> String {
        format!(
            "{}/vi/{}/{}.jpg",
            self.config.base_url.trim_end_matches('/'),
            video_id,
            tier
        )
    }

    /// Check whether one tier exists with a HEAD request.
    ///
    /// Errors and timeouts count as unavailable and are never returned.
    pub async fn probe(&self, video_id: &VideoIdentifier, tier: ResolutionTier) -> bool {
        let url = self.thumbnail_url(video_id, tier);
        let start = Instant::now();

        let result = self
            .http
            .head(&url)
            .timeout(self.config.probe_timeout)
            .send()
            .await;

        let latency = start.elapsed().as_secs_f64();

        match result {
            Ok(response) => {
                let available = response.status().is_success();
                debug!(tier = %tier, status = %response.status(), "Probe completed");
                record_probe(
                    tier.as_str(),
                    if available { "available" } else { "unavailable" },
                    latency,
                );
                available
            }
            Err(e) => {
                let err = UpstreamError::from_request(e, &url);
                debug!(tier = %tier, error = %err, "Probe failed, treating tier as unavailable");
                record_probe(tier.as_str(), err.kind(), latency);
                false
            }
        }
    }

    /// Probe all five tiers concurrently.
    ///
    /// The map always covers every tier regardless of individual outcomes.
    pub async fn probe_all(&self, video_id: &VideoIdentifier) -> AvailabilityMap {
        let probes = ResolutionTier::ALL.map(|tier| async move {
            (tier, self.probe(video_id, tier).await)
        });

        let results = join_all(probes)
            .instrument(info_span!("probe_all", video_id = %video_id))
            .await;

        AvailabilityMap::from_results(results)
    }

    /// Start downloading one tier.
    ///
    /// Single attempt, bounded by the fetch timeout (headers and body). A
    /// non-success status is an error.
    pub async fn fetch(
        &self,
        video_id: &VideoIdentifier,
        tier: ResolutionTier,
    ) -> UpstreamResult<ThumbnailStream> {
        let url = self.thumbnail_url(video_id, tier);
        let start = Instant::now();
        let span = info_span!("fetch_thumbnail", video_id = %video_id, tier = %tier);

        let response = match self
            .http
            .get(&url)
            .timeout(self.config.fetch_timeout)
            .send()
            .instrument(span)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let err = UpstreamError::from_request(e, &url);
                warn!(video_id = %video_id, tier = %tier, error = %err, "Thumbnail fetch failed");
                record_fetch(tier.as_str(), err.kind(), start.elapsed().as_secs_f64());
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(video_id = %video_id, tier = %tier, status = %status, "Upstream rejected thumbnail fetch");
            record_fetch(tier.as_str(), "bad_status", start.elapsed().as_secs_f64());
            return Err(UpstreamError::BadStatus {
                url,
                status: status.as_u16(),
            });
        }

        record_fetch(tier.as_str(), "ok", start.elapsed().as_secs_f64());
        Ok(ThumbnailStream::from_response(tier, response))
    }
}

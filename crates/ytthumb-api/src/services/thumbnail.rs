//! Thumbnail availability and download orchestration.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use tracing::{debug, info};
use ytthumb_models::{
    extract_video_id, AvailabilityHint, AvailabilityMap, RequestedResolution, ResolutionTier,
    VideoIdentifier,
};
use ytthumb_upstream::{ThumbnailClient, ThumbnailStream};

use crate::archive::ArchiveJob;
use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Result of an availability check.
#[derive(Debug, Clone)]
pub struct AvailabilityReport {
    pub video_id: VideoIdentifier,
    pub availability: AvailabilityMap,
    pub best_available: Option<ResolutionTier>,
    pub checked_at: DateTime<Utc>,
}

/// A download ready to be streamed.
pub enum Download {
    Image {
        video_id: VideoIdentifier,
        stream: ThumbnailStream,
    },
    Archive {
        video_id: VideoIdentifier,
        job: ArchiveJob,
    },
}

/// Service composing URL parsing, probing, fetching and archiving.
#[derive(Clone)]
pub struct ThumbnailService {
    client: ThumbnailClient,
    hint_max_age: chrono::Duration,
}

impl ThumbnailService {
    pub fn new(client: ThumbnailClient, hint_max_age: Duration) -> Self {
        Self {
            client,
            hint_max_age: chrono::Duration::from_std(hint_max_age)
                .unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Probe every tier for the video behind `video_url`.
    pub async fn check_availability(&self, video_url: &str) -> ApiResult<AvailabilityReport> {
        let video_id = extract_video_id(video_url).ok_or(ApiError::InvalidUrl)?;

        let availability = self.client.probe_all(&video_id).await;
        let best_available = availability.best_available();

        info!(
            video_id = %video_id,
            best_available = best_available.map(|t| t.as_str()).unwrap_or("none"),
            "Availability checked"
        );
        metrics::record_availability_check(best_available.map(|t| t.as_str()));

        Ok(AvailabilityReport {
            video_id,
            availability,
            best_available,
            checked_at: Utc::now(),
        })
    }

    /// Availability to act on: a matching, fresh hint is trusted verbatim,
    /// anything else triggers a fresh probe.
    pub async fn effective_availability(
        &self,
        video_id: &VideoIdentifier,
        hint: Option<&AvailabilityHint>,
    ) -> AvailabilityMap {
        if let Some(hint) = hint {
            if hint.video_id == video_id.as_str() {
                if hint.is_fresh(self.hint_max_age, Utc::now()) {
                    debug!(video_id = %video_id, "Reusing client availability hint");
                    metrics::record_hint_reused();
                    return hint.available_resolutions;
                }
                debug!(video_id = %video_id, checked_at = ?hint.checked_at, "Availability hint is stale");
            }
        }

        self.client.probe_all(video_id).await
    }

    /// Prepare a single-tier or full-archive download.
    ///
    /// Upstream streams are opened before returning, so a failing fetch is
    /// still reported as an error response rather than a broken body.
    pub async fn download(
        &self,
        video_url: &str,
        resolution: Option<&str>,
        hint: Option<&AvailabilityHint>,
    ) -> ApiResult<Download> {
        let video_id = extract_video_id(video_url).ok_or(ApiError::InvalidUrl)?;

        let available = self
            .effective_availability(&video_id, hint)
            .await
            .available_tiers();

        let Some(&best_available) = available.first() else {
            return Err(ApiError::not_found("No thumbnails available"));
        };

        let requested = resolution
            .ok_or(ApiError::InvalidResolution)?
            .parse::<RequestedResolution>()
            .map_err(|_| ApiError::InvalidResolution)?;

        match requested {
            RequestedResolution::All => {
                let entries = try_join_all(
                    available
                        .iter()
                        .map(|tier| self.client.fetch(&video_id, *tier)),
                )
                .await?;

                info!(video_id = %video_id, entries = entries.len(), "Streaming thumbnail archive");
                metrics::record_download(RequestedResolution::ALL_SENTINEL);

                Ok(Download::Archive {
                    job: ArchiveJob::new(video_id.clone(), entries),
                    video_id,
                })
            }
            RequestedResolution::Single(tier) => {
                if !available.contains(&tier) {
                    return Err(ApiError::TierUnavailable { best_available });
                }

                let stream = self.client.fetch(&video_id, tier).await?;

                info!(video_id = %video_id, tier = %tier, "Streaming thumbnail");
                metrics::record_download(tier.as_str());

                Ok(Download::Image { video_id, stream })
            }
        }
    }
}

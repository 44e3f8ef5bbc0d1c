//! Thumbnail availability and download handlers.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use ytthumb_models::{AvailabilityHint, AvailabilityMap, ResolutionTier};

use crate::archive::archive_file_name;
use crate::error::{ApiError, ApiResult};
use crate::services::Download;
use crate::state::AppState;

/// Request to check which thumbnail tiers exist.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    pub video_url: Option<String>,
}

/// Availability of every tier for one video.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityResponse {
    pub video_id: String,
    pub available_resolutions: AvailabilityMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_available: Option<ResolutionTier>,
    pub checked_at: DateTime<Utc>,
}

/// Request to download one tier or the whole set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub video_url: Option<String>,
    pub resolution: Option<String>,
    /// Availability previously returned by check-availability. Kept raw so
    /// a malformed hint is dropped instead of failing the request.
    #[serde(default)]
    pub availability_data: Option<Value>,
}

impl DownloadRequest {
    fn hint(&mut self) -> Option<AvailabilityHint> {
        let raw = self.availability_data.take()?;
        match serde_json::from_value(raw) {
            Ok(hint) => Some(hint),
            Err(e) => {
                debug!(error = %e, "Ignoring malformed availability hint");
                None
            }
        }
    }
}

fn required_url(video_url: Option<String>) -> ApiResult<String> {
    video_url
        .filter(|url| !url.trim().is_empty())
        .ok_or(ApiError::InvalidUrl)
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name)
}

/// Probe every resolution tier for a video.
pub async fn check_availability(
    State(state): State<AppState>,
    payload: Result<Json<CheckAvailabilityRequest>, JsonRejection>,
) -> ApiResult<Json<CheckAvailabilityResponse>> {
    let Json(request) = payload?;
    let video_url = required_url(request.video_url)?;

    let report = state.thumbnails.check_availability(&video_url).await?;

    Ok(Json(CheckAvailabilityResponse {
        video_id: report.video_id.to_string(),
        available_resolutions: report.availability,
        best_available: report.best_available,
        checked_at: report.checked_at,
    }))
}

/// Stream a single thumbnail or a ZIP of every available one.
pub async fn download(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(mut request) = payload?;
    let hint = request.hint();
    let video_url = required_url(request.video_url)?;

    let download = state
        .thumbnails
        .download(&video_url, request.resolution.as_deref(), hint.as_ref())
        .await?;

    let response = match download {
        Download::Image { video_id, stream } => {
            let file_name = stream.tier().file_name(&video_id);
            let mut builder = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "image/jpeg")
                .header(header::CONTENT_DISPOSITION, attachment(&file_name));

            if let Some(length) = stream.content_length() {
                builder = builder.header(header::CONTENT_LENGTH, length);
            }

            builder.body(Body::from_stream(stream))
        }
        Download::Archive { video_id, job } => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/zip")
            .header(
                header::CONTENT_DISPOSITION,
                attachment(&archive_file_name(&video_id)),
            )
            .body(Body::from_stream(job.spawn())),
    };

    response.map_err(|e| ApiError::internal(e.to_string()))
}

/// Fallback for unmatched `/api` routes.
pub async fn api_not_found() -> impl IntoResponse {
    ApiError::not_found("API endpoint not found")
}

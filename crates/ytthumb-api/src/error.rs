//! API error types.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use ytthumb_models::ResolutionTier;
use ytthumb_upstream::UpstreamError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Invalid resolution")]
    InvalidResolution,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Requested resolution not available")]
    TierUnavailable { best_available: ResolutionTier },

    #[error("Failed to download thumbnail: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidUrl
            | ApiError::InvalidResolution
            | ApiError::BadRequest(_)
            | ApiError::TierUnavailable { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_available: Option<ResolutionTier>,
}

/// Message safe to show in place of an error's details.
///
/// Attached to responses for upstream and internal failures; the
/// `redact_error_details` middleware swaps it in when running in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicErrorMessage(pub &'static str);

impl ApiError {
    fn public_message(&self) -> Option<&'static str> {
        match self {
            ApiError::Upstream(_) => Some("Failed to download thumbnail"),
            ApiError::Internal(_) => Some("An internal error occurred"),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Upstream(e) => error!(error = %e, "Upstream failure"),
            ApiError::Internal(_) => error!(error = %self, "Internal error"),
            _ => {}
        }

        let best_available = match &self {
            ApiError::TierUnavailable { best_available } => Some(*best_available),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            best_available,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(message) = self.public_message() {
            response.extensions_mut().insert(PublicErrorMessage(message));
        }
        response
    }
}

/// Body for a redacted error response.
pub fn redacted_body(message: &'static str) -> impl IntoResponse {
    Json(ErrorResponse {
        error: message.to_string(),
        best_available: None,
    })
}

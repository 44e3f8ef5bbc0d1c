//! Axum HTTP API server.
//!
//! This crate provides:
//! - Availability checks across every thumbnail resolution
//! - Single image and streaming ZIP downloads
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod archive;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::ThumbnailService;
pub use state::AppState;

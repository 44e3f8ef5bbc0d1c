//! Client for the upstream thumbnail image host.
//!
//! This crate provides:
//! - A process-wide pooled HTTP client with per-call timeouts
//! - Availability probing of all five thumbnail tiers
//! - Single-attempt streaming thumbnail downloads
//! - Probe and fetch metrics

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod stream;

#[cfg(test)]
mod client_tests;

pub use client::ThumbnailClient;
pub use config::UpstreamConfig;
pub use error::{UpstreamError, UpstreamResult};
pub use stream::ThumbnailStream;

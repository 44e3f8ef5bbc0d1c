//! Shared data models for the ytthumb thumbnail service.
//!
//! This crate provides Serde-serializable types for:
//! - Validated YouTube video identifiers and URL parsing
//! - Thumbnail resolution tiers and availability maps
//! - Client-supplied availability hints
//! - Recent download history

pub mod availability;
pub mod history;
pub mod resolution;
pub mod video_id;
pub mod youtube;

// Re-export common types
pub use availability::{AvailabilityHint, AvailabilityMap};
pub use history::{
    entries_from_json, entries_to_json, HistoryEntry, HistoryGroup, HistoryStore,
    InMemoryHistoryStore, RecentDownloads,
};
pub use resolution::{RequestedResolution, ResolutionTier, TierParseError};
pub use video_id::{VideoIdError, VideoIdentifier, VIDEO_ID_LENGTH};
pub use youtube::{extract_video_id, is_valid_youtube_url, thumbnail_url, UPSTREAM_IMAGE_BASE};

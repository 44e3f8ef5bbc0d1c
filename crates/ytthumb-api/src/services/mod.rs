//! Business logic services.

pub mod thumbnail;

pub use thumbnail::{AvailabilityReport, Download, ThumbnailService};

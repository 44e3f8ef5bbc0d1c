//! Thumbnail resolution tiers.
//!
//! YouTube publishes up to five static thumbnails per video. From highest to
//! lowest fidelity:
//!
//! - `maxresdefault`: 1280x720, only for HD uploads
//! - `sddefault`: 640x480
//! - `hqdefault`: 480x360
//! - `mqdefault`: 320x180
//! - `default`: 120x90

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Thumbnail quality level.
///
/// Declaration order is the descending-fidelity order used for the
/// "best available" tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResolutionTier {
    #[serde(rename = "maxresdefault")]
    MaxRes,
    #[serde(rename = "sddefault")]
    Standard,
    #[serde(rename = "hqdefault")]
    High,
    #[serde(rename = "mqdefault")]
    Medium,
    #[serde(rename = "default")]
    Default,
}

impl ResolutionTier {
    /// All tiers, highest fidelity first.
    pub const ALL: [ResolutionTier; 5] = [
        ResolutionTier::MaxRes,
        ResolutionTier::Standard,
        ResolutionTier::High,
        ResolutionTier::Medium,
        ResolutionTier::Default,
    ];

    /// Returns the upstream file stem for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTier::MaxRes => "maxresdefault",
            ResolutionTier::Standard => "sddefault",
            ResolutionTier::High => "hqdefault",
            ResolutionTier::Medium => "mqdefault",
            ResolutionTier::Default => "default",
        }
    }

    /// Position in [`ResolutionTier::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Nominal pixel dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResolutionTier::MaxRes => (1280, 720),
            ResolutionTier::Standard => (640, 480),
            ResolutionTier::High => (480, 360),
            ResolutionTier::Medium => (320, 180),
            ResolutionTier::Default => (120, 90),
        }
    }

    /// Attachment filename for a single downloaded image.
    pub fn file_name(&self, video_id: impl fmt::Display) -> String {
        format!("{}_{}.jpg", video_id, self.as_str())
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionTier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResolutionTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| TierParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown resolution: {0}")]
pub struct TierParseError(pub String);

/// What a download request asks for: one tier or every available one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedResolution {
    Single(ResolutionTier),
    All,
}

impl RequestedResolution {
    /// Wire value of the "everything" sentinel.
    pub const ALL_SENTINEL: &'static str = "all";
}

impl FromStr for RequestedResolution {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ALL_SENTINEL {
            return Ok(RequestedResolution::All);
        }
        s.parse().map(RequestedResolution::Single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse() {
        assert_eq!("maxresdefault".parse::<ResolutionTier>().unwrap(), ResolutionTier::MaxRes);
        assert_eq!("sddefault".parse::<ResolutionTier>().unwrap(), ResolutionTier::Standard);
        assert_eq!("hqdefault".parse::<ResolutionTier>().unwrap(), ResolutionTier::High);
        assert_eq!("mqdefault".parse::<ResolutionTier>().unwrap(), ResolutionTier::Medium);
        assert_eq!("default".parse::<ResolutionTier>().unwrap(), ResolutionTier::Default);
        assert!("MAXRESDEFAULT".parse::<ResolutionTier>().is_err());
        assert!("hq720".parse::<ResolutionTier>().is_err());
    }

    #[test]
    fn test_order_is_descending_fidelity() {
        let widths: Vec<u32> = ResolutionTier::ALL.iter().map(|t| t.dimensions().0).collect();
        let mut sorted = widths.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(widths, sorted);

        for (i, tier) in ResolutionTier::ALL.iter().enumerate() {
            assert_eq!(tier.index(), i);
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&ResolutionTier::Standard).unwrap(),
            "\"sddefault\""
        );
        let tier: ResolutionTier = serde_json::from_str("\"default\"").unwrap();
        assert_eq!(tier, ResolutionTier::Default);
    }

    #[test]
    fn test_requested_resolution() {
        assert_eq!("all".parse::<RequestedResolution>().unwrap(), RequestedResolution::All);
        assert_eq!(
            "hqdefault".parse::<RequestedResolution>().unwrap(),
            RequestedResolution::Single(ResolutionTier::High)
        );
        assert_eq!(
            "ALL".parse::<RequestedResolution>(),
            Err(TierParseError("ALL".to_string()))
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ResolutionTier::Medium.file_name("dQw4w9WgXcQ"), "dQw4w9WgXcQ_mqdefault.jpg");
    }
}

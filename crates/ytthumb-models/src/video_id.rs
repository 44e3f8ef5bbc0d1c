//! Validated YouTube video identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// YouTube video IDs are exactly 11 characters.
pub const VIDEO_ID_LENGTH: usize = 11;

/// Errors that can occur when validating a raw video ID token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoIdError {
    /// Token is not exactly 11 characters long
    #[error("Video ID must be 11 characters, got {0}")]
    InvalidLength(usize),
    /// Token contains a character outside `[A-Za-z0-9_-]`
    #[error("Video ID contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// An 11-character YouTube video identifier.
///
/// Can only be constructed through [`VideoIdentifier::parse`], so holding one
/// means the token already passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoIdentifier(String);

impl VideoIdentifier {
    /// Validate a raw token.
    pub fn parse(raw: &str) -> Result<Self, VideoIdError> {
        let len = raw.chars().count();
        if len != VIDEO_ID_LENGTH {
            return Err(VideoIdError::InvalidLength(len));
        }

        if let Some(bad) = raw.chars().find(|c| !is_video_id_char(*c)) {
            return Err(VideoIdError::InvalidCharacter(bad));
        }

        Ok(Self(raw.to_string()))
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check if a character may appear in a video ID.
fn is_video_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl fmt::Display for VideoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VideoIdentifier {
    type Err = VideoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoIdentifier {
    type Error = VideoIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoIdentifier> for String {
    fn from(id: VideoIdentifier) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

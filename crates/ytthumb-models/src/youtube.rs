//! YouTube URL parsing.
//!
//! Supported URL shapes:
//! - https://youtu.be/VIDEO_ID
//! - https://youtube.com/watch?v=VIDEO_ID
//! - https://youtube.com/shorts/VIDEO_ID
//! - https://youtube.com/embed/VIDEO_ID
//! - https://youtube.com/e/VIDEO_ID
//! - https://youtube.com/live/VIDEO_ID
//!
//! A leading `www.` or `m.` on the host is ignored. URLs are untrusted
//! input: parsing never panics and anything unrecognized yields `None`.

use url::Url;

use crate::resolution::ResolutionTier;
use crate::video_id::{VideoIdentifier, VIDEO_ID_LENGTH};

/// Public host serving static video thumbnails.
pub const UPSTREAM_IMAGE_BASE: &str = "https://img.youtube.com";

const SHORT_LINK_HOST: &str = "youtu.be";
const CANONICAL_HOST: &str = "youtube.com";

/// Path prefixes on the canonical host that are followed by a video ID.
const PATH_PREFIXES: [&str; 4] = ["/e/", "/live/", "/shorts/", "/embed/"];

/// Extract a validated video identifier from a URL.
///
/// Returns `None` for unparseable URLs, foreign hosts, unknown shapes and
/// candidates that fail validation.
pub fn extract_video_id(url: &str) -> Option<VideoIdentifier> {
    let candidate = extract_candidate(url)?;
    VideoIdentifier::parse(&candidate).ok()
}

/// Check if a URL is a supported YouTube link with a well-formed video ID.
pub fn is_valid_youtube_url(url: &str) -> bool {
    extract_video_id(url).is_some()
}

/// Public image URL for one thumbnail tier.
pub fn thumbnail_url(video_id: &VideoIdentifier, tier: ResolutionTier) -> String {
    format!("{}/vi/{}/{}.jpg", UPSTREAM_IMAGE_BASE, video_id, tier)
}

/// Pull the raw, unvalidated ID candidate out of a URL.
fn extract_candidate(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = normalize_host(parsed.host_str()?);
    let path = parsed.path();

    match host {
        SHORT_LINK_HOST => {
            let rest = path.strip_prefix('/').unwrap_or(path);
            rest.split('&').next().map(str::to_string)
        }
        CANONICAL_HOST => {
            if let Some(id) = extract_from_path(path) {
                return Some(id);
            }
            parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        }
        _ => None,
    }
}

/// Strip one leading `www.` or `m.` from a host.
fn normalize_host(host: &str) -> &str {
    host.strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host)
}

/// Extract ID from /shorts/, /embed/, /e/ and /live/ paths.
fn extract_from_path(path: &str) -> Option<String> {
    let rest = PATH_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))?;

    let segment: String = rest.chars().take(VIDEO_ID_LENGTH).collect();
    segment.split('?').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(url: &str) -> Option<String> {
        extract_video_id(url).map(String::from)
    }

    #[test]
    fn test_extract_video_id_success_cases() {
        // youtu.be format
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));

        // Standard watch URL, with and without www
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id("https://youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );

        // Mobile host
        assert_eq!(
            id("https://m.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );

        // Path formats
        assert_eq!(id("https://youtube.com/shorts/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(id("https://youtube.com/embed/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(id("https://youtube.com/e/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(id("https://www.youtube.com/live/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_query_and_trailing_segments() {
        // Extra query parameters on watch URLs
        assert_eq!(
            id("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&list=PL123").as_deref(),
            Some("dQw4w9WgXcQ")
        );

        // Query on a short link is not part of the path
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?t=30").as_deref(), Some("dQw4w9WgXcQ"));

        // Short link path truncated at '&'
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ&t=30").as_deref(), Some("dQw4w9WgXcQ"));

        // Path formats only look at the first 11 characters
        assert_eq!(
            id("https://youtube.com/shorts/dQw4w9WgXcQ/extra").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id("https://youtube.com/embed/dQw4w9WgXcQ?start=10").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_path_prefix_wins_over_query() {
        assert_eq!(
            id("https://youtube.com/embed/dQw4w9WgXcQ?v=aaaaaaaaaaa").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_video_id_error_cases() {
        // Non-YouTube hosts
        assert_eq!(id("https://example.com/video"), None);
        assert_eq!(id("https://vimeo.com/123"), None);
        assert_eq!(id("https://notyoutube.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(id("https://music.youtube.com/watch?v=dQw4w9WgXcQ"), None);

        // Not a URL at all
        assert_eq!(id("dQw4w9WgXcQ"), None);
        assert_eq!(id(""), None);
        assert_eq!(id("http://"), None);

        // Recognized host, no ID
        assert_eq!(id("https://youtube.com"), None);
        assert_eq!(id("https://youtube.com/watch"), None);
        assert_eq!(id("https://youtube.com/watch?v="), None);
        assert_eq!(id("https://youtu.be/"), None);

        // Unknown path shape on the canonical host
        assert_eq!(id("https://youtube.com/v/dQw4w9WgXcQ"), None);

        // Invalid ID format
        assert_eq!(id("https://youtube.com/watch?v=abc123"), None);
        assert_eq!(id("https://youtu.be/abc123def456789"), None);
        assert_eq!(id("https://youtube.com/watch?v=abc123def!!"), None);
        assert_eq!(id("https://youtube.com/shorts/short"), None);
    }

    #[test]
    fn test_host_normalization_is_single_prefix() {
        assert_eq!(id("https://www.m.youtube.com/watch?v=dQw4w9WgXcQ"), None);
        // Hosts are lowercased by the URL parser
        assert_eq!(
            id("https://WWW.YOUTUBE.COM/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_is_valid_youtube_url() {
        assert!(is_valid_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(!is_valid_youtube_url("https://example.com/video"));
    }

    #[test]
    fn test_thumbnail_url() {
        let video_id = VideoIdentifier::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(
            thumbnail_url(&video_id, ResolutionTier::MaxRes),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }
}

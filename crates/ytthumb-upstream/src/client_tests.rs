//! Tests for the thumbnail client against a mock image host.

use std::time::Duration;

use futures_util::StreamExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytthumb_models::{ResolutionTier, VideoIdentifier};

use crate::client::ThumbnailClient;
use crate::config::UpstreamConfig;
use crate::error::UpstreamError;

// =============================================================================
// Test Helpers
// =============================================================================

const VIDEO: &str = "dQw4w9WgXcQ";

fn video_id() -> VideoIdentifier {
    VideoIdentifier::parse(VIDEO).unwrap()
}

fn test_client(server: &MockServer) -> ThumbnailClient {
    let config = UpstreamConfig {
        probe_timeout: Duration::from_millis(300),
        fetch_timeout: Duration::from_secs(2),
        ..UpstreamConfig::with_base_url(server.uri())
    };
    ThumbnailClient::new(config).unwrap()
}

fn tier_path(tier: ResolutionTier) -> String {
    format!("/vi/{}/{}.jpg", VIDEO, tier)
}

async fn mount_head(server: &MockServer, tier: ResolutionTier, template: ResponseTemplate) {
    Mock::given(method("HEAD"))
        .and(path(tier_path(tier)))
        .respond_with(template)
        .mount(server)
        .await;
}

// =============================================================================
// Probe Tests
// =============================================================================

#[tokio::test]
async fn test_probe_all_reports_every_tier() {
    let server = MockServer::start().await;
    mount_head(&server, ResolutionTier::High, ResponseTemplate::new(200)).await;
    mount_head(&server, ResolutionTier::Default, ResponseTemplate::new(200)).await;
    // Everything else falls through to wiremock's 404.

    let map = test_client(&server).probe_all(&video_id()).await;

    assert_eq!(map.iter().count(), 5);
    assert_eq!(
        map.available_tiers(),
        vec![ResolutionTier::High, ResolutionTier::Default]
    );
    assert_eq!(map.best_available(), Some(ResolutionTier::High));
}

#[tokio::test]
async fn test_probe_timeout_does_not_block_other_tiers() {
    let server = MockServer::start().await;
    mount_head(
        &server,
        ResolutionTier::MaxRes,
        ResponseTemplate::new(200).set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_head(&server, ResolutionTier::Standard, ResponseTemplate::new(200)).await;
    mount_head(&server, ResolutionTier::Medium, ResponseTemplate::new(500)).await;

    let started = std::time::Instant::now();
    let map = test_client(&server).probe_all(&video_id()).await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!map.is_available(ResolutionTier::MaxRes));
    assert!(map.is_available(ResolutionTier::Standard));
    assert!(!map.is_available(ResolutionTier::Medium));
    assert_eq!(map.best_available(), Some(ResolutionTier::Standard));
}

#[tokio::test]
async fn test_probe_unreachable_host_is_unavailable() {
    // Nothing listens on port 9 (discard) in test environments.
    let client = ThumbnailClient::new(UpstreamConfig {
        probe_timeout: Duration::from_millis(300),
        ..UpstreamConfig::with_base_url("http://127.0.0.1:9")
    })
    .unwrap();

    let map = client.probe_all(&video_id()).await;

    assert!(map.none_available());
    assert_eq!(map.best_available(), None);
}

#[tokio::test]
async fn test_probe_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path(tier_path(ResolutionTier::High)))
        .and(wiremock::matchers::header(
            "user-agent",
            "YouTube-Thumbnail-Downloader/1.0",
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(test_client(&server).probe(&video_id(), ResolutionTier::High).await);
}

// =============================================================================
// Fetch Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_streams_body() {
    let server = MockServer::start().await;
    let image = vec![0xFFu8, 0xD8, 0xFF, 0xE0, 1, 2, 3, 4];
    Mock::given(method("GET"))
        .and(path(tier_path(ResolutionTier::Medium)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(image.clone()),
        )
        .mount(&server)
        .await;

    let mut stream = test_client(&server)
        .fetch(&video_id(), ResolutionTier::Medium)
        .await
        .unwrap();
    assert_eq!(stream.tier(), ResolutionTier::Medium);

    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(body, image);
}

#[tokio::test]
async fn test_fetch_non_success_is_error() {
    let server = MockServer::start().await;

    let err = test_client(&server)
        .fetch(&video_id(), ResolutionTier::MaxRes)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, UpstreamError::BadStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_fetch_is_single_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(tier_path(ResolutionTier::High)))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch(&video_id(), ResolutionTier::High)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "bad_status");
}

#[test]
fn test_thumbnail_url_trims_trailing_slash() {
    let client = ThumbnailClient::new(UpstreamConfig::with_base_url("https://img.youtube.com/")).unwrap();
    assert_eq!(
        client.thumbnail_url(&video_id(), ResolutionTier::Standard),
        "https://img.youtube.com/vi/dQw4w9WgXcQ/sddefault.jpg"
    );
}

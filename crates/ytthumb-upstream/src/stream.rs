//! Streaming thumbnail bodies.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use ytthumb_models::ResolutionTier;

use crate::error::{UpstreamError, UpstreamResult};

/// Image bytes for one tier, read straight from the upstream socket.
///
/// Single pass: chunks are yielded as they arrive and never buffered whole.
pub struct ThumbnailStream {
    tier: ResolutionTier,
    content_length: Option<u64>,
    inner: BoxStream<'static, UpstreamResult<Bytes>>,
}

impl ThumbnailStream {
    pub(crate) fn from_response(tier: ResolutionTier, response: reqwest::Response) -> Self {
        let content_length = response.content_length();
        let inner = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(UpstreamError::Network))
            .boxed();

        Self {
            tier,
            content_length,
            inner,
        }
    }

    /// Wrap an arbitrary chunk stream.
    pub fn from_stream<S>(tier: ResolutionTier, stream: S) -> Self
    where
        S: Stream<Item = UpstreamResult<Bytes>> + Send + 'static,
    {
        Self {
            tier,
            content_length: None,
            inner: stream.boxed(),
        }
    }

    pub fn tier(&self) -> ResolutionTier {
        self.tier
    }

    /// Length advertised by the upstream, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }
}

impl Stream for ThumbnailStream {
    type Item = UpstreamResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for ThumbnailStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailStream")
            .field("tier", &self.tier)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

//! Streaming ZIP archives of thumbnails.
//!
//! The archive is written with data descriptors so nothing needs to be seeked
//! back into. Compressed bytes are forwarded to the response body as soon as
//! the encoder produces them, through a bounded channel, so memory stays
//! flat regardless of archive size.
//!
//! Once the first byte is sent the status line is committed. A failure after
//! that point ends the body with an error, which aborts the connection; a
//! truncated archive never gets a central directory.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};
use ytthumb_models::VideoIdentifier;
use ytthumb_upstream::{ThumbnailStream, UpstreamError};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::metrics;

/// Compressed chunks buffered between the encoder and the socket.
const CHANNEL_CAPACITY: usize = 8;

/// Body stream of an archive in flight.
pub type ArchiveStream = ReceiverStream<io::Result<Bytes>>;

/// Attachment filename for a full archive.
pub fn archive_file_name(video_id: &VideoIdentifier) -> String {
    format!("{}_thumbnails.zip", video_id)
}

#[derive(Debug, Error)]
enum ArchiveError {
    #[error("Thumbnail stream failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Archive encoding failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive write failed: {0}")]
    Io(#[from] io::Error),

    #[error("Client disconnected")]
    ClientGone,
}

/// Shared byte buffer the ZIP encoder writes into.
#[derive(Clone, Default)]
struct ChunkSink(Arc<Mutex<Vec<u8>>>);

impl ChunkSink {
    fn lock(&self) -> io::Result<MutexGuard<'_, Vec<u8>>> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("archive buffer poisoned"))
    }

    /// Drain everything written so far.
    fn take(&self) -> io::Result<Vec<u8>> {
        Ok(std::mem::take(&mut *self.lock()?))
    }
}

impl Write for ChunkSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One archive being streamed to one client.
pub struct ArchiveJob {
    video_id: VideoIdentifier,
    entries: Vec<ThumbnailStream>,
}

impl ArchiveJob {
    /// Entries are written in the given order, one `<id>_<tier>.jpg` each.
    pub fn new(video_id: VideoIdentifier, entries: Vec<ThumbnailStream>) -> Self {
        Self { video_id, entries }
    }

    pub fn entry_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.tier().file_name(&self.video_id))
            .collect()
    }

    /// Start encoding in the background and return the output stream.
    pub fn spawn(self) -> ArchiveStream {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(self.run(tx));
        ReceiverStream::new(rx)
    }

    async fn run(self, tx: mpsc::Sender<io::Result<Bytes>>) {
        let video_id = self.video_id.clone();

        match self.write_to(&tx).await {
            Ok(entries) => {
                info!(video_id = %video_id, entries, "Archive completed");
                metrics::record_archive_completed(entries);
            }
            Err(ArchiveError::ClientGone) => {
                debug!(video_id = %video_id, "Client disconnected during archive download");
                metrics::record_archive_aborted("client_gone");
            }
            Err(e) => {
                error!(video_id = %video_id, error = %e, "Archive build failed, aborting response");
                metrics::record_archive_aborted("error");
                // Ends the body with an error so the connection is torn down.
                let _ = tx.send(Err(io::Error::other(e.to_string()))).await;
            }
        }
    }

    async fn write_to(self, tx: &mpsc::Sender<io::Result<Bytes>>) -> Result<usize, ArchiveError> {
        let ArchiveJob { video_id, entries } = self;
        let count = entries.len();

        let sink = ChunkSink::default();
        let mut zip = ZipWriter::new_stream(sink.clone());
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(9));

        for mut entry in entries {
            let name = entry.tier().file_name(&video_id);
            zip.start_file(name, options)?;

            while let Some(chunk) = entry.next().await {
                zip.write_all(&chunk?)?;
                forward(&sink, tx).await?;
            }
        }

        zip.finish()?;
        forward(&sink, tx).await?;

        Ok(count)
    }
}

/// Send whatever the encoder produced since the last call.
async fn forward(
    sink: &ChunkSink,
    tx: &mpsc::Sender<io::Result<Bytes>>,
) -> Result<(), ArchiveError> {
    let pending = sink.take()?;
    if pending.is_empty() {
        return Ok(());
    }

    tx.send(Ok(Bytes::from(pending)))
        .await
        .map_err(|_| ArchiveError::ClientGone)
}

use std::path::PathBuf;
use std::time::Duration;

use clipwise_logging::{cw_debug, cw_info, redact_url};
use futures_util::StreamExt;

use crate::fetch::{
    build_client, check_response, map_reqwest_error, parse_url, too_large, HttpSettings,
};
use crate::filename::clip_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{DownloadProgress, EngineEvent, FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub http: HttpSettings,
    pub download_dir: PathBuf,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            http: HttpSettings {
                connect_timeout: Duration::from_secs(10),
                request_timeout: Duration::from_secs(120),
                redirect_limit: 5,
                max_bytes: 512 * 1024 * 1024,
            },
            download_dir: PathBuf::from("downloads"),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    /// Fetches a clip's bytes and saves them as a local file.
    async fn download(
        &self,
        clip_id: &str,
        media_url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<PathBuf, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestDownloader {
    settings: DownloadSettings,
}

impl ReqwestDownloader {
    pub fn new(settings: DownloadSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Downloader for ReqwestDownloader {
    async fn download(
        &self,
        clip_id: &str,
        media_url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<PathBuf, FetchError> {
        let parsed = parse_url(media_url)?;
        let client = build_client(&self.settings.http)?;
        let max_bytes = self.settings.http.max_bytes;

        cw_info!("GET {} for clip {clip_id}", redact_url(media_url));
        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;
        check_response(&response, max_bytes)?;

        let total = response.content_length();
        let progress = |bytes: u64| {
            sink.emit(EngineEvent::DownloadProgress(DownloadProgress {
                clip_id: clip_id.to_string(),
                bytes,
                total,
            }))
        };

        // Chunks go straight to a temp file next to the target; an early
        // return drops it, which deletes the partial clip.
        let mut staged = AtomicFileWriter::new(self.settings.download_dir.clone())
            .stage()
            .map_err(io_failure)?;
        progress(0);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = staged.written() + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            staged.append(&chunk).map_err(io_failure)?;
            progress(staged.written());
        }

        let written = staged.written();
        let path = staged.commit(&clip_filename(clip_id)).map_err(io_failure)?;
        cw_debug!("clip {clip_id} written to {path:?} ({written} bytes)");
        Ok(path)
    }
}

fn io_failure(err: PersistError) -> FetchError {
    FetchError::new(FailureKind::Io, err.to_string())
}

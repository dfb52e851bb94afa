use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use clipwise_logging::{cw_debug, cw_error};

use crate::download::{ChannelProgressSink, DownloadSettings, Downloader, ReqwestDownloader};
use crate::platform::{Clipboard, ShareSheet};
use crate::submit::{ReqwestSubmitter, SubmitSettings, Submitter};
use crate::{ClipKey, EngineEvent, PlatformError, RequestId, ShareRequest};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub submit: SubmitSettings,
    pub download: DownloadSettings,
}

enum EngineCommand {
    Submit {
        request_id: RequestId,
        video_url: String,
    },
    Download {
        clip_id: ClipKey,
        media_url: String,
    },
    CopyText {
        clip_id: ClipKey,
        text: String,
    },
    Share {
        clip_id: ClipKey,
        request: ShareRequest,
    },
    ScheduleCopyReset {
        clip_id: ClipKey,
        generation: u64,
        after: Duration,
    },
}

struct Workers {
    submitter: Arc<dyn Submitter>,
    downloader: Arc<dyn Downloader>,
    clipboard: Arc<dyn Clipboard>,
    share_sheet: Arc<dyn ShareSheet>,
}

/// Runs IO off the caller's thread. Commands go in through the handle and
/// results come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
    native_share: bool,
}

impl EngineHandle {
    pub fn new(
        config: EngineConfig,
        clipboard: Arc<dyn Clipboard>,
        share_sheet: Arc<dyn ShareSheet>,
    ) -> Self {
        let workers = Workers {
            submitter: Arc::new(ReqwestSubmitter::new(config.submit)),
            downloader: Arc::new(ReqwestDownloader::new(config.download)),
            clipboard,
            share_sheet,
        };
        Self::with_workers(workers)
    }

    /// Builds an engine around custom submit and download implementations.
    pub fn with_services(
        submitter: Arc<dyn Submitter>,
        downloader: Arc<dyn Downloader>,
        clipboard: Arc<dyn Clipboard>,
        share_sheet: Arc<dyn ShareSheet>,
    ) -> Self {
        Self::with_workers(Workers {
            submitter,
            downloader,
            clipboard,
            share_sheet,
        })
    }

    fn with_workers(workers: Workers) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let native_share = workers.share_sheet.is_available();
        let workers = Arc::new(workers);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    cw_error!("engine runtime failed to start: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let workers = workers.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&workers, command, event_tx).await;
                });
            }
            cw_debug!("engine command channel closed");
        });

        Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
            native_share,
        }
    }

    /// Whether the platform offers a native share sheet.
    pub fn native_share(&self) -> bool {
        self.native_share
    }

    pub fn submit(&self, request_id: RequestId, video_url: impl Into<String>) {
        self.send(EngineCommand::Submit {
            request_id,
            video_url: video_url.into(),
        });
    }

    pub fn download(&self, clip_id: impl Into<ClipKey>, media_url: impl Into<String>) {
        self.send(EngineCommand::Download {
            clip_id: clip_id.into(),
            media_url: media_url.into(),
        });
    }

    pub fn copy_text(&self, clip_id: impl Into<ClipKey>, text: impl Into<String>) {
        self.send(EngineCommand::CopyText {
            clip_id: clip_id.into(),
            text: text.into(),
        });
    }

    pub fn share(&self, clip_id: impl Into<ClipKey>, request: ShareRequest) {
        self.send(EngineCommand::Share {
            clip_id: clip_id.into(),
            request,
        });
    }

    /// Emits [`EngineEvent::TimerElapsed`] once `after` has passed.
    pub fn schedule_copy_reset(
        &self,
        clip_id: impl Into<ClipKey>,
        generation: u64,
        after: Duration,
    ) {
        self.send(EngineCommand::ScheduleCopyReset {
            clip_id: clip_id.into(),
            generation,
            after,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            cw_error!("engine is not running; command dropped");
        }
    }
}

async fn handle_command(
    workers: &Workers,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Submit {
            request_id,
            video_url,
        } => {
            let result = workers.submitter.submit(&video_url).await;
            EngineEvent::SubmissionCompleted { request_id, result }
        }
        EngineCommand::Download { clip_id, media_url } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = workers
                .downloader
                .download(&clip_id, &media_url, &sink)
                .await;
            EngineEvent::DownloadCompleted { clip_id, result }
        }
        EngineCommand::CopyText { clip_id, text } => {
            let clipboard = workers.clipboard.clone();
            let result = run_blocking(move || clipboard.write_text(&text)).await;
            EngineEvent::ClipboardWritten { clip_id, result }
        }
        EngineCommand::Share { clip_id, request } => {
            let share_sheet = workers.share_sheet.clone();
            let result = run_blocking(move || share_sheet.share(&request)).await;
            EngineEvent::ShareCompleted { clip_id, result }
        }
        EngineCommand::ScheduleCopyReset {
            clip_id,
            generation,
            after,
        } => {
            tokio::time::sleep(after).await;
            EngineEvent::TimerElapsed {
                clip_id,
                generation,
            }
        }
    };
    let _ = event_tx.send(event);
}

async fn run_blocking<T, F>(task: F) -> Result<T, PlatformError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PlatformError> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result,
        Err(err) => Err(PlatformError::new(format!("platform task failed: {err}"))),
    }
}

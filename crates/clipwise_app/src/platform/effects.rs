use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use clipwise_core::{
    Effect, Msg, ShareOutcome, SideEffectAction, SideEffectFailure, TransportFailure,
    TransportKind,
};
use clipwise_engine::{
    EngineEvent, EngineHandle, FailureKind, FetchError, ShareRequest, ShareStatus,
};
use clipwise_logging::cw_debug;

use super::app::ShellInput;

pub struct EffectRunner {
    engine: Arc<EngineHandle>,
}

impl EffectRunner {
    pub fn new(engine: Arc<EngineHandle>, input_tx: mpsc::Sender<ShellInput>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(input_tx);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitVideo {
                    request_id,
                    video_url,
                } => {
                    cw_debug!("engine <- submit request_id={request_id}");
                    self.engine.submit(request_id, video_url);
                }
                Effect::CopyToClipboard { clip_id, text } => {
                    cw_debug!("engine <- copy clip_id={clip_id}");
                    self.engine.copy_text(clip_id, text.into_string());
                }
                Effect::ScheduleCopyReset {
                    clip_id,
                    generation,
                    after,
                } => {
                    self.engine.schedule_copy_reset(clip_id, generation, after);
                }
                Effect::DownloadClip { clip_id, media_url } => {
                    cw_debug!("engine <- download clip_id={clip_id}");
                    self.engine.download(clip_id, media_url.into_string());
                }
                Effect::ShareClip { clip_id, payload } => {
                    cw_debug!("engine <- share clip_id={clip_id}");
                    self.engine.share(
                        clip_id,
                        ShareRequest {
                            title: payload.title,
                            text: payload.text,
                            url: payload.url.into_string(),
                        },
                    );
                }
            }
        }
    }

    fn spawn_event_loop(&self, input_tx: mpsc::Sender<ShellInput>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                continue;
            };
            if let Some(msg) = map_event(event) {
                if input_tx.send(ShellInput::Msg(msg)).is_err() {
                    break;
                }
            }
        });
    }
}

/// Core message for an engine event; progress ticks are only logged.
pub(crate) fn map_event(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::SubmissionCompleted { request_id, result } => Msg::SubmissionResolved {
            request_id,
            result: result.map_err(map_transport_failure),
        },
        EngineEvent::DownloadProgress(progress) => {
            cw_debug!(
                "download clip_id={} bytes={} total={:?}",
                progress.clip_id,
                progress.bytes,
                progress.total
            );
            return None;
        }
        EngineEvent::DownloadCompleted { clip_id, result } => Msg::DownloadFinished {
            clip_id,
            result: result
                .map_err(|err| SideEffectFailure::new(SideEffectAction::Download, err.to_string())),
        },
        EngineEvent::ClipboardWritten { clip_id, result } => Msg::ClipboardWritten {
            clip_id,
            result: result
                .map_err(|err| SideEffectFailure::new(SideEffectAction::Clipboard, err.0)),
        },
        EngineEvent::ShareCompleted { clip_id, result } => Msg::ShareFinished {
            clip_id,
            result: result
                .map(|status| match status {
                    ShareStatus::Shared => ShareOutcome::Shared,
                    ShareStatus::Cancelled => ShareOutcome::Cancelled,
                })
                .map_err(|err| SideEffectFailure::new(SideEffectAction::Share, err.0)),
        },
        EngineEvent::TimerElapsed {
            clip_id,
            generation,
        } => Msg::CopyFeedbackExpired {
            clip_id,
            generation,
        },
    };
    Some(msg)
}

fn map_transport_failure(err: FetchError) -> TransportFailure {
    let kind = match err.kind {
        FailureKind::Timeout => TransportKind::Timeout,
        FailureKind::HttpStatus(code) => TransportKind::HttpStatus(code),
        FailureKind::TooLarge { .. } => TransportKind::TooLarge,
        FailureKind::InvalidUrl
        | FailureKind::RedirectLimitExceeded
        | FailureKind::Network
        | FailureKind::Io => TransportKind::Network,
    };
    TransportFailure::new(kind, err.message)
}

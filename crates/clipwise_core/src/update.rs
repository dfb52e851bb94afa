use std::path::PathBuf;

use clipwise_logging::{cw_debug, cw_info, cw_warn};

use crate::{
    normalize_text, validate_video_url, AppState, ClipId, CloseOrigin, Effect, Msg, RequestId,
    ShareOutcome, SideEffectFailure, SubmissionError, TransportFailure, COPY_FEEDBACK_DURATION,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::ResetClicked => {
            cw_debug!("session reset");
            state.reset_session();
            Vec::new()
        }
        Msg::SubmissionResolved { request_id, result } => {
            resolve_submission(&mut state, request_id, result);
            Vec::new()
        }
        Msg::ClipMounted { clip_id } => {
            if !state.mount_clip(clip_id.clone()) {
                cw_debug!("mount ignored for clip {clip_id}");
            }
            Vec::new()
        }
        Msg::ClipUnmounted { clip_id } => {
            state.unmount_clip(&clip_id);
            Vec::new()
        }
        Msg::CopyLinkClicked { clip_id } => copy_link(&state, clip_id),
        Msg::ClipboardWritten { clip_id, result } => clipboard_written(&mut state, clip_id, result),
        Msg::CopyFeedbackExpired {
            clip_id,
            generation,
        } => {
            state.with_interaction(&clip_id, |clip| (clip.expire_copied(generation), ()));
            Vec::new()
        }
        Msg::LikeToggled { clip_id } => {
            state.with_interaction(&clip_id, |clip| {
                clip.toggle_like();
                (true, ())
            });
            Vec::new()
        }
        Msg::PreviewOpened { clip_id } => {
            state.with_interaction(&clip_id, |clip| (clip.open_preview(), ()));
            Vec::new()
        }
        Msg::PreviewCloseRequested { clip_id, origin } => {
            close_preview(&mut state, &clip_id, origin);
            Vec::new()
        }
        Msg::DownloadClicked { clip_id } => download(&mut state, clip_id),
        Msg::DownloadFinished { clip_id, result } => {
            download_finished(&mut state, clip_id, result);
            Vec::new()
        }
        Msg::ShareClicked { clip_id } => share(&state, clip_id),
        Msg::ShareFinished { clip_id, result } => {
            share_finished(&mut state, clip_id, result);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let video_url = match validate_video_url(state.input()) {
        Ok(url) => url,
        Err(err) => {
            cw_debug!("submission input rejected: {err:?}");
            state.reject_input(SubmissionError::from(err).to_string());
            return Vec::new();
        }
    };

    let Some(request_id) = state.begin_submission() else {
        cw_debug!("submission ignored: a request is already in flight");
        return Vec::new();
    };
    cw_info!("SubmitVideo request_id={request_id} url_len={}", video_url.len());
    vec![Effect::SubmitVideo {
        request_id,
        video_url,
    }]
}

fn resolve_submission(
    state: &mut AppState,
    request_id: RequestId,
    result: Result<String, TransportFailure>,
) {
    if !state.session().is_awaiting(request_id) {
        cw_warn!(
            "discarding response for request {request_id}: session is {:?}, outstanding {:?}",
            state.session().status(),
            state.session().outstanding_request()
        );
        return;
    }

    let outcome = result
        .map_err(SubmissionError::from)
        .and_then(|body| normalize_text(&body).map_err(SubmissionError::from));
    match outcome {
        Ok(response) => {
            cw_info!(
                "request {request_id} succeeded: session_id={} clips={} dropped={}",
                response.session_id,
                response.clips.len(),
                response.dropped
            );
            state.complete_submission(request_id, response);
        }
        Err(err) => {
            cw_warn!("request {request_id} failed: {err}");
            state.fail_submission(request_id, err.to_string());
        }
    }
}

fn copy_link(state: &AppState, clip_id: ClipId) -> Vec<Effect> {
    match state.mounted_clip(&clip_id) {
        Some(clip) => vec![Effect::CopyToClipboard {
            text: clip.media_url.clone(),
            clip_id,
        }],
        None => {
            cw_debug!("copy ignored for unmounted clip {clip_id}");
            Vec::new()
        }
    }
}

fn clipboard_written(
    state: &mut AppState,
    clip_id: ClipId,
    result: Result<(), SideEffectFailure>,
) -> Vec<Effect> {
    if let Err(failure) = result {
        report_failure(state, clip_id, failure);
        return Vec::new();
    }
    match state.with_interaction(&clip_id, |clip| (true, clip.mark_copied())) {
        Some(generation) => vec![Effect::ScheduleCopyReset {
            clip_id,
            generation,
            after: COPY_FEEDBACK_DURATION,
        }],
        None => Vec::new(),
    }
}

fn close_preview(state: &mut AppState, clip_id: &str, origin: CloseOrigin) {
    if !origin.closes_preview() {
        cw_debug!("preview close from {origin:?} ignored for clip {clip_id}");
        return;
    }
    state.with_interaction(clip_id, |clip| (clip.close_preview(), ()));
}

fn download(state: &mut AppState, clip_id: ClipId) -> Vec<Effect> {
    let Some(media_url) = state.mounted_clip(&clip_id).map(|clip| clip.media_url.clone()) else {
        cw_debug!("download ignored for unmounted clip {clip_id}");
        return Vec::new();
    };
    let started = state
        .with_interaction(&clip_id, |clip| {
            let started = clip.begin_download();
            (started, started)
        })
        .unwrap_or(false);
    if !started {
        cw_debug!("download already running for clip {clip_id}");
        return Vec::new();
    }
    cw_info!("DownloadClip clip_id={clip_id} url={}", media_url.redacted());
    vec![Effect::DownloadClip { clip_id, media_url }]
}

fn download_finished(
    state: &mut AppState,
    clip_id: ClipId,
    result: Result<PathBuf, SideEffectFailure>,
) {
    state.with_interaction(&clip_id, |clip| (clip.finish_download(), ()));
    match result {
        Ok(path) => cw_info!("clip {clip_id} saved to {path:?}"),
        Err(failure) => report_failure(state, clip_id, failure),
    }
}

fn share(state: &AppState, clip_id: ClipId) -> Vec<Effect> {
    if !state.capabilities().native_share {
        return copy_link(state, clip_id);
    }
    match state.mounted_clip(&clip_id) {
        Some(clip) => vec![Effect::ShareClip {
            payload: clip.share_payload(),
            clip_id,
        }],
        None => {
            cw_debug!("share ignored for unmounted clip {clip_id}");
            Vec::new()
        }
    }
}

fn share_finished(
    state: &mut AppState,
    clip_id: ClipId,
    result: Result<ShareOutcome, SideEffectFailure>,
) {
    match result {
        Ok(ShareOutcome::Shared) => cw_info!("clip {clip_id} shared"),
        Ok(ShareOutcome::Cancelled) => cw_debug!("share of clip {clip_id} cancelled"),
        Err(failure) => report_failure(state, clip_id, failure),
    }
}

fn report_failure(state: &mut AppState, clip_id: ClipId, failure: SideEffectFailure) {
    cw_warn!("clip {clip_id}: {failure}");
    state.record_diagnostic(clip_id, failure);
}

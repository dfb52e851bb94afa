use std::path::PathBuf;

use crate::{
    ClipId, CloseOrigin, RequestId, ShareOutcome, SideEffectFailure, TransportFailure,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// User submitted the current URL input.
    SubmitClicked,
    /// User cleared the session (e.g. dismissed an error banner).
    ResetClicked,
    /// The clip service answered, or the request failed in transit.
    /// `Ok` carries the raw response body.
    SubmissionResolved {
        request_id: RequestId,
        result: Result<String, TransportFailure>,
    },
    /// The shell rendered a clip card.
    ClipMounted { clip_id: ClipId },
    /// The shell removed a clip card.
    ClipUnmounted { clip_id: ClipId },
    CopyLinkClicked { clip_id: ClipId },
    ClipboardWritten {
        clip_id: ClipId,
        result: Result<(), SideEffectFailure>,
    },
    /// The copy confirmation window for `generation` elapsed.
    CopyFeedbackExpired { clip_id: ClipId, generation: u64 },
    LikeToggled { clip_id: ClipId },
    PreviewOpened { clip_id: ClipId },
    PreviewCloseRequested { clip_id: ClipId, origin: CloseOrigin },
    DownloadClicked { clip_id: ClipId },
    DownloadFinished {
        clip_id: ClipId,
        result: Result<PathBuf, SideEffectFailure>,
    },
    ShareClicked { clip_id: ClipId },
    ShareFinished {
        clip_id: ClipId,
        result: Result<ShareOutcome, SideEffectFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

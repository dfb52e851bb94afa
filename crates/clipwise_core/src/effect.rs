use std::time::Duration;

use crate::{ClipId, MediaUrl, RequestId, SharePayload};

/// How long the "link copied" confirmation stays visible.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitVideo {
        request_id: RequestId,
        video_url: String,
    },
    CopyToClipboard {
        clip_id: ClipId,
        text: MediaUrl,
    },
    ScheduleCopyReset {
        clip_id: ClipId,
        generation: u64,
        after: Duration,
    },
    DownloadClip {
        clip_id: ClipId,
        media_url: MediaUrl,
    },
    ShareClip {
        clip_id: ClipId,
        payload: SharePayload,
    },
}

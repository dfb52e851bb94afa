//! ClipWise core: pure submission/interaction state machine, response
//! normalization and view-model helpers.
mod clip;
mod effect;
mod error;
mod interaction;
mod msg;
mod normalize;
mod session;
mod state;
mod update;
mod validate;
mod view_model;

pub use clip::{canonical_score, format_offset, Clip, ClipId, MediaUrl, SharePayload};
pub use effect::{Effect, COPY_FEEDBACK_DURATION};
pub use error::{
    InvalidInput, SideEffectAction, SideEffectFailure, SubmissionError, TransportFailure,
    TransportKind,
};
pub use interaction::{ClipInteractionState, CloseOrigin, InteractionRegistry, ShareOutcome};
pub use msg::Msg;
pub use normalize::{normalize_response, normalize_text, NormalizeError, NormalizedResponse};
pub use session::{RequestId, SubmissionSession, SubmissionStatus};
pub use state::{AppState, Diagnostic, PlatformCapabilities, MAX_DIAGNOSTICS};
pub use update::update;
pub use validate::{validate_video_url, ALLOWED_VIDEO_HOSTS};
pub use view_model::{AppViewModel, ClipCardView, TRANSCRIPT_PREVIEW_CHARS};

use chrono::{DateTime, Utc};

use crate::{Clip, ClipId, ClipInteractionState, SubmissionStatus};

/// Characters of transcript shown on a clip card.
pub const TRANSCRIPT_PREVIEW_CHARS: usize = 160;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: SubmissionStatus,
    pub input: String,
    pub input_error: Option<String>,
    pub error_message: Option<String>,
    pub session_id: Option<String>,
    pub clips: Vec<ClipCardView>,
    pub diagnostics: Vec<String>,
    pub can_submit: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipCardView {
    pub clip_id: ClipId,
    pub time_range: String,
    pub duration: String,
    pub score: String,
    pub reasons: Vec<String>,
    pub transcript_preview: String,
    pub file_size: String,
    pub resolution: String,
    pub expires_at: Option<DateTime<Utc>>,
    /// `None` until the shell mounts the card.
    pub interaction: Option<ClipInteractionState>,
}

impl ClipCardView {
    pub(crate) fn new(clip: &Clip, interaction: Option<ClipInteractionState>) -> Self {
        Self {
            clip_id: clip.id.clone(),
            time_range: clip.time_range_label(),
            duration: clip.duration_label(),
            score: clip.score_label(),
            reasons: clip.top_reasons().to_vec(),
            transcript_preview: clip.transcript_preview(TRANSCRIPT_PREVIEW_CHARS).into_owned(),
            file_size: clip.file_size_label.clone(),
            resolution: clip.resolution_label.clone(),
            expires_at: clip.expires_at,
            interaction,
        }
    }
}

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};

pub type ClipId = String;

/// Number of interest reasons shown on a clip card.
const MAX_DISPLAYED_REASONS: usize = 3;
const TRUNCATION_MARKER: &str = "...";
const SHARE_TEXT_CHARS: usize = 120;

/// Location of a clip's video bytes.
///
/// These are pre-signed storage URLs, so `Debug` only ever prints the
/// redacted form and there is deliberately no `Display` impl.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MediaUrl(String);

impl MediaUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn redacted(&self) -> String {
        clipwise_logging::redact_url(&self.0)
    }
}

impl fmt::Debug for MediaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MediaUrl").field(&self.redacted()).finish()
    }
}

/// A normalized clip as returned by the clip service.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub id: ClipId,
    pub media_url: MediaUrl,
    pub start_offset: f64,
    pub end_offset: f64,
    pub duration: f64,
    /// Percentage in `[0, 100]`, see [`canonical_score`].
    pub interest_score: f64,
    pub interest_reasons: Vec<String>,
    pub transcript_excerpt: String,
    pub file_size_label: String,
    pub resolution_label: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: MediaUrl,
}

impl Clip {
    /// `m:ss - m:ss`, or `h:mm:ss` once a clip starts past the first hour.
    pub fn time_range_label(&self) -> String {
        format!(
            "{} - {}",
            format_offset(self.start_offset),
            format_offset(self.end_offset)
        )
    }

    pub fn duration_label(&self) -> String {
        format!("{:.1}s", self.duration)
    }

    pub fn score_label(&self) -> String {
        format!("{}%", self.interest_score.round() as u32)
    }

    pub fn top_reasons(&self) -> &[String] {
        let shown = self.interest_reasons.len().min(MAX_DISPLAYED_REASONS);
        &self.interest_reasons[..shown]
    }

    /// Transcript cut to `max_chars` characters with a trailing marker.
    pub fn transcript_preview(&self, max_chars: usize) -> Cow<'_, str> {
        let text = self.transcript_excerpt.as_str();
        match text.char_indices().nth(max_chars) {
            None => Cow::Borrowed(text),
            Some((end, _)) => Cow::Owned(format!("{}{TRUNCATION_MARKER}", text[..end].trim_end())),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    pub fn share_payload(&self) -> SharePayload {
        SharePayload {
            title: format!("ClipWise clip ({})", self.time_range_label()),
            text: self.transcript_preview(SHARE_TEXT_CHARS).into_owned(),
            url: self.media_url.clone(),
        }
    }
}

/// Maps a raw interest score onto the canonical `[0, 100]` scale.
///
/// The service reports integer interest points, read one point per percent.
/// The mapping is the identity clamped to the scale, so a higher raw score
/// never ranks lower. Negative or non-finite input is 0.
pub fn canonical_score(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn format_offset(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

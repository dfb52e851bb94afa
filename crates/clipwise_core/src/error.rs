use std::fmt;

use thiserror::Error;

use crate::normalize::NormalizeError;

/// Why a submission never reached, or never came back from, the clip service.
/// The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Transport(#[from] TransportFailure),
    #[error("The clip service returned an unexpected response ({0}).")]
    MalformedResponse(String),
}

impl From<NormalizeError> for SubmissionError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Rejected { status, message } => {
                SubmissionError::Transport(TransportFailure {
                    kind: TransportKind::Remote { status },
                    message,
                })
            }
            other => SubmissionError::MalformedResponse(other.to_string()),
        }
    }
}

/// Client-side validation failure; no request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("Please enter a video URL.")]
    Empty,
    #[error("That does not look like a URL.")]
    NotAUrl,
    #[error("Links from {host} are not supported. Try a YouTube or Vimeo link.")]
    UnsupportedHost { host: String },
    #[error("The link does not point at a video.")]
    MissingVideo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    Network,
    Timeout,
    HttpStatus(u16),
    TooLarge,
    /// The service answered but reported its own failure inside the envelope.
    Remote { status: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: TransportKind,
    pub message: String,
}

impl TransportFailure {
    pub fn new(kind: TransportKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TransportKind::Network => {
                write!(f, "Could not reach the clip service: {}", self.message)
            }
            TransportKind::Timeout => write!(f, "The clip service did not respond in time."),
            TransportKind::HttpStatus(code) => {
                write!(f, "The clip service returned HTTP {code}.")
            }
            TransportKind::TooLarge => write!(f, "The clip service response was too large."),
            TransportKind::Remote { status } => {
                write!(f, "The clip service failed ({status}): {}", self.message)
            }
        }
    }
}

impl std::error::Error for TransportFailure {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffectAction {
    Clipboard,
    Share,
    Download,
}

impl fmt::Display for SideEffectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideEffectAction::Clipboard => write!(f, "copy to clipboard"),
            SideEffectAction::Share => write!(f, "share"),
            SideEffectAction::Download => write!(f, "download"),
        }
    }
}

/// A clipboard, share or download failure. Scoped to the interaction that
/// triggered it and only ever reported on the diagnostic channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{action} failed: {message}")]
pub struct SideEffectFailure {
    pub action: SideEffectAction,
    pub message: String,
}

impl SideEffectFailure {
    pub fn new(action: SideEffectAction, message: impl Into<String>) -> Self {
        Self {
            action,
            message: message.into(),
        }
    }
}

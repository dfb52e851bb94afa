use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type RequestId = u64;
pub type ClipKey = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    pub clip_id: ClipKey,
    pub bytes: u64,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SubmissionCompleted {
        request_id: RequestId,
        /// Raw response body on success.
        result: Result<String, FetchError>,
    },
    DownloadProgress(DownloadProgress),
    DownloadCompleted {
        clip_id: ClipKey,
        result: Result<PathBuf, FetchError>,
    },
    ClipboardWritten {
        clip_id: ClipKey,
        result: Result<(), PlatformError>,
    },
    ShareCompleted {
        clip_id: ClipKey,
        result: Result<ShareStatus, PlatformError>,
    },
    TimerElapsed {
        clip_id: ClipKey,
        generation: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareStatus {
    Shared,
    Cancelled,
}

/// Failure reported by a clipboard or share-sheet adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    /// Writing the downloaded file failed.
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "file error"),
        }
    }
}

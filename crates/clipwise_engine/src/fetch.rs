//! HTTP plumbing shared by the submitter and the downloader.
use std::time::Duration;

use futures_util::StreamExt;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

pub(crate) fn build_client(settings: &HttpSettings) -> Result<reqwest::Client, FetchError> {
    let redirect_limit = settings.redirect_limit;
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= redirect_limit {
            attempt.error("redirect limit exceeded")
        } else {
            attempt.follow()
        }
    });

    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(policy)
        .build()
        .map_err(map_reqwest_error)
}

pub(crate) fn parse_url(url: &str) -> Result<reqwest::Url, FetchError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {}", parsed.scheme()),
        ));
    }
    Ok(parsed)
}

/// Rejects non-2xx responses and bodies announced larger than `max_bytes`.
pub(crate) fn check_response(
    response: &reqwest::Response,
    max_bytes: u64,
) -> Result<(), FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }

    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(too_large(max_bytes, content_len));
        }
    }
    Ok(())
}

/// Collects a small body in memory, failing once it passes `max_bytes`.
pub(crate) async fn read_body_limited(
    response: reqwest::Response,
    max_bytes: u64,
) -> Result<Vec<u8>, FetchError> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(too_large(max_bytes, next_len));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

pub(crate) fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

/// Media links carry signatures in their query, so the message never
/// includes the request URL.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.without_url().to_string())
}

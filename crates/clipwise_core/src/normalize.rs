//! Turns the clip service's response body into canonical [`Clip`]s.
//!
//! The service has two wire shapes for the same payload:
//!
//! * `{ "video_id": ..., "clips": [...] }` returned directly, and
//! * an invocation envelope `{ "statusCode": 200, "body": "<json>" }` whose
//!   `body` is the first shape encoded as a string.
//!
//! Both are accepted here so callers never see the difference. Individual
//! clips are parsed leniently: a clip without an id, media URL or a valid
//! time range is dropped and counted, the rest of the batch survives.

use chrono::{DateTime, NaiveDateTime, Utc};
use clipwise_logging::{cw_debug, cw_warn};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::clip::{canonical_score, Clip, MediaUrl};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("nested body is not valid JSON: {0}")]
    InvalidEnvelope(String),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("`clips` is not a list")]
    ClipsNotAList,
    #[error("remote service rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedResponse {
    pub session_id: String,
    pub clips: Vec<Clip>,
    /// Raw clips skipped by the lenient per-item policy.
    pub dropped: usize,
}

/// Parses raw body text, then normalizes it.
pub fn normalize_text(body: &str) -> Result<NormalizedResponse, NormalizeError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| NormalizeError::InvalidJson(err.to_string()))?;
    normalize_response(&value)
}

pub fn normalize_response(value: &Value) -> Result<NormalizedResponse, NormalizeError> {
    let outer = as_object(value)?;
    check_envelope_status(outer)?;

    let unwrapped;
    let payload = match outer.get("body") {
        Some(Value::String(encoded)) => {
            unwrapped = serde_json::from_str::<Value>(encoded)
                .map_err(|err| NormalizeError::InvalidEnvelope(err.to_string()))?;
            as_object(&unwrapped)?
        }
        _ => outer,
    };

    let session_id = ["video_id", "sessionId"]
        .iter()
        .find_map(|key| match payload.get(*key) {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        })
        .unwrap_or_default();

    let raw_clips: &[Value] = match payload.get("clips") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(_) => return Err(NormalizeError::ClipsNotAList),
    };

    let mut clips = Vec::with_capacity(raw_clips.len());
    let mut dropped = 0;
    for (index, raw) in raw_clips.iter().enumerate() {
        match normalize_clip(raw) {
            Some(clip) => clips.push(clip),
            None => {
                cw_warn!("dropping malformed clip at index {index}");
                dropped += 1;
            }
        }
    }

    cw_debug!(
        "normalized response session_id={session_id} clips={} dropped={dropped}",
        clips.len()
    );
    Ok(NormalizedResponse {
        session_id,
        clips,
        dropped,
    })
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, NormalizeError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(NormalizeError::NotAnObject("null")),
        Value::Bool(_) => Err(NormalizeError::NotAnObject("a boolean")),
        Value::Number(_) => Err(NormalizeError::NotAnObject("a number")),
        Value::String(_) => Err(NormalizeError::NotAnObject("a string")),
        Value::Array(_) => Err(NormalizeError::NotAnObject("an array")),
    }
}

/// The invocation envelope reports service failures with a non-2xx
/// `statusCode` and an `error` message inside `body`.
fn check_envelope_status(outer: &Map<String, Value>) -> Result<(), NormalizeError> {
    let Some(status) = outer.get("statusCode").and_then(Value::as_u64) else {
        return Ok(());
    };
    if (200..300).contains(&status) {
        return Ok(());
    }

    let inner = match outer.get("body") {
        Some(Value::String(encoded)) => serde_json::from_str::<Value>(encoded).ok(),
        Some(other) => Some(other.clone()),
        None => None,
    };
    let message = inner
        .as_ref()
        .and_then(|body| {
            body.get("error")
                .or_else(|| body.get("message"))
                .and_then(Value::as_str)
        })
        .unwrap_or("no details provided")
        .to_string();

    Err(NormalizeError::Rejected {
        status: u16::try_from(status).unwrap_or(u16::MAX),
        message,
    })
}

fn normalize_clip(raw: &Value) -> Option<Clip> {
    let raw = raw.as_object()?;

    let id = text_field(raw, "clip_id").filter(|id| !id.is_empty())?;
    let media_url = text_field(raw, "s3_url").filter(|url| !url.is_empty())?;
    let start_offset = number_field(raw, "start_time").filter(|v| *v >= 0.0)?;
    let end_offset = number_field(raw, "end_time")?;
    if end_offset <= start_offset {
        cw_debug!("clip {id} has an empty time range");
        return None;
    }
    let duration = number_field(raw, "duration")
        .filter(|v| *v > 0.0)
        .unwrap_or(end_offset - start_offset);

    let interest_reasons = match raw.get("interest_reasons") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    };

    let expires_at = parse_expiry(raw.get("expires_at"));
    if expires_at.is_none() && raw.get("expires_at").is_some_and(|v| !v.is_null()) {
        cw_warn!("clip {id} has an unreadable expires_at; treating as non-expiring");
    }

    Some(Clip {
        media_url: MediaUrl::new(media_url),
        start_offset,
        end_offset,
        duration,
        interest_score: canonical_score(number_field(raw, "interest_score").unwrap_or(0.0)),
        interest_reasons,
        transcript_excerpt: text_field(raw, "transcript_text").unwrap_or_default(),
        file_size_label: text_field(raw, "file_size_formatted").unwrap_or_default(),
        resolution_label: text_field(raw, "resolution").unwrap_or_default(),
        expires_at,
        id,
    })
}

fn text_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
}

/// Numbers may arrive as JSON numbers or as numeric strings.
fn number_field(raw: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match raw.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// Accepts RFC 3339, a naive ISO 8601 timestamp (taken as UTC) or unix seconds.
fn parse_expiry(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Number(number) => number
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        Value::String(text) => parse_expiry_text(text.trim()),
        _ => None,
    }
}

fn parse_expiry_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    text.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn expiry_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_expiry_text("2024-05-01T12:30:00"), Some(expected));
        assert_eq!(parse_expiry_text("2024-05-01T12:30:00.000000"), Some(expected));
        assert_eq!(parse_expiry_text("2024-05-01T14:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_expiry(Some(&json!(expected.timestamp()))),
            Some(expected)
        );
        assert_eq!(parse_expiry_text("tomorrow"), None);
        assert_eq!(parse_expiry(Some(&Value::Null)), None);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw = json!({"start_time": "1.5", "end_time": 4, "duration": true});
        let map = raw.as_object().unwrap();
        assert_eq!(number_field(map, "start_time"), Some(1.5));
        assert_eq!(number_field(map, "end_time"), Some(4.0));
        assert_eq!(number_field(map, "duration"), None);
        assert_eq!(number_field(map, "missing"), None);
    }

    #[test]
    fn duration_falls_back_to_range() {
        let raw = json!({
            "clip_id": "c1",
            "s3_url": "https://cdn.example.com/c1.mp4",
            "start_time": 10,
            "end_time": 25.5
        });
        let clip = normalize_clip(&raw).expect("clip");
        assert_eq!(clip.duration, 15.5);
        assert_eq!(clip.interest_score, 0.0);
        assert!(clip.interest_reasons.is_empty());
        assert_eq!(clip.expires_at, None);
    }

    #[test]
    fn inverted_range_is_dropped() {
        let raw = json!({
            "clip_id": "c1",
            "s3_url": "https://cdn.example.com/c1.mp4",
            "start_time": 30,
            "end_time": 10
        });
        assert!(normalize_clip(&raw).is_none());
    }
}

use std::borrow::Cow;

use url::Url;

use crate::InvalidInput;

/// Video hosts accepted for submission, without `www.`/`m.` prefixes.
pub const ALLOWED_VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "youtube-nocookie.com",
    "vimeo.com",
];

/// Checks that `input` plausibly names a video on a supported platform and
/// returns it in normalised form (scheme added when missing).
pub fn validate_video_url(input: &str) -> Result<String, InvalidInput> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput::Empty);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(InvalidInput::NotAUrl);
    }

    let candidate = if trimmed.contains("://") {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{trimmed}"))
    };
    let parsed = Url::parse(&candidate).map_err(|_| InvalidInput::NotAUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(InvalidInput::NotAUrl);
    }

    let host = parsed.host_str().ok_or(InvalidInput::NotAUrl)?;
    let bare_host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);
    if !ALLOWED_VIDEO_HOSTS.contains(&bare_host) {
        return Err(InvalidInput::UnsupportedHost {
            host: host.to_string(),
        });
    }

    let has_path = !parsed.path().trim_matches('/').is_empty();
    let has_query = parsed.query().is_some_and(|query| !query.is_empty());
    if !has_path && !has_query {
        return Err(InvalidInput::MissingVideo);
    }

    Ok(parsed.to_string())
}

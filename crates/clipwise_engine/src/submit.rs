use std::time::Duration;

use clipwise_logging::{cw_debug, cw_info};
use reqwest::header::ACCEPT;
use serde::Serialize;

use crate::fetch::{
    build_client, check_response, map_reqwest_error, parse_url, read_body_limited, HttpSettings,
};
use crate::FetchError;

/// Where and how submissions are sent. No retries; the timeouts are the only
/// bound on how long a submission can stay pending.
#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: String,
    pub http: HttpSettings,
}

impl SubmitSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/clip".to_string(),
            http: HttpSettings {
                connect_timeout: Duration::from_secs(10),
                // Processing downloads and cuts the whole video server-side.
                request_timeout: Duration::from_secs(300),
                redirect_limit: 5,
                max_bytes: 8 * 1024 * 1024,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    youtube_url: &'a str,
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Posts `video_url` to the clip service and returns the raw response body.
    async fn submit(&self, video_url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(&self, video_url: &str) -> Result<String, FetchError> {
        let endpoint = parse_url(&self.settings.endpoint)?;
        let client = build_client(&self.settings.http)?;
        cw_info!("POST {} url_len={}", endpoint, video_url.len());
        let response = client
            .post(endpoint)
            .header(ACCEPT, "application/json")
            .json(&SubmitRequest {
                youtube_url: video_url,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        check_response(&response, self.settings.http.max_bytes)?;
        let bytes = read_body_limited(response, self.settings.http.max_bytes).await?;
        cw_debug!("submission response bytes={}", bytes.len());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::app::ports::{LookupError, VideoMetadata, VideoMetadataPort};
use crate::config::EnrichmentConfig;
use crate::constants::MAX_IDS_PER_BATCH;
use crate::error::Result;
use crate::types::VideoId;

/// Error reasons the Data API uses for rejected or under-privileged credentials
const CREDENTIAL_REASONS: &[&str] = &[
    "keyInvalid",
    "forbidden",
    "accessNotConfigured",
    "insufficientPermissions",
    "authError",
];

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(rename = "categoryId")]
    category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    reason: Option<String>,
}

/// `videos.list` lookups against the YouTube Data API v3, keyed by an API key
pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(config: &EnrichmentConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn videos_url(&self) -> String {
        format!("{}/videos", self.base_url)
    }
}

#[async_trait]
impl VideoMetadataPort for YouTubeClient {
    #[instrument(skip(self, ids), fields(batch = ids.len()))]
    async fn lookup(
        &self,
        ids: &[VideoId],
    ) -> std::result::Result<Vec<VideoMetadata>, LookupError> {
        let joined = ids
            .iter()
            .map(VideoId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let max_results = MAX_IDS_PER_BATCH.to_string();

        let resp = self
            .client
            .get(self.videos_url())
            .query(&[
                ("part", "contentDetails,snippet"),
                ("id", joined.as_str()),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        debug!("videos.list responded {} ({} bytes)", status, body.len());

        if (200..300).contains(&status) {
            parse_video_list(&body)
        } else {
            Err(classify_failure(status, &body))
        }
    }
}

/// Decode a successful `videos.list` body
pub fn parse_video_list(body: &[u8]) -> std::result::Result<Vec<VideoMetadata>, LookupError> {
    let parsed: VideoListResponse = serde_json::from_slice(body).map_err(|e| LookupError::Status {
        status: 200,
        message: format!("Unreadable lookup response: {e}"),
    })?;

    Ok(parsed
        .items
        .into_iter()
        .map(|item| VideoMetadata {
            id: VideoId::new(item.id),
            duration: item
                .content_details
                .and_then(|c| c.duration)
                .unwrap_or_default(),
            category_id: item.snippet.and_then(|s| s.category_id).unwrap_or_default(),
        })
        .collect())
}

/// Turn a non-success response into a [`LookupError`], keeping the service's
/// own message verbatim when it sent one.
pub fn classify_failure(status: u16, body: &[u8]) -> LookupError {
    let envelope = serde_json::from_slice::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| format!("Lookup request failed with HTTP {status}"));

    let credential_reason = envelope.as_ref().is_some_and(|e| {
        e.error
            .errors
            .iter()
            .filter_map(|d| d.reason.as_deref())
            .any(|r| CREDENTIAL_REASONS.contains(&r))
    });

    let unauthorized = status == 401
        || (status == 403 && credential_reason)
        || message.to_lowercase().contains("api key");

    if unauthorized {
        LookupError::Unauthorized { message }
    } else {
        LookupError::Status { status, message }
    }
}

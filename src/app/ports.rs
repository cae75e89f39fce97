use crate::types::VideoId;
use async_trait::async_trait;
use thiserror::Error;

/// Metadata for one video as returned by a lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoMetadata {
    pub id: VideoId,
    /// Raw duration notation, e.g. `PT4M13S`
    pub duration: String,
    pub category_id: String,
}

/// Why a single lookup request failed
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// The request never produced a response (connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("lookup failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The service rejected the credential or its permissions
    #[error("credential rejected: {message}")]
    Unauthorized { message: String },
}

impl LookupError {
    /// Human-readable message suitable for showing to the user as-is
    pub fn message(&self) -> &str {
        match self {
            LookupError::Transport(message) => message,
            LookupError::Status { message, .. } => message,
            LookupError::Unauthorized { message } => message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LookupError::Unauthorized { .. })
    }
}

/// Batched video metadata lookup.
///
/// Implementations issue exactly one request per call; callers are
/// responsible for keeping `ids` within the service's per-request cap.
#[async_trait]
pub trait VideoMetadataPort: Send + Sync {
    async fn lookup(&self, ids: &[VideoId]) -> Result<Vec<VideoMetadata>, LookupError>;
}

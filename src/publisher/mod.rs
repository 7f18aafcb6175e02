//! Seam between the relay pipeline and the destination platform.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::misskey::DriveFile;

/// Opaque identifier returned by the media upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MediaId(pub String);

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a post-creation call, classified once at the client boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Success {
        id: String,
    },
    Failure {
        status: u16,
        /// Response body, when it parsed as JSON.
        body: Option<serde_json::Value>,
    },
}

impl PublishOutcome {
    /// Classify a `CreateTweet` response.
    ///
    /// Success requires HTTP 200 and a string at
    /// `data.create_tweet.tweet_results.result.rest_id`.
    pub fn classify(status: u16, body: &[u8]) -> Self {
        let json = serde_json::from_slice::<serde_json::Value>(body).ok();
        if status == 200
            && let Some(id) = json
                .as_ref()
                .and_then(|v| v.pointer("/data/create_tweet/tweet_results/result/rest_id"))
                .and_then(serde_json::Value::as_str)
        {
            return Self::Success { id: id.to_string() };
        }
        Self::Failure { status, body: json }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Destination platform operations the relay depends on.
///
/// `Err` from either method means the call itself failed (network, protocol,
/// or an upload rejected upstream). A post-creation response that arrived but
/// did not succeed is an `Ok(PublishOutcome::Failure { .. })`.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Fetch `file.url` and upload it, returning the platform's media id.
    async fn upload_media(&self, file: &DriveFile) -> anyhow::Result<MediaId>;

    /// Create a post with `text` and the given media, in order.
    async fn create_post(&self, text: &str, media_ids: &[MediaId])
    -> anyhow::Result<PublishOutcome>;
}

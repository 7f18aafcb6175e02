//! Cookie-session Twitter client: chunked media upload and GraphQL
//! `CreateTweet`.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::TwitterConfig;
use crate::misskey::DriveFile;
use crate::publisher::{MediaId, PublishOutcome, Publisher};
use crate::utils::http::{default_http_client, error_excerpt, read_capped};
use crate::utils::media::{media_category, needs_processing, validate_media_bytes};

/// Size of each `APPEND` segment.
const APPEND_CHUNK_BYTES: usize = 4 * 1024 * 1024;

/// Upper bound on `STATUS` polls while the upload is being processed.
const MAX_STATUS_POLLS: u32 = 60;

/// Wait used when the server asks for a retry without saying when.
const DEFAULT_CHECK_AFTER_SECS: u64 = 1;

/// Cap on a `CreateTweet` response body.
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    media_id_string: String,
    #[serde(default)]
    processing_info: Option<ProcessingInfo>,
}

#[derive(Debug, Deserialize)]
struct ProcessingInfo {
    state: String,
    #[serde(default)]
    check_after_secs: Option<u64>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

pub struct TwitterClient {
    client: Client,
    config: TwitterConfig,
}

impl TwitterClient {
    pub fn new(config: &TwitterConfig) -> Self {
        Self {
            client: default_http_client(),
            config: config.clone(),
        }
    }

    /// Attach the session cookies and the headers the web client sends.
    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.config.bearer_token)
            .header(
                reqwest::header::COOKIE,
                format!(
                    "auth_token={}; ct0={}",
                    self.config.auth_token, self.config.ct0
                ),
            )
            .header("x-csrf-token", &self.config.ct0)
            .header("x-twitter-auth-type", "OAuth2Session")
            .header("x-twitter-active-user", "yes")
    }

    async fn fetch_source(&self, file: &DriveFile) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(&file.url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", file.url))?;
        if !resp.status().is_success() {
            bail!("fetching {} returned {}", file.url, resp.status());
        }
        let bytes = read_capped(resp, self.config.max_media_bytes)
            .await
            .with_context(|| format!("failed to read {}", file.url))?;
        validate_media_bytes(&bytes, &file.mime_type)
            .with_context(|| format!("unusable media at {}", file.url))?;
        Ok(bytes)
    }

    async fn upload_command(&self, req: RequestBuilder, command: &str) -> Result<Response> {
        let resp = self
            .authed(req)
            .send()
            .await
            .with_context(|| format!("media upload {command} request failed"))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = error_excerpt(resp).await;
            bail!("media upload {} returned {}: {}", command, status, body);
        }
        Ok(resp)
    }

    async fn init(&self, total_bytes: usize, mime: &str) -> Result<String> {
        let total_bytes = total_bytes.to_string();
        let req = self.client.post(&self.config.upload_url).query(&[
            ("command", "INIT"),
            ("total_bytes", total_bytes.as_str()),
            ("media_type", mime),
            ("media_category", media_category(mime)),
        ]);
        let resp: UploadResponse = self
            .upload_command(req, "INIT")
            .await?
            .json()
            .await
            .context("malformed INIT response")?;
        Ok(resp.media_id_string)
    }

    async fn append(&self, media_id: &str, segment_index: usize, chunk: &[u8]) -> Result<()> {
        let segment_index = segment_index.to_string();
        let form = Form::new().part("media", Part::bytes(chunk.to_vec()).file_name("blob"));
        let req = self
            .client
            .post(&self.config.upload_url)
            .query(&[
                ("command", "APPEND"),
                ("media_id", media_id),
                ("segment_index", segment_index.as_str()),
            ])
            .multipart(form);
        self.upload_command(req, "APPEND").await?;
        Ok(())
    }

    async fn finalize(&self, media_id: &str) -> Result<UploadResponse> {
        let req = self
            .client
            .post(&self.config.upload_url)
            .query(&[("command", "FINALIZE"), ("media_id", media_id)]);
        self.upload_command(req, "FINALIZE")
            .await?
            .json()
            .await
            .context("malformed FINALIZE response")
    }

    async fn status(&self, media_id: &str) -> Result<UploadResponse> {
        let req = self
            .client
            .get(&self.config.upload_url)
            .query(&[("command", "STATUS"), ("media_id", media_id)]);
        self.upload_command(req, "STATUS")
            .await?
            .json()
            .await
            .context("malformed STATUS response")
    }

    /// Poll `STATUS` until server-side processing finishes.
    async fn wait_for_processing(&self, media_id: &str, mut info: ProcessingInfo) -> Result<()> {
        for _ in 0..MAX_STATUS_POLLS {
            match info.state.as_str() {
                "succeeded" => return Ok(()),
                "failed" => bail!(
                    "media {} processing failed: {}",
                    media_id,
                    info.error.map(|e| e.to_string()).unwrap_or_default()
                ),
                state => {
                    let wait = info.check_after_secs.unwrap_or(DEFAULT_CHECK_AFTER_SECS);
                    debug!("media {} is {}, checking again in {}s", media_id, state, wait);
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                }
            }
            match self.status(media_id).await?.processing_info {
                Some(next) => info = next,
                None => return Ok(()),
            }
        }
        bail!("media {} still processing after {} polls", media_id, MAX_STATUS_POLLS)
    }
}

#[async_trait]
impl Publisher for TwitterClient {
    async fn upload_media(&self, file: &DriveFile) -> Result<MediaId> {
        let bytes = self.fetch_source(file).await?;
        let media_id = self.init(bytes.len(), &file.mime_type).await?;
        for (index, chunk) in bytes.chunks(APPEND_CHUNK_BYTES).enumerate() {
            self.append(&media_id, index, chunk).await?;
        }
        let finalized = self.finalize(&media_id).await?;
        match finalized.processing_info {
            Some(info) => self.wait_for_processing(&media_id, info).await?,
            None if needs_processing(&file.mime_type) => {
                warn!("media {} finalized without processing info", media_id);
            }
            None => {}
        }
        debug!(
            "uploaded {} ({} bytes) as media {}",
            file.url,
            bytes.len(),
            media_id
        );
        Ok(MediaId(media_id))
    }

    async fn create_post(&self, text: &str, media_ids: &[MediaId]) -> Result<PublishOutcome> {
        let query_id = &self.config.create_tweet_query_id;
        let url = format!(
            "{}/{}/CreateTweet",
            self.config.graphql_url.trim_end_matches('/'),
            query_id
        );
        let resp = self
            .authed(self.client.post(&url))
            .json(&create_tweet_body(text, media_ids, query_id))
            .send()
            .await
            .context("CreateTweet request failed")?;
        let status = resp.status().as_u16();
        let body = read_capped(resp, MAX_RESPONSE_BYTES).await?;
        Ok(PublishOutcome::classify(status, &body))
    }
}

/// Request body for the `CreateTweet` GraphQL mutation.
fn create_tweet_body(text: &str, media_ids: &[MediaId], query_id: &str) -> serde_json::Value {
    let media_entities: Vec<_> = media_ids
        .iter()
        .map(|id| json!({"media_id": id, "tagged_users": []}))
        .collect();
    json!({
        "variables": {
            "tweet_text": text,
            "dark_request": false,
            "media": {
                "media_entities": media_entities,
                "possibly_sensitive": false
            },
            "semantic_annotation_ids": []
        },
        "features": {
            "communities_web_enable_tweet_community_results_fetch": true,
            "c9s_tweet_anatomy_moderator_badge_enabled": true,
            "tweetypie_unmention_optimization_enabled": true,
            "responsive_web_edit_tweet_api_enabled": true,
            "graphql_is_translatable_rweb_tweet_is_translatable_enabled": true,
            "view_counts_everywhere_api_enabled": true,
            "longform_notetweets_consumption_enabled": true,
            "responsive_web_twitter_article_tweet_consumption_enabled": true,
            "tweet_awards_web_tipping_enabled": false,
            "creator_subscriptions_quote_tweet_preview_enabled": false,
            "longform_notetweets_rich_text_read_enabled": true,
            "longform_notetweets_inline_media_enabled": true,
            "articles_preview_enabled": true,
            "rweb_video_timestamps_enabled": true,
            "rweb_tipjar_consumption_enabled": true,
            "responsive_web_graphql_exclude_directive_enabled": true,
            "verified_phone_label_enabled": false,
            "freedom_of_speech_not_reach_fetch_enabled": true,
            "standardized_nudges_misinfo": true,
            "tweet_with_visibility_results_prefer_gql_limited_actions_policy_enabled": true,
            "responsive_web_graphql_skip_user_profile_image_extensions_enabled": false,
            "responsive_web_graphql_timeline_navigation_enabled": true,
            "responsive_web_enhance_cards_enabled": false
        },
        "queryId": query_id
    })
}

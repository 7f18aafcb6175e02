//! The note-to-tweet pipeline.
//!
//! One call to [`Relay::handle`] per webhook delivery: authenticate, parse,
//! check visibility, plan attachments, compose, upload, publish. Every
//! decision is logged; every failure comes back as a [`RelayError`].

pub mod composer;
pub mod filter;
pub mod planner;

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info, warn};

use crate::config::{Config, VideoStrategy};
use crate::errors::{RelayError, RelayResult};
use crate::misskey::Payload;
use crate::publisher::{PublishOutcome, Publisher};
use crate::utils::quote_lines;

/// What a successful relay produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relayed {
    pub post_id: String,
    pub message: String,
    pub uploaded: usize,
    pub linked: usize,
}

pub struct Relay {
    webhook_secret: String,
    video_strategy: VideoStrategy,
    publisher: Arc<dyn Publisher>,
}

impl Relay {
    pub fn new(config: &Config, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            webhook_secret: config.misskey.webhook_secret.clone(),
            video_strategy: config.relay.video_strategy,
            publisher,
        }
    }

    /// Process one webhook delivery.
    ///
    /// `provided_secret` is the raw secret header, `body` the raw request body.
    pub async fn handle(&self, provided_secret: Option<&str>, body: &[u8]) -> RelayResult<Relayed> {
        let result = self.process(provided_secret, body).await;
        if let Err(e) = &result
            && e.is_rejection()
        {
            info!("{}", e);
        }
        result
    }

    async fn process(&self, provided_secret: Option<&str>, body: &[u8]) -> RelayResult<Relayed> {
        filter::authenticate(&self.webhook_secret, provided_secret)?;

        let payload: Payload = serde_json::from_slice(body)
            .map_err(|e| RelayError::InvalidPayload(e.to_string()))?;
        debug!(
            "webhook event={} hook={}",
            payload.event.as_deref().unwrap_or("?"),
            payload.hook_id.as_deref().unwrap_or("?")
        );
        let note = payload.body.note;
        filter::check_visibility(&note)?;
        info!(
            "relaying {} note with {} file(s)",
            note.visibility,
            note.files().len()
        );

        let plan = planner::plan_media(note.files(), self.video_strategy);
        if !plan.dropped.is_empty() {
            let dropped = plan
                .dropped
                .iter()
                .map(|f| format!("{} ({})", f.url, f.mime_type))
                .collect::<Vec<_>>()
                .join("\n");
            warn!(
                "{} attachment(s) neither uploaded nor linked\n{}",
                plan.dropped.len(),
                quote_lines(&dropped)
            );
        }

        let message = composer::compose(
            note.cw.as_deref(),
            note.text.as_deref(),
            &plan.to_link_only,
        );
        if message.is_empty() {
            return Err(RelayError::EmptyContent);
        }

        let media_ids = try_join_all(
            plan.to_upload
                .iter()
                .map(|file| self.publisher.upload_media(file)),
        )
        .await
        .map_err(|e| {
            warn!(
                "error while uploading media: {:#}\n{}",
                e,
                quote_lines(&message)
            );
            RelayError::Upload(format!("{:#}", e))
        })?;
        debug!("uploaded {} media item(s)", media_ids.len());

        let outcome = self
            .publisher
            .create_post(&message, &media_ids)
            .await
            .map_err(|e| {
                warn!("error while tweeting: {:#}\n{}", e, quote_lines(&message));
                RelayError::PublishRequest(format!("{:#}", e))
            })?;

        match outcome {
            PublishOutcome::Success { id } => {
                info!("successfully tweeted\n{}", quote_lines(&message));
                Ok(Relayed {
                    post_id: id,
                    message,
                    uploaded: media_ids.len(),
                    linked: plan.to_link_only.len(),
                })
            }
            PublishOutcome::Failure { status, body } => {
                warn!("error while tweeting\n{}", quote_lines(&message));
                warn!("Status\n{}", quote_lines(&status.to_string()));
                if let Some(json) = &body {
                    let pretty =
                        serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());
                    warn!("Error\n{}", quote_lines(&pretty));
                }
                Err(RelayError::Publish { status, body })
            }
        }
    }
}

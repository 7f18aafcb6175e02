use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::RelayError;

/// Generates a `Debug` impl that redacts secret fields.
///
/// Field specifiers:
/// - `field_name`            : printed normally via `&self.field_name`
/// - `redact(field_name)`    : `String` field: shows `[empty]` or `[REDACTED]`
macro_rules! redact_debug {
    // Internal: emit a single .field() call
    (@field $builder:ident, $self:ident, redact($field:ident)) => {
        $builder.field(
            stringify!($field),
            &if $self.$field.is_empty() {
                "[empty]"
            } else {
                "[REDACTED]"
            },
        );
    };
    (@field $builder:ident, $self:ident, $field:ident) => {
        $builder.field(stringify!($field), &$self.$field);
    };

    // Internal: recursive TT muncher
    (@fields $builder:ident, $self:ident,) => {};
    (@fields $builder:ident, $self:ident, redact($field:ident), $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, redact($field));
        redact_debug!(@fields $builder, $self, $($rest)*);
    };
    (@fields $builder:ident, $self:ident, $field:ident, $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, $field);
        redact_debug!(@fields $builder, $self, $($rest)*);
    };

    // Entry point
    ($struct_name:ident, $($fields:tt)*) => {
        impl std::fmt::Debug for $struct_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut builder = f.debug_struct(stringify!($struct_name));
                redact_debug!(@fields builder, self, $($fields)*);
                builder.finish()
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Misskey (inbound)
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct MisskeyConfig {
    /// Expected value of the `X-Misskey-Hook-Secret` header.
    #[serde(default, rename = "webhookSecret")]
    pub webhook_secret: String,
}

redact_debug!(MisskeyConfig, redact(webhook_secret),);

// ---------------------------------------------------------------------------
// Twitter (outbound)
// ---------------------------------------------------------------------------

/// Bearer token embedded in the public web client; session cookies carry the
/// actual account authority.
pub const WEB_BEARER_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

fn default_bearer_token() -> String {
    WEB_BEARER_TOKEN.to_string()
}

fn default_upload_url() -> String {
    "https://upload.twitter.com/i/media/upload.json".to_string()
}

fn default_graphql_url() -> String {
    "https://x.com/i/api/graphql".to_string()
}

fn default_create_tweet_query_id() -> String {
    "oB-5XsHNAbjvARJEc8CZFw".to_string()
}

fn default_max_media_bytes() -> usize {
    crate::utils::media::MAX_MEDIA_SIZE
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// `auth_token` session cookie.
    #[serde(default, rename = "authToken")]
    pub auth_token: String,
    /// `ct0` CSRF cookie, echoed back in `x-csrf-token`.
    #[serde(default)]
    pub ct0: String,
    #[serde(default = "default_bearer_token", rename = "bearerToken")]
    pub bearer_token: String,
    #[serde(default = "default_upload_url", rename = "uploadUrl")]
    pub upload_url: String,
    #[serde(default = "default_graphql_url", rename = "graphqlUrl")]
    pub graphql_url: String,
    #[serde(
        default = "default_create_tweet_query_id",
        rename = "createTweetQueryId"
    )]
    pub create_tweet_query_id: String,
    /// Largest source file the relay will download for upload.
    #[serde(default = "default_max_media_bytes", rename = "maxMediaBytes")]
    pub max_media_bytes: usize,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            ct0: String::new(),
            bearer_token: default_bearer_token(),
            upload_url: default_upload_url(),
            graphql_url: default_graphql_url(),
            create_tweet_query_id: default_create_tweet_query_id(),
            max_media_bytes: default_max_media_bytes(),
        }
    }
}

redact_debug!(
    TwitterConfig,
    redact(auth_token),
    redact(ct0),
    redact(bearer_token),
    upload_url,
    graphql_url,
    create_tweet_query_id,
    max_media_bytes,
);

// ---------------------------------------------------------------------------
// Relay behaviour
// ---------------------------------------------------------------------------

/// Which attachment takes the single upload slot when a note carries video.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStrategy {
    /// Upload the first image; link every image and every video after the
    /// first. The first video is neither uploaded nor linked.
    #[default]
    Compat,
    /// Upload the first video; link every image and every later video.
    PreferVideo,
}

impl std::fmt::Display for VideoStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compat => write!(f, "compat"),
            Self::PreferVideo => write!(f, "prefer_video"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelayConfig {
    #[serde(default, rename = "videoStrategy")]
    pub video_strategy: VideoStrategy,
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub misskey: MisskeyConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), RelayError> {
        self.validate_server()?;
        self.validate_twitter()?;
        if self.misskey.webhook_secret.is_empty() {
            warn!("misskey.webhookSecret is empty; only requests without a secret header will pass");
        }
        Ok(())
    }

    fn validate_server(&self) -> Result<(), RelayError> {
        if self.server.port == 0 {
            return Err(RelayError::Config("server.port must be > 0".into()));
        }
        if self.server.host.trim().is_empty() {
            return Err(RelayError::Config("server.host must not be empty".into()));
        }
        Ok(())
    }

    fn validate_twitter(&self) -> Result<(), RelayError> {
        let t = &self.twitter;
        validate_http_url("twitter.uploadUrl", &t.upload_url)?;
        validate_http_url("twitter.graphqlUrl", &t.graphql_url)?;
        if t.create_tweet_query_id.is_empty() {
            return Err(RelayError::Config(
                "twitter.createTweetQueryId must not be empty".into(),
            ));
        }
        if t.max_media_bytes == 0 {
            return Err(RelayError::Config(
                "twitter.maxMediaBytes must be > 0".into(),
            ));
        }
        if t.auth_token.is_empty() || t.ct0.is_empty() {
            warn!("twitter.authToken or twitter.ct0 is empty; publishing will fail");
        }
        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), RelayError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| RelayError::Config(format!("{field} is not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(RelayError::Config(format!(
            "{field} must use http or https, got {}",
            parsed.scheme()
        )));
    }
    Ok(())
}

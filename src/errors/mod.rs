use thiserror::Error;

/// Typed error hierarchy for noterelay.
///
/// The request-path variants map one-to-one onto the relay's rejection
/// reasons; every one of them is answered with `403` and [`RelayError::reply`].
/// Internal/leaf functions can continue using `anyhow::Result`; the `Internal`
/// variant allows seamless conversion via the `?` operator.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("wrong secret")]
    WrongSecret,

    #[error("post visibility: \"local only\"")]
    LocalOnly,

    #[error("post visibility: \"{0}\"")]
    Visibility(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("empty content")]
    EmptyContent,

    #[error("media upload failed: {0}")]
    Upload(String),

    #[error("publish failed with status {status}")]
    Publish {
        status: u16,
        body: Option<serde_json::Value>,
    },

    #[error("publish request failed: {0}")]
    PublishRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience alias for results using `RelayError`.
pub type RelayResult<T> = std::result::Result<T, RelayError>;

impl RelayError {
    /// Short plain-text body returned to the webhook caller.
    pub fn reply(&self) -> String {
        match self {
            Self::WrongSecret | Self::LocalOnly | Self::Visibility(_) | Self::EmptyContent => {
                self.to_string()
            }
            Self::InvalidPayload(_) => "invalid payload".to_string(),
            Self::Upload(_) => "error while uploading media".to_string(),
            Self::Publish { .. } | Self::PublishRequest(_) => "error while tweeting".to_string(),
            Self::Config(_) | Self::Internal(_) => "internal error".to_string(),
        }
    }

    /// Whether the event was turned away before any outbound call was made.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::WrongSecret
                | Self::LocalOnly
                | Self::Visibility(_)
                | Self::InvalidPayload(_)
                | Self::EmptyContent
        )
    }
}

#[cfg(test)]
mod tests;

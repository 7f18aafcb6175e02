//! Misskey webhook payload types.
//!
//! Only the parts of the `note` event that the relay acts on are modelled;
//! everything else in the payload is ignored during deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Header carrying the webhook secret configured on the Misskey side.
pub const SECRET_HEADER: &str = "X-Misskey-Hook-Secret";

/// Top-level webhook payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Event type, e.g. `note`.
    #[serde(default, rename = "type")]
    pub event: Option<String>,
    #[serde(default)]
    pub hook_id: Option<String>,
    pub body: PayloadBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadBody {
    pub note: Note,
}

/// The note (post) the event is about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default)]
    pub text: Option<String>,
    /// Content warning.
    #[serde(default)]
    pub cw: Option<String>,
    pub visibility: Visibility,
    #[serde(default)]
    pub local_only: Option<bool>,
    #[serde(default)]
    pub files: Option<Vec<DriveFile>>,
}

impl Note {
    pub fn is_local_only(&self) -> bool {
        self.local_only.unwrap_or(false)
    }

    /// Attached files in attachment order; absent and `null` both read as empty.
    pub fn files(&self) -> &[DriveFile] {
        self.files.as_deref().unwrap_or_default()
    }
}

/// A drive file attached to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFile {
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Note visibility. Unknown values are preserved so rejections can name them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Visibility {
    Public,
    Home,
    Followers,
    Specified,
    Other(String),
}

impl Visibility {
    /// Whether a note with this visibility may leave the instance.
    pub fn is_relayable(&self) -> bool {
        matches!(self, Self::Public | Self::Home)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Public => "public",
            Self::Home => "home",
            Self::Followers => "followers",
            Self::Specified => "specified",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Visibility {
    fn from(s: String) -> Self {
        match s.as_str() {
            "public" => Self::Public,
            "home" => Self::Home,
            "followers" => Self::Followers,
            "specified" => Self::Specified,
            _ => Self::Other(s),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

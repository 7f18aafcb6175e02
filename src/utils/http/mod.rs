use anyhow::{Result, bail};
use reqwest::{Client, Response};
use std::time::Duration;

/// Cap on how much of an error response body is kept for logging.
pub const ERROR_EXCERPT_BYTES: usize = 2048;

/// Build a `reqwest::Client` with standard timeouts (10 s connect, 30 s overall).
///
/// Falls back to the default client if the builder fails.
pub fn default_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(format!("noterelay/{}", crate::VERSION))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Read a full response body, failing once it grows past `max_bytes`.
///
/// Checks the `Content-Length` header first, then streams via `chunk()` with a
/// running counter. Media must arrive whole, so there is no truncation mode.
pub async fn read_capped(resp: Response, max_bytes: usize) -> Result<Vec<u8>> {
    if let Some(cl) = resp.content_length()
        && cl > max_bytes as u64
    {
        bail!(
            "response body too large: Content-Length {} exceeds limit {}",
            cl,
            max_bytes
        );
    }

    let mut buf = Vec::new();
    let mut stream = resp;
    while let Some(chunk) = stream.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            bail!("response body too large: exceeds limit {}", max_bytes);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Lossy UTF-8 excerpt of a response body for error messages.
///
/// Never fails; an unreadable body yields an empty string.
pub async fn error_excerpt(resp: Response) -> String {
    let mut buf = Vec::new();
    let mut stream = resp;
    while let Ok(Some(chunk)) = stream.chunk().await {
        let remaining = ERROR_EXCERPT_BYTES.saturating_sub(buf.len());
        if chunk.len() >= remaining {
            buf.extend_from_slice(&chunk[..remaining]);
            let mut text = String::from_utf8_lossy(&buf).into_owned();
            text.push_str("\n[truncated]");
            return text;
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

use anyhow::{Result, bail};

pub const MAX_MEDIA_SIZE: usize = 20 * 1024 * 1024; // 20MB

/// Twitter `media_category` for an upload of the given MIME type.
pub fn media_category(mime: &str) -> &'static str {
    if mime == "image/gif" {
        "tweet_gif"
    } else if mime.starts_with("video/") {
        "tweet_video"
    } else {
        "tweet_image"
    }
}

/// Whether uploads of this MIME type are processed asynchronously and need
/// `STATUS` polling after `FINALIZE`.
pub fn needs_processing(mime: &str) -> bool {
    media_category(mime) != "tweet_image"
}

/// Sanity-check downloaded bytes before pushing them upstream.
///
/// Rejects empty bodies and image types whose bytes carry no image signature
/// (typically an HTML error page served with a 200).
pub fn validate_media_bytes(bytes: &[u8], mime: &str) -> Result<()> {
    if bytes.is_empty() {
        bail!("empty media data");
    }
    if mime.starts_with("image/") && !is_image_magic_bytes(bytes) {
        bail!("data does not match expected image format for {}", mime);
    }
    Ok(())
}

/// Check if bytes start with known image magic bytes.
pub fn is_image_magic_bytes(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }
    // PNG: 89 50 4E 47
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return true;
    }
    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return true;
    }
    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF8") {
        return true;
    }
    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return true;
    }
    false
}

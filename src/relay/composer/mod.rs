use crate::misskey::DriveFile;

/// Marker for linked image-like attachments.
pub const IMAGE_GLYPH: &str = "🖼";

/// Marker for every other linked attachment.
pub const FILE_GLYPH: &str = "📄";

/// Suffix appended to a content warning before the body.
const CW_SEPARATOR: &str = "...\n\n";

pub fn glyph_for(mime: &str) -> &'static str {
    if mime.contains("image") {
        IMAGE_GLYPH
    } else {
        FILE_GLYPH
    }
}

/// One link line, including its leading newline.
pub fn link_line(file: &DriveFile) -> String {
    format!("\n{} {}", glyph_for(&file.mime_type), file.url)
}

/// Build the post text: content warning, body, then one line per linked file.
///
/// Empty `cw`/`text` count as absent. The result may be empty; callers
/// reject that case.
pub fn compose(cw: Option<&str>, text: Option<&str>, links: &[&DriveFile]) -> String {
    let mut out = String::new();
    if let Some(cw) = cw.filter(|c| !c.is_empty()) {
        out.push_str(cw);
        out.push_str(CW_SEPARATOR);
    }
    out.push_str(text.unwrap_or_default());
    for file in links {
        out.push_str(&link_line(file));
    }
    out
}

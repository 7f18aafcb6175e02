//! Attachment planning.
//!
//! Twitter accepts either up to four images or a single video/GIF per post.
//! The planner decides which Misskey attachments fit into that slot budget
//! and which ones are degraded to links in the post text.

use serde::Serialize;

use crate::config::VideoStrategy;
use crate::misskey::DriveFile;

/// Most images a single tweet may carry.
pub const MAX_IMAGES: usize = 4;

/// Most video-class attachments a single tweet may carry.
pub const MAX_VIDEOS: usize = 1;

/// How an attachment is treated by the destination's media rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaClass {
    /// `image/jpeg`, `image/png`, `image/webp`.
    Image,
    /// `image/gif`, `video/mp4`.
    Video,
    Other,
}

impl MediaClass {
    pub fn of(mime: &str) -> Self {
        match mime {
            "image/jpeg" | "image/png" | "image/webp" => Self::Image,
            "image/gif" | "video/mp4" => Self::Video,
            _ => Self::Other,
        }
    }
}

/// Whether an unclassified attachment is rendered as a link.
///
/// Anything image-like that is not uploadable (`image/svg+xml`, `image/avif`,
/// ...) is not linked, and `video/mp4` is always handled by the video rule.
fn is_linkable_other(mime: &str) -> bool {
    !(mime.contains("image") || mime == "video/mp4")
}

/// Outcome of planning: which attachments to upload, which to link.
///
/// Every input attachment appears in at least one list. Under
/// [`VideoStrategy::Compat`] the uploaded image of a video-bearing note is also
/// linked, and the first video lands in `dropped`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaPlan<'a> {
    pub to_upload: Vec<&'a DriveFile>,
    pub to_link_only: Vec<&'a DriveFile>,
    pub dropped: Vec<&'a DriveFile>,
}

impl MediaPlan<'_> {
    pub fn is_empty(&self) -> bool {
        self.to_upload.is_empty() && self.to_link_only.is_empty() && self.dropped.is_empty()
    }
}

/// Partition `files` into upload, link-only and dropped sets.
pub fn plan_media(files: &[DriveFile], strategy: VideoStrategy) -> MediaPlan<'_> {
    let of_class = |class: MediaClass| -> Vec<usize> {
        files
            .iter()
            .enumerate()
            .filter(|(_, f)| MediaClass::of(&f.mime_type) == class)
            .map(|(i, _)| i)
            .collect()
    };
    let images = of_class(MediaClass::Image);
    let videos = of_class(MediaClass::Video);

    let (upload, mut link): (Vec<usize>, Vec<usize>) = if videos.is_empty() {
        let split = images.len().min(MAX_IMAGES);
        (images[..split].to_vec(), images[split..].to_vec())
    } else {
        let later_videos = videos.iter().skip(MAX_VIDEOS).copied();
        match strategy {
            VideoStrategy::Compat => (
                images.iter().take(1).copied().collect(),
                images.iter().copied().chain(later_videos).collect(),
            ),
            VideoStrategy::PreferVideo => (
                videos[..MAX_VIDEOS].to_vec(),
                images.iter().copied().chain(later_videos).collect(),
            ),
        }
    };

    link.extend(
        files
            .iter()
            .enumerate()
            .filter(|(_, f)| is_linkable_other(&f.mime_type))
            .map(|(i, _)| i),
    );

    let dropped = (0..files.len())
        .filter(|i| !upload.contains(i) && !link.contains(i))
        .collect::<Vec<_>>();

    let pick = |indices: &[usize]| indices.iter().map(|&i| &files[i]).collect::<Vec<_>>();
    MediaPlan {
        to_upload: pick(&upload),
        to_link_only: pick(&link),
        dropped: pick(&dropped),
    }
}

//! Storage directory layout.
//!
//! The storage directory is flat: every acquired video lives directly inside
//! it as `<id>.mp4`.

use std::path::{Path, PathBuf};

use crate::OutputId;

/// Extension of every stored video file.
pub const VIDEO_EXTENSION: &str = "mp4";

/// MIME type served for stored videos.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Path of the video backing `id` inside `dir`.
pub fn video_path(dir: &Path, id: &OutputId) -> PathBuf {
    dir.join(id.file_name())
}

/// Path yt-dlp writes while a download is still in progress.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

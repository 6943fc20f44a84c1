//! External tool detection.

use crate::{Error, Result, YTDLP};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// First line of the version output, if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool runs with `version_arg` and record its version and path.
///
/// # Example
///
/// ```no_run
/// use reelcast_fetch::check_tool;
///
/// let info = check_tool("yt-dlp", "--version");
/// if info.available {
///     println!("yt-dlp version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str, version_arg: &str) -> ToolInfo {
    let result = Command::new(name).arg(version_arg).output();

    match result {
        Ok(output) if output.status.success() => ToolInfo {
            name: name.to_string(),
            available: true,
            version: String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string()),
            path: which::which(name).ok(),
        },
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check the tools an acquisition needs.
///
/// yt-dlp does the download; ffmpeg merges separate video and audio streams.
pub fn check_tools() -> Vec<ToolInfo> {
    vec![
        check_tool(YTDLP, "--version"),
        check_tool("ffmpeg", "-version"),
    ]
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if neither yields an executable.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "Configured {} path {:?} does not exist, falling back to PATH",
            name,
            path
        );
    }

    which::which(name).map_err(|_| Error::tool_not_found(name))
}

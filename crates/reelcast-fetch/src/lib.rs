//! # reelcast-fetch
//!
//! Invocation of the external fetch tool that turns a remote media URL into a
//! local file.
//!
//! This crate provides:
//! - Tool discovery (`yt-dlp`, and `ffmpeg` for the merge step)
//! - A cancellable async subprocess builder, [`ToolCommand`]
//! - The quality-tier to format-selector mapping, [`format_selector`]
//! - The [`Fetcher`] seam and its production implementation, [`YtDlpFetcher`]
//!
//! ## Example
//!
//! ```no_run
//! use reelcast_common::QualityTier;
//! use reelcast_fetch::{FetchJob, Fetcher, YtDlpFetcher};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> reelcast_fetch::Result<()> {
//! let fetcher = YtDlpFetcher::discover(None)?;
//! let job = FetchJob::new(
//!     "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!     QualityTier::P720,
//!     "videos/video_1.mp4",
//! );
//! let status = fetcher.fetch(&job, None, &CancellationToken::new()).await?;
//! println!("success: {}", status.success());
//! # Ok(())
//! # }
//! ```

mod command;
mod error;
mod fetcher;
pub mod format;
pub mod tools;

// Re-exports
pub use command::ToolCommand;
pub use error::{Error, Result};
pub use fetcher::{FetchJob, Fetcher, YtDlpConfig, YtDlpFetcher, YTDLP};
pub use format::format_selector;
pub use tools::{check_tool, check_tools, get_tool_path, ToolInfo};

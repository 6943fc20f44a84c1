//! The fetch seam and its yt-dlp implementation.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use async_trait::async_trait;
use reelcast_common::{QualityTier, Relay};
use tokio_util::sync::CancellationToken;

use crate::format::format_selector;
use crate::tools::get_tool_path;
use crate::{Result, ToolCommand};

/// Binary name of the fetch tool.
pub const YTDLP: &str = "yt-dlp";

/// One invocation's worth of fetch parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    /// Remote resource to fetch (opaque URL).
    pub source: String,
    /// Requested quality tier.
    pub quality: QualityTier,
    /// Where the merged output must be written.
    pub destination: PathBuf,
}

impl FetchJob {
    pub fn new(
        source: impl Into<String>,
        quality: QualityTier,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            quality,
            destination: destination.into(),
        }
    }
}

/// Something that can turn a [`FetchJob`] into a file on disk.
///
/// Returning `Ok` means the process ran to completion; the exit status says
/// whether it reported success. Returning `Err` means it could not be run,
/// was cancelled, or timed out.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        job: &FetchJob,
        relay: Option<&Relay>,
        cancel: &CancellationToken,
    ) -> Result<ExitStatus>;
}

/// Settings for the yt-dlp fetcher.
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    /// Resolved path to the yt-dlp binary.
    pub program: PathBuf,
    /// Extra arguments inserted before the source URL.
    pub extra_args: Vec<String>,
    /// Per-invocation timeout.
    pub timeout: Duration,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(YTDLP),
            extra_args: Vec::new(),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// [`Fetcher`] backed by the yt-dlp command line tool.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    config: YtDlpConfig,
}

impl YtDlpFetcher {
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }

    /// Locate yt-dlp (configured path first, then PATH) with default settings.
    pub fn discover(configured: Option<&Path>) -> Result<Self> {
        let program = get_tool_path(YTDLP, configured)?;
        Ok(Self::new(YtDlpConfig {
            program,
            ..YtDlpConfig::default()
        }))
    }

    pub fn config(&self) -> &YtDlpConfig {
        &self.config
    }

    /// Assemble the full argument vector for one invocation.
    pub fn build_args(&self, job: &FetchJob, relay: Option<&Relay>) -> Vec<String> {
        let mut args = Vec::with_capacity(14 + self.config.extra_args.len());

        if let Some(relay) = relay {
            args.push("--proxy".to_string());
            args.push(relay.proxy_url());
        }

        args.extend(
            [
                "--no-check-certificates",
                "--extractor-args",
                "youtube:player_client=android,web",
                "-f",
            ]
            .map(String::from),
        );
        args.push(format_selector(job.quality));
        args.push("--merge-output-format".to_string());
        args.push("mp4".to_string());
        args.push("-o".to_string());
        args.push(job.destination.to_string_lossy().to_string());
        args.extend(self.config.extra_args.iter().cloned());
        args.push(job.source.clone());

        args
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    async fn fetch(
        &self,
        job: &FetchJob,
        relay: Option<&Relay>,
        cancel: &CancellationToken,
    ) -> Result<ExitStatus> {
        let mut cmd = ToolCommand::new(self.config.program.clone());
        cmd.timeout(self.config.timeout);
        cmd.args(self.build_args(job, relay));

        tracing::debug!("Running {} {:?}", YTDLP, cmd.get_args());

        cmd.run(cancel).await
    }
}

//! Retry orchestration across relays.

use reelcast_common::paths::{partial_path, video_path};
use reelcast_common::{OutputId, QualityTier, Relay};
use reelcast_fetch::{FetchJob, Fetcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{AcquisitionFailed, AttemptError, AttemptFailure};
use crate::relay::RelayPool;
use crate::store::StoredFile;

/// Default number of relay-backed attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// One incoming request for a video.
#[derive(Debug, Clone)]
pub struct AcquisitionRequest {
    /// Remote resource identifier (opaque URL).
    pub source: String,
    pub quality: QualityTier,
    /// Identifier the stored file will be known by.
    pub id: OutputId,
    /// Where the fetch tool must write the file.
    pub destination: PathBuf,
}

impl AcquisitionRequest {
    /// Build a request with a fresh output ID under `storage_dir`.
    pub fn new(source: impl Into<String>, quality: QualityTier, storage_dir: &Path) -> Self {
        let id = OutputId::generate();
        let destination = video_path(storage_dir, &id);
        Self {
            source: source.into(),
            quality,
            id,
            destination,
        }
    }

    fn fetch_job(&self) -> FetchJob {
        FetchJob::new(self.source.clone(), self.quality, self.destination.clone())
    }
}

/// Drives the fetch tool for one request at a time.
///
/// Cloning is cheap: the fetcher and relay pool are shared.
#[derive(Clone)]
pub struct Acquirer {
    fetcher: Arc<dyn Fetcher>,
    relays: RelayPool,
    max_attempts: u32,
}

impl Acquirer {
    pub fn new(fetcher: Arc<dyn Fetcher>, relays: RelayPool, max_attempts: u32) -> Self {
        Self {
            fetcher,
            relays,
            max_attempts,
        }
    }

    pub fn relays(&self) -> &RelayPool {
        &self.relays
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Acquire the requested media.
    ///
    /// Makes up to `max_attempts` attempts, each through the next relay in
    /// rotation (or direct when the pool is empty), returning on the first
    /// success. If they all fail, one last attempt goes direct. An attempt
    /// succeeds only if the tool exits successfully *and* the destination
    /// file exists afterwards.
    ///
    /// When `cancel` fires, the running tool is killed, no further attempts
    /// are made, and any partial output is removed.
    pub async fn acquire(
        &self,
        request: &AcquisitionRequest,
        cancel: &CancellationToken,
    ) -> Result<StoredFile, AcquisitionFailed> {
        let job = request.fetch_job();
        let total = self.max_attempts + 1;
        let mut attempts = Vec::with_capacity(total as usize);

        tracing::info!(
            video_id = %request.id,
            source = %request.source,
            quality = %request.quality,
            "Starting acquisition"
        );

        for attempt in 1..=total {
            let relay = if attempt <= self.max_attempts {
                self.relays.next()
            } else {
                tracing::info!(video_id = %request.id, "Trying direct connection");
                None
            };

            let error = if cancel.is_cancelled() {
                AttemptError::Cancelled
            } else {
                match self.attempt(request, &job, relay.as_ref(), attempt, total, cancel).await {
                    Ok(file) => {
                        tracing::info!(
                            video_id = %request.id,
                            attempt,
                            size_mb = %format!("{:.2}", file.size() as f64 / 1024.0 / 1024.0),
                            "Acquisition succeeded"
                        );
                        return Ok(file);
                    }
                    Err(error) => error,
                }
            };

            tracing::warn!(
                video_id = %request.id,
                attempt,
                relay = ?relay.map(|r| r.to_string()),
                "Attempt failed: {}",
                error
            );

            let cancelled = error == AttemptError::Cancelled;
            attempts.push(AttemptFailure {
                attempt,
                relay,
                error,
            });

            if cancelled {
                remove_partial_output(&request.destination).await;
                return Err(AcquisitionFailed::Cancelled { attempts });
            }
        }

        remove_partial_output(&request.destination).await;
        Err(AcquisitionFailed::Exhausted { attempts })
    }

    async fn attempt(
        &self,
        request: &AcquisitionRequest,
        job: &FetchJob,
        relay: Option<&Relay>,
        attempt: u32,
        total: u32,
        cancel: &CancellationToken,
    ) -> Result<StoredFile, AttemptError> {
        match relay {
            Some(relay) => tracing::info!("Attempt {}/{} with relay {}", attempt, total, relay),
            None => tracing::info!("Attempt {}/{} direct", attempt, total),
        }

        let status = self
            .fetcher
            .fetch(job, relay, cancel)
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    AttemptError::Cancelled
                } else {
                    AttemptError::Invocation(e.to_string())
                }
            })?;

        tracing::debug!("Fetch process exited: {:?}", status.code());

        if !status.success() {
            return Err(AttemptError::Exited {
                code: status.code(),
            });
        }

        match tokio::fs::metadata(&request.destination).await {
            Ok(meta) if meta.is_file() => Ok(StoredFile::new(
                request.id.clone(),
                request.destination.clone(),
                meta.len(),
            )),
            _ => Err(AttemptError::NoOutput {
                path: request.destination.clone(),
            }),
        }
    }
}

/// Best-effort removal of whatever a failed acquisition left behind.
async fn remove_partial_output(destination: &Path) {
    for path in [destination.to_path_buf(), partial_path(destination)] {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!("Removed partial output {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove partial output {:?}: {}", path, e),
        }
    }
}

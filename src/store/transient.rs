//! Eviction timers for stored videos.
//!
//! Each stored video has at most one pending eviction. Scheduling over an
//! existing timer aborts it and installs a fresh one under a new generation
//! number; a timer only deletes its file if its generation is still the one
//! registered when it fires, so a timer that lost a race with a cancel or a
//! reschedule does nothing.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use reelcast_common::paths::video_path;
use reelcast_common::OutputId;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use super::remove_video;

/// Default time a video survives after its most recent access.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// A freshly acquired video, not yet owned by the store.
///
/// Handing it to [`TransientStore::admit`] consumes it, so a file can only be
/// admitted once.
#[derive(Debug)]
pub struct StoredFile {
    id: OutputId,
    path: PathBuf,
    size: u64,
    acquired_at: DateTime<Utc>,
}

impl StoredFile {
    pub(crate) fn new(id: OutputId, path: PathBuf, size: u64) -> Self {
        Self {
            id,
            path,
            size,
            acquired_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &OutputId {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at acquisition time.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}

struct EvictionTimer {
    generation: u64,
    deadline: Instant,
    task: AbortHandle,
}

struct StoreInner {
    dir: PathBuf,
    default_ttl: Duration,
    timers: DashMap<OutputId, EvictionTimer>,
    generation: AtomicU64,
}

/// Thread-safe registry of pending evictions.
///
/// Cloning is cheap and shares the registry. Must be used from within a
/// tokio runtime: timers are spawned tasks.
#[derive(Clone)]
pub struct TransientStore {
    inner: Arc<StoreInner>,
}

impl TransientStore {
    /// Create a store for videos under `dir`.
    pub fn new(dir: impl Into<PathBuf>, default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                dir: dir.into(),
                default_ttl,
                timers: DashMap::new(),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Storage directory.
    pub fn dir(&self) -> &Path {
        &self.inner.dir
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Path of the video backing `id`.
    pub fn path_for(&self, id: &OutputId) -> PathBuf {
        video_path(&self.inner.dir, id)
    }

    /// Take ownership of a freshly acquired video and schedule its first
    /// eviction with the default TTL.
    pub fn admit(&self, file: StoredFile) -> Instant {
        tracing::info!(
            video_id = %file.id,
            size_bytes = file.size,
            "Stored video admitted"
        );
        self.schedule(&file.id, self.inner.default_ttl)
    }

    /// Schedule eviction of `id` after `ttl`, replacing any pending timer.
    ///
    /// Returns the new deadline.
    pub fn schedule(&self, id: &OutputId, ttl: Duration) -> Instant {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
        let deadline = Instant::now() + ttl;

        match self.inner.timers.entry(id.clone()) {
            Entry::Occupied(mut slot) => {
                slot.get().task.abort();
                let task = self.spawn_timer(id.clone(), generation, deadline);
                slot.insert(EvictionTimer {
                    generation,
                    deadline,
                    task,
                });
                tracing::debug!(
                    video_id = %id,
                    ttl_secs = ttl.as_secs(),
                    "Eviction rescheduled"
                );
            }
            Entry::Vacant(slot) => {
                let task = self.spawn_timer(id.clone(), generation, deadline);
                slot.insert(EvictionTimer {
                    generation,
                    deadline,
                    task,
                });
                tracing::info!(
                    video_id = %id,
                    ttl_secs = ttl.as_secs(),
                    "Eviction scheduled"
                );
            }
        }

        deadline
    }

    /// Same as [`schedule`](Self::schedule).
    pub fn reschedule(&self, id: &OutputId, ttl: Duration) -> Instant {
        self.schedule(id, ttl)
    }

    /// Slide the eviction window forward after an access.
    ///
    /// Only a registered video is extended, to now plus the default TTL but
    /// never earlier than its current deadline. An untracked or already
    /// evicted id is left alone and `None` is returned. The check and the
    /// replacement happen under the same map entry lock, so a concurrent
    /// [`evict_now`](Self::evict_now) cannot be undone by a late access.
    pub fn touch(&self, id: &OutputId) -> Option<Instant> {
        match self.inner.timers.entry(id.clone()) {
            Entry::Occupied(mut slot) => {
                let deadline = slot
                    .get()
                    .deadline
                    .max(Instant::now() + self.inner.default_ttl);
                let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
                slot.get().task.abort();
                let task = self.spawn_timer(id.clone(), generation, deadline);
                slot.insert(EvictionTimer {
                    generation,
                    deadline,
                    task,
                });
                tracing::debug!(video_id = %id, "Eviction deadline extended");
                Some(deadline)
            }
            Entry::Vacant(_) => {
                tracing::debug!(video_id = %id, "Access to untracked video, no timer");
                None
            }
        }
    }

    /// Cancel the pending eviction for `id`, if any. The file is kept.
    ///
    /// Returns whether a timer was cancelled.
    pub fn cancel(&self, id: &OutputId) -> bool {
        match self.inner.timers.remove(id) {
            Some((_, timer)) => {
                timer.task.abort();
                tracing::info!(video_id = %id, "Eviction cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel any pending eviction and delete the file now.
    ///
    /// Returns whether a file was deleted; deleting a missing file is not an
    /// error.
    pub async fn evict_now(&self, id: &OutputId) -> io::Result<bool> {
        self.cancel(id);
        let removed = remove_video(&self.path_for(id)).await?;
        if removed {
            tracing::info!(video_id = %id, "Video evicted immediately");
        }
        Ok(removed)
    }

    /// Cancel every pending eviction without deleting any file.
    ///
    /// Returns the number of timers cancelled.
    pub fn drain_all(&self) -> usize {
        let mut drained = 0;
        self.inner.timers.retain(|_, timer| {
            timer.task.abort();
            drained += 1;
            false
        });
        if drained > 0 {
            tracing::info!(drained, "Cancelled pending evictions");
        }
        drained
    }

    /// Deadline of the pending eviction for `id`.
    pub fn deadline(&self, id: &OutputId) -> Option<Instant> {
        self.inner.timers.get(id).map(|timer| timer.deadline)
    }

    /// Check if `id` has a pending eviction.
    pub fn contains(&self, id: &OutputId) -> bool {
        self.inner.timers.contains_key(id)
    }

    /// Number of pending evictions.
    pub fn len(&self) -> usize {
        self.inner.timers.len()
    }

    /// Check if there are no pending evictions.
    pub fn is_empty(&self) -> bool {
        self.inner.timers.is_empty()
    }

    fn spawn_timer(&self, id: OutputId, generation: u64, deadline: Instant) -> AbortHandle {
        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            store.expire(&id, generation).await;
        })
        .abort_handle()
    }

    async fn expire(&self, id: &OutputId, generation: u64) {
        let claimed = self
            .inner
            .timers
            .remove_if(id, |_, timer| timer.generation == generation);

        if claimed.is_none() {
            tracing::debug!(video_id = %id, "Eviction timer superseded, skipping");
            return;
        }

        match remove_video(&self.path_for(id)).await {
            Ok(true) => tracing::info!(video_id = %id, "Evicted expired video"),
            Ok(false) => tracing::debug!(video_id = %id, "Expired video already gone"),
            Err(e) => tracing::warn!(video_id = %id, "Failed to evict expired video: {}", e),
        }
    }
}

impl std::fmt::Debug for TransientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransientStore")
            .field("dir", &self.inner.dir)
            .field("default_ttl", &self.inner.default_ttl)
            .field("pending", &self.inner.timers.len())
            .finish()
    }
}

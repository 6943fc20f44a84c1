//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which builds a full [`AppContext`] over a
//! temporary storage directory and a scripted [`StubFetcher`] in place of
//! yt-dlp. [`TestHarness::with_server`] starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use reelcast::acquire::Acquirer;
use reelcast::config::Config;
use reelcast::relay::RelayPool;
use reelcast::server::{create_router, AppContext};
use reelcast::store::TransientStore;
use reelcast_common::{OutputId, Relay};
use reelcast_fetch::{FetchJob, Fetcher};

/// How the stub fetcher behaves.
#[derive(Debug, Clone, Copy)]
pub enum StubMode {
    /// Fail every call until the given 1-based call, which writes a file.
    SucceedOn { call: usize, size: usize },
    /// Fail every call.
    AlwaysFail,
    /// Block until cancelled.
    Hang,
}

/// Fetcher that records its calls and follows a script.
pub struct StubFetcher {
    mode: StubMode,
    calls: Mutex<Vec<(FetchJob, Option<Relay>)>>,
    cancelled: AtomicBool,
}

impl StubFetcher {
    pub fn new(mode: StubMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Relay used by each call, in order.
    pub fn relays_used(&self) -> Vec<Option<Relay>> {
        self.calls.lock().iter().map(|(_, relay)| *relay).collect()
    }

    pub fn jobs(&self) -> Vec<FetchJob> {
        self.calls.lock().iter().map(|(job, _)| job.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(
        &self,
        job: &FetchJob,
        relay: Option<&Relay>,
        cancel: &CancellationToken,
    ) -> reelcast_fetch::Result<ExitStatus> {
        let call = {
            let mut calls = self.calls.lock();
            calls.push((job.clone(), relay.copied()));
            calls.len()
        };

        match self.mode {
            StubMode::SucceedOn { call: target, size } if call == target => {
                tokio::fs::write(&job.destination, patterned_bytes(size))
                    .await
                    .map_err(|source| reelcast_fetch::Error::Wait {
                        tool: "stub".to_string(),
                        source,
                    })?;
                Ok(ExitStatus::from_raw(0))
            }
            StubMode::SucceedOn { .. } | StubMode::AlwaysFail => Ok(ExitStatus::from_raw(1 << 8)),
            StubMode::Hang => {
                cancel.cancelled().await;
                self.cancelled.store(true, Ordering::SeqCst);
                Err(reelcast_fetch::Error::Cancelled {
                    tool: "stub".to_string(),
                })
            }
        }
    }
}

/// Bytes `0, 1, .., 255, 0, 1, ..` so any offset is easy to check.
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..=255u8).cycle().take(len).collect()
}

pub fn relays(n: u8) -> Vec<Relay> {
    (1..=n)
        .map(|i| format!("10.0.0.{i}:8080").parse().unwrap())
        .collect()
}

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary storage directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub fetcher: Arc<StubFetcher>,
    _dir: TempDir,
}

impl TestHarness {
    /// Harness with no relays whose fetcher always fails.
    pub fn new() -> Self {
        Self::with_fetcher(StubMode::AlwaysFail, Vec::new())
    }

    pub fn with_fetcher(mode: StubMode, relay_list: Vec<Relay>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut config = Config::default();
        config.storage.dir = dir.path().to_path_buf();
        config.relays.enabled = false;

        let fetcher = Arc::new(StubFetcher::new(mode));
        let acquirer = Acquirer::new(
            fetcher.clone(),
            RelayPool::new(relay_list),
            config.acquire.max_attempts,
        );
        let store = TransientStore::new(dir.path(), config.storage.ttl());

        Self {
            ctx: AppContext::new(config, store, acquirer),
            fetcher,
            _dir: dir,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    pub fn storage_dir(&self) -> &Path {
        self.ctx.store.dir()
    }

    /// Place a video of `len` patterned bytes directly in storage.
    pub fn put_video(&self, len: usize) -> OutputId {
        let id = OutputId::generate();
        std::fs::write(self.ctx.store.path_for(&id), patterned_bytes(len))
            .expect("failed to write video");
        id
    }

    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.storage_dir())
            .expect("failed to read storage dir")
            .count()
    }

    /// Start an Axum server on a random port and return its address.
    pub async fn serve(&self) -> SocketAddr {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }
}

/// Helper to get response body as bytes
pub async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

/// Helper to get response body as string
pub async fn body_to_string(body: Body) -> String {
    String::from_utf8(body_bytes(body).await).unwrap()
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

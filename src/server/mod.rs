use crate::acquire::Acquirer;
use crate::config::Config;
use crate::relay::{load_relays, RelayPool};
use crate::store::{prepare_storage, TransientStore};
use crate::streaming;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use reelcast_fetch::{YtDlpConfig, YtDlpFetcher, YTDLP};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod routes_cleanup;
pub mod routes_player;
pub mod routes_video;

pub use error::AppError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Eviction timers for every stored video
    pub store: TransientStore,
    /// Fetch orchestration with the shared relay rotation
    pub acquirer: Acquirer,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    pub fn new(config: Config, store: TransientStore, acquirer: Acquirer) -> Self {
        Self {
            config: Arc::new(config),
            store,
            acquirer,
            started_at: Utc::now(),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Acquisition entry point, redirects to the player
        .route("/video", get(routes_video::acquire_video))
        .route("/play/:video_id", get(routes_player::player_page))
        .nest("/videos", streaming::videos_router())
        .route("/cleanup/:video_id", post(routes_cleanup::cleanup_video))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "relays": ctx.acquirer.relays().len(),
        "active_videos": ctx.store.len(),
        "started_at": ctx.started_at.to_rfc3339(),
    }))
}

/// Build the application context from configuration.
///
/// Prepares the storage directory (fatal on failure), loads relays and
/// locates the fetch tool. A missing fetch tool is only a warning: every
/// attempt will then fail and the client gets a 502.
pub async fn build_context(config: Config) -> Result<AppContext> {
    let storage_dir = config.storage.dir.clone();
    let removed = prepare_storage(&storage_dir, config.storage.sweep_on_start)
        .await
        .with_context(|| format!("Failed to prepare storage directory {:?}", storage_dir))?;
    if removed > 0 {
        tracing::info!("Removed {} leftover entries from {:?}", removed, storage_dir);
    }

    let relays = RelayPool::new(load_relays(&config.relays).await);
    tracing::info!("Relay pool ready with {} relays", relays.len());

    let program = match YtDlpFetcher::discover(config.acquire.ytdlp_path.as_deref()) {
        Ok(fetcher) => fetcher.config().program.clone(),
        Err(e) => {
            tracing::warn!("{}; acquisitions will fail until it is installed", e);
            config
                .acquire
                .ytdlp_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(YTDLP))
        }
    };
    let fetcher = YtDlpFetcher::new(YtDlpConfig {
        program,
        extra_args: config.acquire.extra_args.clone(),
        timeout: config.acquire.timeout(),
    });

    let acquirer = Acquirer::new(Arc::new(fetcher), relays, config.acquire.max_attempts);
    let store = TransientStore::new(storage_dir, config.storage.ttl());

    Ok(AppContext::new(config, store, acquirer))
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = build_context(config).await?;
    let store = ctx.store.clone();
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let pending = store.drain_all();
    tracing::info!("Cancelled {} pending evictions", pending);
    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

//! Immediate eviction, sent by the player when the viewer leaves.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use reelcast_common::OutputId;

use super::AppContext;

/// `POST /cleanup/{video_id}`
///
/// Always answers 200: the caller is usually a page being unloaded and
/// cannot act on an error anyway.
pub async fn cleanup_video(
    State(ctx): State<AppContext>,
    Path(video_id): Path<String>,
) -> StatusCode {
    let Ok(id) = video_id.parse::<OutputId>() else {
        tracing::debug!("Ignoring cleanup for invalid id {:?}", video_id);
        return StatusCode::OK;
    };

    match ctx.store.evict_now(&id).await {
        Ok(true) => tracing::info!("Cleaned up {} (viewer left)", id),
        Ok(false) => tracing::debug!("Cleanup for {}: nothing to remove", id),
        Err(e) => tracing::warn!("Cleanup for {} failed: {}", id, e),
    }

    StatusCode::OK
}

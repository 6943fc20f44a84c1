//! Acquisition entry point.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use reelcast_common::{Error, OutputId, QualityTier};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{AppContext, AppError};
use crate::acquire::AcquisitionRequest;

#[derive(Debug, Deserialize)]
pub struct VideoQuery {
    pub url: Option<String>,
    pub quality: Option<String>,
}

/// `GET /video?url=...&quality=...`
///
/// Acquires the video, hands it to the store and redirects to the player.
/// Dropping the request (client disconnect) cancels the acquisition.
pub async fn acquire_video(
    State(ctx): State<AppContext>,
    Query(query): Query<VideoQuery>,
) -> Result<Redirect, AppError> {
    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            Error::invalid_input("missing url parameter, use /video?url=VIDEO_URL&quality=1080p")
        })?;
    let quality: QualityTier = match query.quality.as_deref() {
        Some(q) if !q.trim().is_empty() => q.parse()?,
        _ => QualityTier::default(),
    };

    let request = AcquisitionRequest::new(url, quality, ctx.store.dir());
    tracing::info!(
        id = %request.id,
        quality = %request.quality,
        "New video request for {}",
        request.source
    );

    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    // Admission happens inside the task so a finished file always reaches
    // the store, even if the client is gone by then.
    let task = tokio::spawn(async move {
        let file = ctx.acquirer.acquire(&request, &cancel).await?;
        let id = file.id().clone();
        ctx.store.admit(file);
        Ok::<OutputId, crate::acquire::AcquisitionFailed>(id)
    });

    let id = task
        .await
        .map_err(|e| Error::internal(format!("acquisition task failed: {e}")))??;

    Ok(Redirect::to(&format!("/play/{}", id)))
}

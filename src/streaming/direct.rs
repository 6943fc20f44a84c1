//! Direct streaming with HTTP range requests.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use reelcast_common::paths::VIDEO_CONTENT_TYPE;
use reelcast_common::{Error, OutputId};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::server::{AppContext, AppError};
use crate::store::TransientStore;

const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Serve a stored video with range request support.
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let range = headers.get(header::RANGE).and_then(|h| h.to_str().ok());
    serve(&ctx.store, &video_id, range).await
}

/// Build the response for `video_id` and reset its eviction clock.
///
/// Unknown or malformed identifiers are `404`. A range that cannot be
/// parsed or satisfied falls back to the full file. Only videos the store
/// still tracks get their deadline extended.
pub async fn serve(
    store: &TransientStore,
    video_id: &str,
    range_header: Option<&str>,
) -> Result<Response, AppError> {
    let not_found = || Error::not_found(format!("video {video_id}"));

    let id: OutputId = video_id.parse().map_err(|_| not_found())?;
    let file_path = store.path_for(&id);

    let metadata = tokio::fs::metadata(&file_path)
        .await
        .map_err(|_| not_found())?;
    if !metadata.is_file() {
        return Err(not_found().into());
    }

    let file_size = metadata.len();
    let range = range_header.and_then(|s| parse_range_header(s, file_size));

    let mut file = File::open(&file_path).await.map_err(|_| not_found())?;

    let response = match range {
        Some((start, end)) => {
            // Partial content response
            let length = end - start + 1;

            file.seek(SeekFrom::Start(start)).await.map_err(Error::from)?;

            let body = Body::from_stream(ReaderStream::new(file.take(length)));

            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, file_size),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CACHE_CONTROL, NO_CACHE)
                .body(body)
                .map_err(|e| Error::internal(e.to_string()))?
        }
        None => {
            // Full file response
            let body = Body::from_stream(ReaderStream::new(file));

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
                .header(header::CONTENT_LENGTH, file_size.to_string())
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CACHE_CONTROL, NO_CACHE)
                .body(body)
                .map_err(|e| Error::internal(e.to_string()))?
        }
    };

    store.touch(&id);

    Ok(response)
}

/// Parse HTTP Range header.
///
/// Supports formats:
/// - bytes=0-499
/// - bytes=500-
/// - bytes=-500 (last 500 bytes)
///
/// The returned range always lies within the file.
fn parse_range_header(header: &str, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 {
        return None;
    }

    let header = header.trim().strip_prefix("bytes=")?;

    let (start, end) = header.split_once('-')?;
    let start = start.trim();
    let end = end.trim();

    match (start.is_empty(), end.is_empty()) {
        // bytes=-500 (last 500 bytes)
        (true, false) => {
            let suffix_len: u64 = end.parse().ok()?;
            if suffix_len == 0 {
                return None;
            }
            let start = file_size.saturating_sub(suffix_len);
            Some((start, file_size - 1))
        }
        // bytes=500- (from 500 to end)
        (false, true) => {
            let start: u64 = start.parse().ok()?;
            if start >= file_size {
                return None;
            }
            Some((start, file_size - 1))
        }
        // bytes=0-499
        (false, false) => {
            let start: u64 = start.parse().ok()?;
            let end: u64 = end.parse().ok()?;
            if start >= file_size {
                return None;
            }
            let end = end.min(file_size - 1);
            if start > end {
                return None;
            }
            Some((start, end))
        }
        // bytes=- (invalid)
        (true, true) => None,
    }
}

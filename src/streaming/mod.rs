//! Video delivery.
//!
//! Serves stored videos with HTTP range support. Every successful serve
//! slides the video's eviction deadline forward, which is what keeps a video
//! alive while it is being watched.
//!
//! # Routes
//!
//! - `GET /videos/{video_id}` - Stream a stored video, honoring `Range`

mod direct;

pub use direct::{serve, stream_video};

use axum::{routing::get, Router};

use crate::server::AppContext;

/// Create the video delivery router.
pub fn videos_router() -> Router<AppContext> {
    Router::new().route("/:video_id", get(stream_video))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_videos_router_creation() {
        let _router: Router<AppContext> = videos_router();
    }
}

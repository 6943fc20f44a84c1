//! Quality tier to yt-dlp format selector mapping.

use reelcast_common::QualityTier;

/// Build the `-f` selector for a quality tier.
///
/// Every selector prefers a merged mp4 video + m4a audio pair, then a single
/// pre-muxed mp4, and finally ends in an unconditional fallback so the tool
/// always has something to pick.
pub fn format_selector(tier: QualityTier) -> String {
    match tier {
        QualityTier::Best => "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string(),
        QualityTier::Worst => "worst[ext=mp4]/worst".to_string(),
        _ => {
            let height = tier.max_height().unwrap_or(1080);
            format!(
                "bestvideo[height<={h}][ext=mp4]+bestaudio[ext=m4a]/best[height<={h}][ext=mp4]/best",
                h = height
            )
        }
    }
}

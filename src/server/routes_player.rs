//! Minimal HTML player page.

use axum::{
    extract::{Path, State},
    response::Html,
};
use reelcast_common::{Error, OutputId};

use super::{AppContext, AppError};

/// `GET /play/{video_id}`
///
/// The page streams `/videos/{id}` and asks for immediate cleanup when it
/// is hidden or unloaded.
pub async fn player_page(
    State(ctx): State<AppContext>,
    Path(video_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let not_found = || Error::not_found(format!("video {video_id}"));

    let id: OutputId = video_id.parse().map_err(|_| not_found())?;
    match tokio::fs::metadata(ctx.store.path_for(&id)).await {
        Ok(meta) if meta.is_file() => Ok(Html(render_player(&id))),
        _ => Err(not_found().into()),
    }
}

// Identifiers are restricted to [A-Za-z0-9_-], so interpolation needs no escaping.
fn render_player(id: &OutputId) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>reelcast</title>
  <style>
    html, body {{ margin: 0; height: 100%; background: #000; }}
    video {{ width: 100%; height: 100%; object-fit: contain; }}
  </style>
</head>
<body>
  <video id="player" controls autoplay playsinline preload="auto">
    <source src="/videos/{id}" type="video/mp4">
  </video>
  <script>
    const cleanupUrl = "/cleanup/{id}";
    let cleaned = false;
    function cleanup(beacon) {{
      if (cleaned) return;
      cleaned = true;
      if (beacon && navigator.sendBeacon) {{
        navigator.sendBeacon(cleanupUrl);
      }} else {{
        fetch(cleanupUrl, {{ method: "POST", keepalive: true }}).catch(() => {{}});
      }}
    }}
    document.addEventListener("visibilitychange", () => {{
      if (document.visibilityState === "hidden") cleanup(false);
    }});
    window.addEventListener("beforeunload", () => cleanup(true));
  </script>
</body>
</html>
"#
    )
}

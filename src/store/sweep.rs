//! Storage directory bootstrap.

use std::io;
use std::path::Path;

/// Ensure the storage directory exists and, if requested, empty it.
///
/// Returns the number of entries swept. An inaccessible directory is an
/// error; callers treat it as fatal.
pub async fn prepare_storage(dir: &Path, sweep: bool) -> io::Result<usize> {
    tokio::fs::create_dir_all(dir).await?;

    if sweep {
        sweep_dir(dir).await
    } else {
        tokio::fs::read_dir(dir).await?;
        Ok(0)
    }
}

/// Remove every entry in `dir` left behind by a previous run.
pub async fn sweep_dir(dir: &Path) -> io::Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut removed = 0;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let result = match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => tokio::fs::remove_dir_all(&path).await,
            _ => tokio::fs::remove_file(&path).await,
        };

        match result {
            Ok(()) => {
                removed += 1;
                tracing::info!("Removed old video: {:?}", path);
            }
            Err(e) => tracing::warn!("Failed to remove {:?}: {}", path, e),
        }
    }

    Ok(removed)
}

//! Transient video storage.
//!
//! Every acquired video is owned by the [`TransientStore`] from the moment
//! acquisition hands it over until it is evicted, either by its timer or by
//! an explicit cleanup request.

mod sweep;
mod transient;

pub use sweep::{prepare_storage, sweep_dir};
pub use transient::{StoredFile, TransientStore, DEFAULT_TTL};

use std::io;
use std::path::Path;

/// Delete a stored video, treating an already-missing file as success.
///
/// Returns whether a file was actually removed.
pub(crate) async fn remove_video(path: &Path) -> io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

//! File operation utilities
//!
//! Centralized file handling for the download pipeline: canonical file names,
//! existence checks and the temp-file-then-rename write pattern.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use url::Url;

use super::error::{DownloadError, FileOperation, Result};

/// Canonical on-disk name for an artifact: the percent-decoded last path
/// segment of the URL the catalog finally served it from.
pub fn filename_from_url(url: &Url) -> Result<String> {
    let invalid = |reason: &str| DownloadError::InvalidFilename {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| invalid("URL path has no final segment"))?;

    let decoded = urlencoding::decode(segment).map_err(|_| invalid("segment is not valid UTF-8 once decoded"))?;

    if decoded == "." || decoded == ".." || decoded.contains(['/', '\\']) {
        return Err(invalid("decoded name is not a plain file name"));
    }

    Ok(decoded.into_owned())
}

/// Check if an artifact already exists at its destination.
///
/// Existence alone counts as up to date; contents are not inspected.
pub async fn check_existing_file(dest_path: &Path) -> Result<bool> {
    match fs::metadata(dest_path).await {
        Ok(metadata) => {
            debug!("File already exists: {} ({} bytes)", dest_path.display(), metadata.len());
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DownloadError::io(dest_path, FileOperation::Metadata, e)),
    }
}

/// Path a download is streamed to before it is moved into place.
///
/// Appends `.part` so the temp file never carries the artifact extension.
pub fn create_temp_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Move a finished temp file to its final destination
pub async fn atomic_rename(temp_path: &Path, dest_path: &Path) -> Result<()> {
    fs::rename(temp_path, dest_path)
        .await
        .map_err(|e| DownloadError::io(dest_path, FileOperation::Move, e))?;
    debug!("Renamed {} to {}", temp_path.display(), dest_path.display());
    Ok(())
}

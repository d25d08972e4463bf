//! Mark-and-sweep of the mods directory
//!
//! Every artifact file in the mods directory that is not in the expected set
//! (resolved this run, or whitelisted) is moved into the quarantine
//! directory. Nothing is ever deleted, so a missed whitelist entry can be
//! undone by moving the file back.

pub mod error;

pub use error::ReconcileError;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::downloader::core::progress::{emit, ProgressCallback, ProgressEvent};
use crate::downloader::FileOperation;

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// File names that belong in the mods directory after a sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedArtifacts {
    names: HashSet<String>,
}

impl ExpectedArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of files resolved this run and whitelisted names
    pub fn from_parts<D, W>(downloaded: D, whitelist: W) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        let mut expected = Self::new();
        expected.extend(downloaded);
        expected.extend(whitelist);
        expected
    }

    pub fn insert<S: Into<String>>(&mut self, name: S) -> bool {
        self.names.insert(name.into())
    }

    pub fn extend<I>(&mut self, names: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order, for display
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Artifact files directly inside `mods_dir` with the given extension.
///
/// Not recursive. Hidden files are left out, the way a shell glob would.
pub async fn list_artifacts(mods_dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(mods_dir).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReconcileError::ModsDirNotFound(mods_dir.to_path_buf())
        } else {
            ReconcileError::io(mods_dir, FileOperation::ListDir, e)
        }
    })?;

    let mut artifacts = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ReconcileError::io(mods_dir, FileOperation::ListDir, e))?
    {
        let path = entry.path();
        let is_hidden = entry.file_name().to_string_lossy().starts_with('.');
        let has_extension = path.extension().is_some_and(|ext| ext == extension);
        if is_hidden || !has_extension {
            continue;
        }

        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| ReconcileError::io(&path, FileOperation::Metadata, e))?;
        if metadata.is_file() {
            artifacts.push(path);
        }
    }

    artifacts.sort();
    Ok(artifacts)
}

/// Move every unexpected artifact from `mods_dir` into `trash_dir`.
///
/// Returns the quarantined paths inside `trash_dir`, sorted by name.
pub async fn reconcile(
    mods_dir: &Path,
    trash_dir: &Path,
    expected: &ExpectedArtifacts,
    extension: &str,
    progress_callback: Option<&ProgressCallback>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(trash_dir)
        .await
        .map_err(|e| ReconcileError::io(trash_dir, FileOperation::CreateDir, e))?;

    info!("Keeping only these files: {:?}", expected.sorted());

    let mut quarantined = Vec::new();
    for path in list_artifacts(mods_dir, extension).await? {
        let Some(name) = path.file_name() else {
            continue;
        };
        if expected.contains(&name.to_string_lossy()) {
            debug!("Keeping {}", path.display());
            continue;
        }

        let destination = trash_dir.join(name);
        move_file(&path, &destination).await?;
        info!("Moved {} to trash dir", path.display());
        emit(
            progress_callback,
            ProgressEvent::Quarantined {
                file: path.clone(),
                destination: destination.clone(),
            },
        );
        quarantined.push(destination);
    }

    Ok(quarantined)
}

/// Rename, falling back to copy + remove across file systems
async fn move_file(source: &Path, destination: &Path) -> Result<()> {
    match fs::rename(source, destination).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            debug!("{} is on another device, copying instead", destination.display());
            fs::copy(source, destination)
                .await
                .map_err(|e| ReconcileError::io(destination, FileOperation::Write, e))?;
            fs::remove_file(source)
                .await
                .map_err(|e| ReconcileError::io(source, FileOperation::Move, e))
        }
        Err(e) => Err(ReconcileError::io(source, FileOperation::Move, e)),
    }
}

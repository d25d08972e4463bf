//! Top-level error for a sync run

use std::path::PathBuf;
use thiserror::Error;

use crate::downloader::DownloadError;
use crate::parse_modpack::{ConfigError, MetadataError, ModpackError};
use crate::reconcile::ReconcileError;

/// Anything that stops a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Could not read modpack config '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parsing of modpack config completed with errors: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid modpack metadata: {0}")]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Reconciling the mods directory failed: {0}")]
    Reconcile(#[from] ReconcileError),
}

impl From<ModpackError> for SyncError {
    fn from(error: ModpackError) -> Self {
        match error {
            ModpackError::Config(e) => SyncError::Config(e),
            ModpackError::Metadata(e) => SyncError::Metadata(e),
        }
    }
}

impl SyncError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SyncError::ConfigRead { .. } => "config_read",
            SyncError::Config(_) => "config",
            SyncError::Metadata(_) => "metadata",
            SyncError::Download(e) => e.category(),
            SyncError::Reconcile(_) => "reconcile",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

//! Reconciliation error types

use std::path::PathBuf;
use thiserror::Error;

use crate::downloader::FileOperation;

/// Errors that can occur while sweeping the mods directory
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("File operation failed on '{path}' while {operation}")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    #[error("Mods directory not found: {0}")]
    ModsDirNotFound(PathBuf),
}

impl ReconcileError {
    pub(crate) fn io(path: impl Into<PathBuf>, operation: FileOperation, source: std::io::Error) -> Self {
        ReconcileError::FileSystem {
            path: path.into(),
            operation,
            source,
        }
    }
}

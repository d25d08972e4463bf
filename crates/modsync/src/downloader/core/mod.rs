//! Core types used throughout the downloader system
//!
//! This module contains the fundamental types that all other modules depend on.

pub mod error;
pub mod files;
pub mod http;
pub mod progress;

pub use error::{DownloadError, ErrorSeverity, FileOperation, Result};
pub use http::HttpClient;
pub use progress::{
    IntoProgressCallback, NullProgressReporter, ProgressCallback, ProgressEvent, ProgressReporter,
    TracingProgressReporter,
};

use url::Url;

/// One artifact to fetch: catalog identifier plus the version filter token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    /// Project identifier as written under `[mods]`
    pub artifact: String,
    /// Catalog version filter, already percent-encoded
    pub version_filter: String,
}

impl ArtifactRequest {
    pub fn new<A: Into<String>, V: Into<String>>(artifact: A, version_filter: V) -> Self {
        Self {
            artifact: artifact.into(),
            version_filter: version_filter.into(),
        }
    }
}

/// Where an artifact was finally served from, and the name it gets on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub final_url: Url,
    pub filename: String,
}

impl ResolvedDownload {
    pub fn from_final_url(final_url: Url) -> Result<Self> {
        let filename = files::filename_from_url(&final_url)?;
        Ok(Self { final_url, filename })
    }
}

/// Result of fetching one artifact
#[derive(Debug)]
pub enum DownloadOutcome {
    /// File was written to the mods directory
    Downloaded { filename: String, size: u64 },
    /// A file with the canonical name already existed and was left alone
    AlreadyPresent { filename: String },
    /// Artifact could not be fetched; the run continues without it
    Skipped { artifact: String, error: DownloadError },
}

impl DownloadOutcome {
    /// File name that now exists in the mods directory, if any
    pub fn filename(&self) -> Option<&str> {
        match self {
            DownloadOutcome::Downloaded { filename, .. } => Some(filename),
            DownloadOutcome::AlreadyPresent { filename } => Some(filename),
            DownloadOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DownloadOutcome::Skipped { .. })
    }
}

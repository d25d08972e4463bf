//! Downloader module
//!
//! This module contains all the download functionality including
//! core types, configuration and the catalog source.

pub mod config;
pub mod core;
pub mod r#lib;
pub mod sources;

// Re-export main types for convenience
pub use r#lib::Downloader;
pub use config::{DownloadConfig, DownloadConfigBuilder};
pub use self::core::{
    ArtifactRequest, DownloadError, DownloadOutcome, ErrorSeverity, FileOperation, HttpClient,
    IntoProgressCallback, NullProgressReporter, ProgressCallback, ProgressEvent, ProgressReporter,
    ResolvedDownload, Result, TracingProgressReporter,
};
pub use sources::{AnchorMatcher, CurseForgeSource, LinkResolver, MarkerClassMatcher};

#[cfg(test)]
mod tests;

//! Main entry point for artifact downloads
//!
//! The call chain flows as follows:
//!
//! ModpackSync (integrations/modpack.rs)
//! ↓
//! Downloader (this file)
//! ↓
//! CurseForgeSource (sources/curseforge.rs) + LinkResolver (sources/link.rs)
//! ↓
//! Core types (core/*)

use std::path::Path;
use tracing::{info_span, warn, Instrument};

use crate::downloader::{
    config::DownloadConfig,
    core::{
        progress::{emit, ProgressEvent},
        ArtifactRequest, DownloadOutcome, HttpClient, ProgressCallback, Result,
    },
    sources::{CurseForgeSource, LinkResolver},
};

/// Fetches artifacts one at a time over a single shared HTTP client
#[derive(Debug)]
pub struct Downloader {
    client: HttpClient,
    source: CurseForgeSource,
    config: DownloadConfig,
}

impl Downloader {
    /// Create a downloader with the default link resolver
    pub fn new(config: DownloadConfig) -> Result<Self> {
        Self::with_resolver(config, LinkResolver::new())
    }

    /// Create a downloader with a custom anchor matching rule
    pub fn with_resolver(config: DownloadConfig, resolver: LinkResolver) -> Result<Self> {
        let client = HttpClient::from_config(&config)?;
        let source = CurseForgeSource::with_resolver(&config, resolver)?;
        Ok(Self { client, source, config })
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    pub fn source(&self) -> &CurseForgeSource {
        &self.source
    }

    /// Fetch one artifact into `mods_dir`.
    ///
    /// Recoverable failures (page or file unavailable, transport errors,
    /// unusable file names) come back as [`DownloadOutcome::Skipped`].
    /// A missing download link or a local file system failure is returned
    /// as an error and must stop the run.
    pub async fn fetch_artifact(
        &self,
        request: &ArtifactRequest,
        mods_dir: &Path,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<DownloadOutcome> {
        async move {
            match self
                .source
                .fetch(&self.client, request, mods_dir, progress_callback.as_ref())
                .await
            {
                Ok(outcome) => Ok(outcome),
                Err(error) if error.is_recoverable() => {
                    warn!(category = error.category(), "Skipping {}: {}", request.artifact, error);
                    emit(
                        progress_callback.as_ref(),
                        ProgressEvent::Skipped {
                            artifact: request.artifact.clone(),
                            reason: error.to_string(),
                        },
                    );
                    Ok(DownloadOutcome::Skipped {
                        artifact: request.artifact.clone(),
                        error,
                    })
                }
                Err(error) => Err(error),
            }
        }
        .instrument(info_span!("artifact", name = %request.artifact))
        .await
    }
}

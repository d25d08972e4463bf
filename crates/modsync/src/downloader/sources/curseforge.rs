//! CurseForge-style catalog source
//!
//! The catalog has no machine API. Each artifact is fetched in two steps:
//! 1. GET the project's file listing filtered to one game version
//! 2. Follow the marked download anchor; the catalog redirects to a CDN
//!    whose final path segment is the real file name

use std::path::Path;
use tracing::{debug, info};
use url::Url;

use super::link::LinkResolver;
use crate::downloader::config::DownloadConfig;
use crate::downloader::core::{
    files::check_existing_file,
    progress::{emit, ProgressCallback, ProgressEvent},
    ArtifactRequest, DownloadError, DownloadOutcome, HttpClient, ResolvedDownload, Result,
};

/// Listing pages and file downloads of one catalog
#[derive(Debug)]
pub struct CurseForgeSource {
    root: Url,
    resolver: LinkResolver,
}

impl CurseForgeSource {
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        Self::with_resolver(config, LinkResolver::new())
    }

    pub fn with_resolver(config: &DownloadConfig, resolver: LinkResolver) -> Result<Self> {
        let root = Url::parse(&config.catalog_root)
            .map_err(|e| DownloadError::invalid_url(&config.catalog_root, e))?;
        Ok(Self { root, resolver })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// `{root}/projects/{artifact}/files?filter-game-version={filter}`
    pub fn listing_url(&self, request: &ArtifactRequest) -> Result<Url> {
        let url = format!(
            "{}/projects/{}/files?filter-game-version={}",
            self.root.as_str().trim_end_matches('/'),
            request.artifact,
            request.version_filter
        );
        Url::parse(&url).map_err(|e| DownloadError::invalid_url(url, e))
    }

    /// Resolve a listing page link against the catalog root
    pub fn download_url(&self, href: &str) -> Result<Url> {
        self.root
            .join(href)
            .map_err(|e| DownloadError::invalid_url(href, e))
    }

    /// Fetch one artifact into `mods_dir`.
    ///
    /// Any error is returned as-is; [`DownloadError::is_recoverable`] tells
    /// the caller whether the run may continue.
    pub async fn fetch(
        &self,
        client: &HttpClient,
        request: &ArtifactRequest,
        mods_dir: &Path,
        progress_callback: Option<&ProgressCallback>,
    ) -> Result<DownloadOutcome> {
        let artifact = request.artifact.as_str();

        // Step 1: listing page
        let page_url = self.listing_url(request)?;
        emit(
            progress_callback,
            ProgressEvent::PageRequested {
                artifact: artifact.to_string(),
                url: page_url.to_string(),
            },
        );
        let page = client.get(page_url.as_str()).await?;
        if !page.status().is_success() {
            return Err(DownloadError::PageUnavailable {
                artifact: artifact.to_string(),
                url: page_url.to_string(),
                status: page.status().as_u16(),
            });
        }
        let html = page
            .text()
            .await
            .map_err(|e| DownloadError::http(page_url.as_str(), e))?;

        // Step 2: download anchor
        let href = self
            .resolver
            .resolve_download_link(&html)
            .ok_or_else(|| DownloadError::LinkNotFound {
                artifact: artifact.to_string(),
                url: page_url.to_string(),
            })?;
        let file_url = self.download_url(&href)?;
        emit(
            progress_callback,
            ProgressEvent::LinkResolved {
                artifact: artifact.to_string(),
                url: file_url.to_string(),
            },
        );

        // Step 3: file request, redirects followed by the client
        let response = client.get(file_url.as_str()).await?;
        if !response.status().is_success() {
            return Err(DownloadError::FileUnavailable {
                artifact: artifact.to_string(),
                url: file_url.to_string(),
                status: response.status().as_u16(),
            });
        }

        // Step 4: name comes from where we ended up, not where we started
        let resolved = ResolvedDownload::from_final_url(response.url().clone())?;
        if resolved.final_url != file_url {
            emit(
                progress_callback,
                ProgressEvent::Redirected {
                    artifact: artifact.to_string(),
                    final_url: resolved.final_url.to_string(),
                },
            );
        }

        // Step 5: existing file counts as current
        let dest_path = mods_dir.join(&resolved.filename);
        debug!("Download path for {} is {}", artifact, dest_path.display());
        if check_existing_file(&dest_path).await? {
            emit(
                progress_callback,
                ProgressEvent::AlreadyPresent {
                    artifact: artifact.to_string(),
                    filename: resolved.filename.clone(),
                },
            );
            return Ok(DownloadOutcome::AlreadyPresent {
                filename: resolved.filename,
            });
        }

        let size = client
            .download_to_file(response, &dest_path, progress_callback)
            .await?;
        info!("Downloaded {} as {} ({} bytes)", artifact, resolved.filename, size);

        Ok(DownloadOutcome::Downloaded {
            filename: resolved.filename,
            size,
        })
    }
}

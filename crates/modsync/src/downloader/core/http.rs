//! HTTP utilities
//!
//! One reqwest client per sync run, plus the streaming write used for
//! artifact bodies.

use futures::StreamExt;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::error::{DownloadError, FileOperation, Result};
use super::files::{atomic_rename, create_temp_path};
use super::progress::{emit, ProgressCallback, ProgressEvent};
use crate::downloader::config::DownloadConfig;

/// HTTP client shared by every request of a sync run.
///
/// Carries connection pooling only; no state affects correctness.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client from download configuration
    pub fn from_config(config: &DownloadConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| DownloadError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Issue a GET, following redirects. Only transport failures are errors;
    /// the caller decides what a non-success status means.
    pub async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::http(url, e))?;
        debug!("GET {} -> {} ({})", url, response.status(), response.url());
        Ok(response)
    }

    /// Stream a response body to `dest_path`.
    ///
    /// The body goes to a `.part` file first and is renamed into place once
    /// complete. A body stream failure leaves the `.part` file behind and is
    /// reported as [`DownloadError::HttpRequest`]; local write failures are
    /// [`DownloadError::FileSystem`].
    pub async fn download_to_file(
        &self,
        response: Response,
        dest_path: &Path,
        progress_callback: Option<&ProgressCallback>,
    ) -> Result<u64> {
        let url = response.url().to_string();
        let total_size = response.content_length();
        let temp_path = create_temp_path(dest_path);

        debug!("Streaming {} to {}", url, temp_path.display());
        emit(
            progress_callback,
            ProgressEvent::DownloadStarted {
                url: url.clone(),
                total_size,
            },
        );

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| DownloadError::io(&temp_path, FileOperation::Create, e))?;

        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;
        let start_time = std::time::Instant::now();
        let mut last_progress_time = start_time;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::http(&url, e))?;

            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(&temp_path, FileOperation::Write, e))?;
            downloaded += chunk.len() as u64;

            // Report progress at most every 100ms to avoid spam
            let now = std::time::Instant::now();
            if now.duration_since(last_progress_time).as_millis() >= 100 {
                let elapsed = start_time.elapsed().as_secs_f64();
                let speed = if elapsed > 0.0 { downloaded as f64 / elapsed } else { 0.0 };
                emit(
                    progress_callback,
                    ProgressEvent::DownloadProgress {
                        url: url.clone(),
                        downloaded,
                        total: total_size,
                        speed_bps: speed,
                    },
                );
                last_progress_time = now;
            }
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::io(&temp_path, FileOperation::Write, e))?;
        drop(file);

        atomic_rename(&temp_path, dest_path).await?;

        emit(
            progress_callback,
            ProgressEvent::DownloadComplete {
                url,
                final_size: downloaded,
            },
        );

        debug!("Download completed: {} bytes", downloaded);
        Ok(downloaded)
    }
}

//! Progress tracking and reporting for sync operations

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Progress callback for sync operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted while an artifact is resolved and fetched
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    PageRequested {
        artifact: String,
        url: String,
    },
    LinkResolved {
        artifact: String,
        url: String,
    },
    Redirected {
        artifact: String,
        final_url: String,
    },
    DownloadStarted {
        url: String,
        total_size: Option<u64>,
    },
    DownloadProgress {
        url: String,
        downloaded: u64,
        total: Option<u64>,
        speed_bps: f64,
    },
    DownloadComplete {
        url: String,
        final_size: u64,
    },
    AlreadyPresent {
        artifact: String,
        filename: String,
    },
    Skipped {
        artifact: String,
        reason: String,
    },
    Quarantined {
        file: PathBuf,
        destination: PathBuf,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_page_requested(&self, _artifact: &str, _url: &str) {}
    fn on_link_resolved(&self, _artifact: &str, _url: &str) {}
    fn on_redirected(&self, _artifact: &str, _final_url: &str) {}
    fn on_download_started(&self, _url: &str, _total_size: Option<u64>) {}
    fn on_download_progress(&self, _url: &str, _downloaded: u64, _total: Option<u64>, _speed_bps: f64) {}
    fn on_download_complete(&self, _url: &str, _final_size: u64) {}
    fn on_already_present(&self, _artifact: &str, _filename: &str) {}
    fn on_skipped(&self, _artifact: &str, _reason: &str) {}
    fn on_quarantined(&self, _file: &Path, _destination: &Path) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::PageRequested { artifact, url } => {
                self.on_page_requested(&artifact, &url);
            }
            ProgressEvent::LinkResolved { artifact, url } => {
                self.on_link_resolved(&artifact, &url);
            }
            ProgressEvent::Redirected { artifact, final_url } => {
                self.on_redirected(&artifact, &final_url);
            }
            ProgressEvent::DownloadStarted { url, total_size } => {
                self.on_download_started(&url, total_size);
            }
            ProgressEvent::DownloadProgress { url, downloaded, total, speed_bps } => {
                self.on_download_progress(&url, downloaded, total, speed_bps);
            }
            ProgressEvent::DownloadComplete { url, final_size } => {
                self.on_download_complete(&url, final_size);
            }
            ProgressEvent::AlreadyPresent { artifact, filename } => {
                self.on_already_present(&artifact, &filename);
            }
            ProgressEvent::Skipped { artifact, reason } => {
                self.on_skipped(&artifact, &reason);
            }
            ProgressEvent::Quarantined { file, destination } => {
                self.on_quarantined(&file, &destination);
            }
        })
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Default)]
pub struct TracingProgressReporter {
    pub verbose: bool,
}

impl TracingProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for TracingProgressReporter {
    fn on_page_requested(&self, artifact: &str, url: &str) {
        info!("Now querying {}: {}", artifact, url);
    }

    fn on_link_resolved(&self, artifact: &str, url: &str) {
        info!("Mod URL for {}: {}", artifact, url);
    }

    fn on_redirected(&self, _artifact: &str, final_url: &str) {
        info!("Redirected to {}", final_url);
    }

    fn on_download_started(&self, url: &str, total_size: Option<u64>) {
        match total_size {
            Some(size) => info!("Downloading {} ({} bytes)", url, size),
            None => info!("Downloading {}", url),
        }
    }

    fn on_download_progress(&self, url: &str, downloaded: u64, total: Option<u64>, speed_bps: f64) {
        if self.verbose {
            let speed_kb = speed_bps / 1024.0;
            match total {
                Some(total) if total > 0 => {
                    let percent = (downloaded as f64 / total as f64) * 100.0;
                    info!("{}: {:.1}% ({}/{} bytes, {:.1} KB/s)", url, percent, downloaded, total, speed_kb);
                }
                _ => info!("{}: {} bytes ({:.1} KB/s)", url, downloaded, speed_kb),
            }
        }
    }

    fn on_download_complete(&self, url: &str, final_size: u64) {
        info!("Download complete: {} ({} bytes)", url, final_size);
    }

    fn on_already_present(&self, artifact: &str, filename: &str) {
        info!("{} is up to date ({} already exists)", artifact, filename);
    }

    fn on_skipped(&self, artifact: &str, reason: &str) {
        warn!("Skipping {}: {}", artifact, reason);
    }

    fn on_quarantined(&self, file: &Path, destination: &Path) {
        info!("Moved {} to {}", file.display(), destination.display());
    }
}

/// Null progress reporter that does nothing
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}

/// Send an event if a callback is registered
pub(crate) fn emit(callback: Option<&ProgressCallback>, event: ProgressEvent) {
    if let Some(callback) = callback {
        callback(event);
    }
}

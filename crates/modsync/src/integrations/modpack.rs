//! High-level modpack sync API
//!
//! Runs the whole pipeline for a parsed [`Modpack`]: fetch every artifact in
//! order, then sweep the mods directory.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

use crate::downloader::{
    ArtifactRequest, DownloadConfig, DownloadError, DownloadOutcome, Downloader, FileOperation,
    LinkResolver, ProgressCallback,
};
use crate::parse_modpack::{GameVersions, Modpack};
use crate::reconcile::{self, ExpectedArtifacts};
use crate::Result;

/// Default mods directory
pub const DEFAULT_MODS_DIR: &str = "mods";

/// Default quarantine directory, relative to the mods directory
pub const DEFAULT_TRASH_DIR: &str = "trash";

/// Where artifacts live and where stale ones go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub mods_dir: PathBuf,
    /// Relative paths are taken relative to `mods_dir`
    pub trash_dir: PathBuf,
}

impl SyncOptions {
    pub fn new<M: Into<PathBuf>, T: Into<PathBuf>>(mods_dir: M, trash_dir: T) -> Self {
        Self {
            mods_dir: mods_dir.into(),
            trash_dir: trash_dir.into(),
        }
    }

    /// Quarantine directory with relative paths resolved against the mods directory
    pub fn resolved_trash_dir(&self) -> PathBuf {
        if self.trash_dir.is_absolute() {
            self.trash_dir.clone()
        } else {
            self.mods_dir.join(&self.trash_dir)
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MODS_DIR, DEFAULT_TRASH_DIR)
    }
}

/// An artifact left out of this run and why
#[derive(Debug)]
pub struct SkippedArtifact {
    pub artifact: String,
    pub error: DownloadError,
}

/// Result of a completed sync run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Files written this run
    pub downloaded: Vec<String>,
    /// Files that already existed under their canonical name
    pub already_present: Vec<String>,
    pub skipped: Vec<SkippedArtifact>,
    /// Destination paths of quarantined files
    pub quarantined: Vec<PathBuf>,
    /// Everything that was allowed to stay
    pub expected: ExpectedArtifacts,
    pub elapsed_time: Duration,
}

impl SyncReport {
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Fluent builder for a modpack sync run
pub struct ModpackSync {
    modpack: Modpack,
    options: SyncOptions,
    config: DownloadConfig,
    game_versions: GameVersions,
    resolver: Option<LinkResolver>,
    progress_callback: Option<ProgressCallback>,
}

impl ModpackSync {
    pub fn new(modpack: Modpack) -> Self {
        Self {
            modpack,
            options: SyncOptions::default(),
            config: DownloadConfig::default(),
            game_versions: GameVersions::default(),
            resolver: None,
            progress_callback: None,
        }
    }

    pub fn mods_dir<P: AsRef<Path>>(mut self, mods_dir: P) -> Self {
        self.options.mods_dir = mods_dir.as_ref().to_path_buf();
        self
    }

    pub fn trash_dir<P: AsRef<Path>>(mut self, trash_dir: P) -> Self {
        self.options.trash_dir = trash_dir.as_ref().to_path_buf();
        self
    }

    pub fn options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(mut self, config: DownloadConfig) -> Self {
        self.config = config;
        self
    }

    pub fn game_versions(mut self, game_versions: GameVersions) -> Self {
        self.game_versions = game_versions;
        self
    }

    /// Use a custom download anchor rule
    pub fn resolver(mut self, resolver: LinkResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Fetch every artifact in order, then quarantine what is not expected.
    ///
    /// Returns early, without touching the mods directory further, when an
    /// artifact's listing page has no download link or a local file
    /// operation fails.
    pub async fn run(self) -> Result<SyncReport> {
        let start = Instant::now();
        let version_filter = self.modpack.metadata.version_filter(&self.game_versions)?;
        info!(
            "Loaded modpack for game version {} ({} mods, {} whitelisted)",
            self.modpack.game_version(),
            self.modpack.mods.len(),
            self.modpack.whitelist.len()
        );

        let downloader = Downloader::with_resolver(self.config, self.resolver.unwrap_or_default())?;
        let mods_dir = self.options.mods_dir.as_path();
        tokio::fs::create_dir_all(mods_dir)
            .await
            .map_err(|e| DownloadError::io(mods_dir, FileOperation::CreateDir, e))?;

        let mut report = SyncReport::default();
        for artifact in &self.modpack.mods {
            let request = ArtifactRequest::new(artifact.as_str(), version_filter.as_str());
            match downloader
                .fetch_artifact(&request, mods_dir, self.progress_callback.clone())
                .await?
            {
                DownloadOutcome::Downloaded { filename, .. } => report.downloaded.push(filename),
                DownloadOutcome::AlreadyPresent { filename } => report.already_present.push(filename),
                DownloadOutcome::Skipped { artifact, error } => {
                    report.skipped.push(SkippedArtifact { artifact, error })
                }
            }
        }

        report.expected = ExpectedArtifacts::from_parts(
            report.downloaded.iter().chain(&report.already_present).cloned(),
            self.modpack.whitelist.iter().cloned(),
        );

        let trash_dir = self.options.resolved_trash_dir();
        report.quarantined = reconcile::reconcile(
            mods_dir,
            &trash_dir,
            &report.expected,
            &downloader.config().artifact_extension,
            self.progress_callback.as_ref(),
        )
        .await?;

        report.elapsed_time = start.elapsed();
        info!(
            "Sync finished: {} downloaded, {} up to date, {} skipped, {} quarantined in {:.1}s",
            report.downloaded.len(),
            report.already_present.len(),
            report.skipped.len(),
            report.quarantined.len(),
            report.elapsed_time.as_secs_f64()
        );
        Ok(report)
    }
}

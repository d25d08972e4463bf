//! Modpack sync library
//!
//! Keeps a local mods directory in step with a modpack definition whose
//! artifacts are hosted on an HTML-only catalog. It parses the modpack
//! config, resolves each artifact's download link from its listing page,
//! fetches the file, and moves anything stale into a quarantine directory.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use modsync::{load_modpack, DownloadConfig, IntoProgressCallback, ModpackSync, TracingProgressReporter};
//!
//! # async fn example() -> modsync::Result<()> {
//! let modpack = load_modpack("modpack.conf").await?;
//!
//! let report = ModpackSync::new(modpack)
//!     .mods_dir("mods")
//!     .trash_dir("trash")
//!     .config(DownloadConfig::default())
//!     .progress(TracingProgressReporter::new(false).into_callback())
//!     .run()
//!     .await?;
//!
//! println!("{} downloaded, {} quarantined", report.downloaded.len(), report.quarantined.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Modpack file
//!
//! ```text
//! [mods]
//! jei
//! projecte
//!
//! [whitelist]
//! OptiFine_1.12.2_HD_U_E3.jar
//!
//! [metadata]
//! game_version: 1.12.2
//! ```
//!
//! # Failure policy
//!
//! - Config and metadata problems stop the run before any request is made
//! - An unreachable listing page or artifact file skips that artifact
//! - A listing page without a download link stops the run before the
//!   mods directory is swept

pub mod downloader;
pub mod error;
pub mod integrations;
pub mod parse_modpack;
pub mod reconcile;

// Re-export commonly used types for convenience
pub use downloader::{
    ArtifactRequest, DownloadConfig, DownloadConfigBuilder, DownloadError, DownloadOutcome, Downloader,
    IntoProgressCallback, LinkResolver, NullProgressReporter, ProgressCallback, ProgressEvent,
    ProgressReporter, TracingProgressReporter,
};
pub use error::{Result, SyncError};
pub use integrations::{ModpackSync, SyncOptions, SyncReport};
pub use parse_modpack::{
    load_modpack, ConfigError, ConfigParser, GameVersions, Metadata, MetadataError, Modpack,
    DEFAULT_CONFIG_FILE,
};
pub use reconcile::{reconcile, ExpectedArtifacts, ReconcileError};

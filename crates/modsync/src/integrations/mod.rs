//! High-level integrations
//!
//! This module provides the one-call sync API built on the parser,
//! downloader and reconciler.

pub mod modpack;

pub use modpack::{
    ModpackSync, SkippedArtifact, SyncOptions, SyncReport, DEFAULT_MODS_DIR, DEFAULT_TRASH_DIR,
};

//! Configuration types for the downloader system

use std::time::Duration;

/// Catalog the listing pages are served from
pub const DEFAULT_CATALOG_ROOT: &str = "https://minecraft.curseforge.com";

/// Extension of the files the sync manages
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "jar";

/// Configuration for catalog requests. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Catalog root, e.g. `https://minecraft.curseforge.com`
    pub catalog_root: String,
    pub connect_timeout: Duration,
    /// Longest gap between two reads. Bounds stalls, not total transfer time.
    pub read_timeout: Duration,
    pub user_agent: String,
    /// Redirect hops followed when fetching an artifact file
    pub max_redirects: usize,
    /// Extension (without the dot) of managed artifact files
    pub artifact_extension: String,
}

impl DownloadConfig {
    pub fn builder() -> DownloadConfigBuilder {
        DownloadConfigBuilder::new()
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            catalog_root: DEFAULT_CATALOG_ROOT.to_string(),
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(120),
            user_agent: concat!("modsync/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
            artifact_extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
        }
    }
}

/// Builder for [`DownloadConfig`]
#[derive(Debug, Clone, Default)]
pub struct DownloadConfigBuilder {
    config: DownloadConfig,
}

impl DownloadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog_root<S: Into<String>>(mut self, root: S) -> Self {
        self.config.catalog_root = root.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    pub fn artifact_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.config.artifact_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn build(self) -> DownloadConfig {
        self.config
    }
}

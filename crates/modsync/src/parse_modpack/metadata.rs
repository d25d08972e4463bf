//! `[metadata]` key/value entries and game version lookup

use std::collections::HashMap;
use thiserror::Error;

/// Separator between key and value in a metadata entry
pub const METADATA_SEPARATOR: &str = ": ";

/// Key holding the target game version
pub const GAME_VERSION_KEY: &str = "game_version";

/// Optional key overriding the catalog's version filter token
pub const VERSION_FILTER_KEY: &str = "version_filter";

/// Errors in the `[metadata]` category
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("metadata entry \"{entry}\" is missing the \"{}\" separator", METADATA_SEPARATOR)]
    MissingSeparator { entry: String },

    #[error("metadata is missing the required \"{key}\" key")]
    MissingKey { key: String },

    #[error("no catalog version filter known for game version \"{version}\" (add a \"{}\" metadata entry)", VERSION_FILTER_KEY)]
    UnknownGameVersion { version: String },
}

/// Key/value pairs from the `[metadata]` category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    values: HashMap<String, String>,
}

impl Metadata {
    /// Split every entry on its first `": "`. Stops at the first malformed entry.
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self, MetadataError> {
        let mut values = HashMap::with_capacity(entries.len());
        for entry in entries {
            let entry = entry.as_ref();
            let (key, value) = entry.split_once(METADATA_SEPARATOR).ok_or_else(|| {
                MetadataError::MissingSeparator {
                    entry: entry.to_string(),
                }
            })?;
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of a key that must be present
    pub fn require(&self, key: &str) -> Result<&str, MetadataError> {
        self.get(key).ok_or_else(|| MetadataError::MissingKey {
            key: key.to_string(),
        })
    }

    pub fn game_version(&self) -> Result<&str, MetadataError> {
        self.require(GAME_VERSION_KEY)
    }

    /// Catalog filter token for this modpack's game version.
    ///
    /// An explicit `version_filter` entry wins over the lookup table.
    pub fn version_filter(&self, versions: &GameVersions) -> Result<String, MetadataError> {
        let game_version = self.game_version()?;
        if let Some(filter) = self.get(VERSION_FILTER_KEY) {
            return Ok(filter.to_string());
        }
        versions
            .filter_for(game_version)
            .map(str::to_string)
            .ok_or_else(|| MetadataError::UnknownGameVersion {
                version: game_version.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Game version to catalog filter token.
///
/// The catalog filters its listing pages by opaque ids rather than by the
/// version string players know. Tokens are stored already percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameVersions {
    filters: HashMap<String, String>,
}

impl GameVersions {
    pub fn empty() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    pub fn with_version<V: Into<String>, F: Into<String>>(mut self, version: V, filter: F) -> Self {
        self.filters.insert(version.into(), filter.into());
        self
    }

    pub fn filter_for(&self, version: &str) -> Option<&str> {
        self.filters.get(version).map(String::as_str)
    }
}

impl Default for GameVersions {
    fn default() -> Self {
        Self::empty()
            .with_version("1.12.2", "2020709689%3A6756")
            .with_version("1.12.1", "2020709689%3A6711")
    }
}

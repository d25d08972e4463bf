//! Modpack config parsing
//!
//! Loads the `modpack.conf` document into a validated [`Modpack`]:
//! - [`parser`]: category scan with aggregated error reporting
//! - [`metadata`]: `key: value` entries and game version lookup

pub mod metadata;
pub mod parser;

pub use metadata::{GameVersions, Metadata, MetadataError};
pub use parser::{ConfigError, ConfigParser, ConfigProblem, ParsedConfig};

use std::str::FromStr;
use thiserror::Error;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "modpack.conf";

pub const MODS_CATEGORY: &str = "mods";
pub const WHITELIST_CATEGORY: &str = "whitelist";
pub const METADATA_CATEGORY: &str = "metadata";

/// Categories a modpack file must contain, and the only ones it may contain
pub const KNOWN_CATEGORIES: [&str; 3] = [MODS_CATEGORY, WHITELIST_CATEGORY, METADATA_CATEGORY];

/// Either stage of turning text into a [`Modpack`] can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModpackError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// A validated modpack definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modpack {
    /// Artifact identifiers, in processing order
    pub mods: Vec<String>,
    /// File names always kept in the mods directory
    pub whitelist: Vec<String>,
    pub metadata: Metadata,
}

impl Modpack {
    /// Build from an already parsed config. Metadata errors surface here.
    pub fn from_parsed(config: &ParsedConfig) -> Result<Self, MetadataError> {
        let metadata = Metadata::from_entries(config.entries(METADATA_CATEGORY))?;
        // Fail before any network activity if the version is unusable
        metadata.game_version()?;

        Ok(Self {
            mods: config.entries(MODS_CATEGORY).to_vec(),
            whitelist: config.entries(WHITELIST_CATEGORY).to_vec(),
            metadata,
        })
    }

    pub fn game_version(&self) -> &str {
        self.metadata.game_version().unwrap_or_default()
    }
}

impl FromStr for Modpack {
    type Err = ModpackError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let config = ConfigParser::new()
            .require(KNOWN_CATEGORIES)
            .permit(KNOWN_CATEGORIES)
            .parse(text)?;
        Ok(Self::from_parsed(&config)?)
    }
}

/// Read and parse a modpack file
pub async fn load_modpack<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Modpack> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| crate::SyncError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(text.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODPACK: &str = "\
[mods]
foo

[whitelist]
bar-1.0.jar

[metadata]
game_version: 1.12.2
";

    #[test]
    fn test_parse_modpack() {
        let modpack: Modpack = MODPACK.parse().unwrap();

        assert_eq!(modpack.mods, vec!["foo"]);
        assert_eq!(modpack.whitelist, vec!["bar-1.0.jar"]);
        assert_eq!(modpack.game_version(), "1.12.2");
    }

    #[test]
    fn test_config_errors_take_precedence() {
        let err = "[metadata]\nbroken\n".parse::<Modpack>().unwrap_err();
        match err {
            ModpackError::Config(config) => {
                assert_eq!(config.missing_categories(), vec!["mods", "whitelist"]);
            }
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_metadata_error() {
        let text = "[mods]\n[whitelist]\n[metadata]\ngame_version 1.12.2\n";
        let err = text.parse::<Modpack>().unwrap_err();
        assert!(matches!(err, ModpackError::Metadata(MetadataError::MissingSeparator { .. })));
    }

    #[test]
    fn test_missing_game_version_rejected() {
        let text = "[mods]\n[whitelist]\n[metadata]\nauthor: me\n";
        let err = text.parse::<Modpack>().unwrap_err();
        assert!(matches!(err, ModpackError::Metadata(MetadataError::MissingKey { .. })));
    }

    #[tokio::test]
    async fn test_load_modpack_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&path, MODPACK).await.unwrap();

        let modpack = load_modpack(&path).await.unwrap();
        assert_eq!(modpack.mods, vec!["foo"]);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_modpack(dir.path().join("nope.conf")).await.unwrap_err();
        assert!(matches!(err, crate::SyncError::ConfigRead { .. }));
    }
}

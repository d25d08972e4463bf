//! Error types for the artifact downloader with context and recovery information

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving and fetching a single artifact
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Listing page answered with a non-success status
    #[error("Listing page for '{artifact}' at '{url}' returned HTTP {status}")]
    PageUnavailable {
        artifact: String,
        url: String,
        status: u16,
    },

    /// Listing page has no anchor marked as the version-specific download
    #[error("Could not find a download link for '{artifact}' on '{url}' (does it have a file for the selected game version?)")]
    LinkNotFound { artifact: String, url: String },

    /// Artifact file answered with a non-success status
    #[error("Artifact file for '{artifact}' at '{url}' returned HTTP {status}")]
    FileUnavailable {
        artifact: String,
        url: String,
        status: u16,
    },

    /// Transport-level failure (connect, TLS, body stream)
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// URL could not be built or joined
    #[error("Invalid URL '{url}': {suggestion}")]
    InvalidUrl {
        url: String,
        suggestion: String,
        #[source]
        source: url::ParseError,
    },

    /// Final URL does not end in a usable file name
    #[error("Cannot derive a file name from '{url}': {reason}")]
    InvalidFilename { url: String, reason: String },

    /// Local file system failure
    #[error("File operation failed on '{path}' while {operation}")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

/// Types of file operations for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    Move,
    Metadata,
    CreateDir,
    ListDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Move => write!(f, "moving"),
            FileOperation::Metadata => write!(f, "reading metadata"),
            FileOperation::CreateDir => write!(f, "creating directory"),
            FileOperation::ListDir => write!(f, "listing directory"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;

impl DownloadError {
    /// Whether the sync can skip this artifact and continue with the next one.
    ///
    /// A missing download link stops the whole run: it usually means the
    /// modpack asks for a version the catalog does not carry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            DownloadError::PageUnavailable { .. } => true,
            DownloadError::FileUnavailable { .. } => true,
            DownloadError::HttpRequest { .. } => true,
            DownloadError::InvalidUrl { .. } => true,
            DownloadError::InvalidFilename { .. } => true,
            DownloadError::LinkNotFound { .. } => false,
            DownloadError::FileSystem { .. } => false,
            DownloadError::Configuration { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DownloadError::PageUnavailable { .. } => "page_unavailable",
            DownloadError::LinkNotFound { .. } => "link_not_found",
            DownloadError::FileUnavailable { .. } => "file_unavailable",
            DownloadError::HttpRequest { .. } => "http_request",
            DownloadError::InvalidUrl { .. } => "invalid_url",
            DownloadError::InvalidFilename { .. } => "invalid_filename",
            DownloadError::FileSystem { .. } => "file_system",
            DownloadError::Configuration { .. } => "configuration",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DownloadError::PageUnavailable { .. } => ErrorSeverity::Medium,
            DownloadError::FileUnavailable { .. } => ErrorSeverity::Medium,
            DownloadError::HttpRequest { .. } => ErrorSeverity::Medium,
            DownloadError::InvalidUrl { .. } => ErrorSeverity::Medium,
            DownloadError::InvalidFilename { .. } => ErrorSeverity::Medium,
            DownloadError::LinkNotFound { .. } => ErrorSeverity::High,
            DownloadError::Configuration { .. } => ErrorSeverity::High,
            DownloadError::FileSystem { .. } => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            DownloadError::PageUnavailable { .. } => {
                Some("Check the artifact name in the [mods] category and your network connection")
            }
            DownloadError::LinkNotFound { .. } => {
                Some("Check game_version in [metadata] or remove the artifact from [mods]")
            }
            DownloadError::InvalidUrl { suggestion, .. } => Some(suggestion),
            DownloadError::FileSystem { .. } => {
                Some("Check that the mods directory exists and is writable")
            }
            _ => None,
        }
    }

    pub(crate) fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        DownloadError::HttpRequest {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, operation: FileOperation, source: std::io::Error) -> Self {
        DownloadError::FileSystem {
            path: path.into(),
            operation,
            source,
        }
    }

    pub(crate) fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        let suggestion = match source {
            url::ParseError::EmptyHost => "URL must have a valid hostname",
            url::ParseError::InvalidPort => "Port number must be between 1 and 65535",
            url::ParseError::RelativeUrlWithoutBase => "URL must be absolute (include http:// or https://)",
            _ => "Check URL format and try again",
        }
        .to_string();

        DownloadError::InvalidUrl {
            url: url.into(),
            suggestion,
            source,
        }
    }
}

/// Error severity levels for prioritization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

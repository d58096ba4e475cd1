//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - [`TagError`]: why a single file in a batch failed. Caught at the task
//!   boundary, never aborts the batch.
//! - [`ArtFetchError`]: advisory; a failed artwork download never fails a file
//! - [`CatalogError`] lives with the catalog client

use std::path::PathBuf;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog search or download error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Per-file tagging error surfaced outside a batch (e.g. `match`)
    #[error(transparent)]
    Tag(#[from] TagError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, CatalogError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Catalog(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ConfigError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Config(e).context(ctx))
    }
}

/// Why one file could not be tagged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TagError {
    #[error("Failed to read tags from {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Title or artists are empty
    #[error("Missing title or artist in {0}")]
    MissingInfo(PathBuf),

    #[error("Catalog search failed: {0}")]
    Search(#[from] CatalogError),

    #[error("No catalog match for \"{title}\" by {artists}")]
    NoMatch { title: String, artists: String },

    #[error("Failed to write tags to {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl TagError {
    pub fn read(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Short machine-friendly name of the failure stage.
    pub fn kind(&self) -> &'static str {
        match self {
            TagError::Read { .. } => "read",
            TagError::MissingInfo(_) => "missing-info",
            TagError::Search(_) => "search",
            TagError::NoMatch { .. } => "no-match",
            TagError::Write { .. } => "write",
        }
    }
}

/// Artwork could not be downloaded; the file is still tagged without new art.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to fetch artwork from {url}: {source}")]
pub struct ArtFetchError {
    pub url: String,
    #[source]
    pub source: CatalogError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("/path/to/file.mp3");
        assert!(err.to_string().contains("/path/to/file.mp3"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::from(ConfigError::NoConfigDir).context("while saving config");
        let msg = err.to_string();
        assert!(msg.contains("while saving config"));
        assert!(msg.contains("config directory"));
    }

    #[test]
    fn test_tag_error_converts() {
        let err = Error::from(TagError::MissingInfo("/music/song.mp3".into()));
        assert!(err.to_string().contains("song.mp3"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), CatalogError> = Err(CatalogError::RateLimited);
        let with_ctx = result.with_context("searching");
        let msg = with_ctx.unwrap_err().to_string();
        assert!(msg.contains("searching"));
        assert!(msg.contains("Rate limited"));
    }

    #[test]
    fn test_tag_error_kinds() {
        assert_eq!(TagError::read("/a.mp3", "bad header").kind(), "read");
        assert_eq!(TagError::MissingInfo("/a.mp3".into()).kind(), "missing-info");
        assert_eq!(TagError::from(CatalogError::RateLimited).kind(), "search");
        let no_match = TagError::NoMatch {
            title: "Test Track".to_string(),
            artists: "DJ One".to_string(),
        };
        assert_eq!(no_match.kind(), "no-match");
        assert!(no_match.to_string().contains("\"Test Track\" by DJ One"));
        assert_eq!(TagError::write("/a.mp3", "denied").kind(), "write");
    }

    #[test]
    fn test_art_fetch_error_display() {
        let err = ArtFetchError {
            url: "https://img/1.jpg".to_string(),
            source: CatalogError::NotFound("image".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://img/1.jpg"));
        assert!(msg.contains("Not found"));
    }
}

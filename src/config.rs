//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\beatport-tagger\config.toml
//! - macOS: ~/Library/Application Support/beatport-tagger/config.toml
//! - Linux: ~/.config/beatport-tagger/config.toml
//!
//! The config file is human-readable and editable. Command-line flags
//! override whatever is loaded here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::batch::DEFAULT_WORKERS;
use crate::catalog::SITE_URL;
use crate::metadata::{TagField, TagUpdateSpec};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// What gets written to each file
    pub tagging: TaggingConfig,

    /// Worker pool settings
    pub batch: BatchConfig,

    /// Catalog connection settings
    pub catalog: CatalogConfig,
}

/// Tag writing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Fields to update
    pub fields: Vec<TagField>,

    /// Replace fields that already have a value
    pub overwrite: bool,

    /// Separator between multiple artists
    pub artist_separator: String,

    /// Download and embed cover art
    pub replace_art: bool,

    /// Square artwork size in pixels
    pub art_resolution: u32,

    /// Minimum fuzzy similarity (0-100)
    pub fuzziness: u8,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            fields: vec![TagField::Genre],
            overwrite: true,
            artist_separator: ";".to_string(),
            replace_art: false,
            art_resolution: 1200,
            fuzziness: 80,
        }
    }
}

/// Batch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Files processed in parallel
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Site root searched for tracks
    pub base_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: SITE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TaggerConfig {
    /// Build the immutable per-run update spec.
    pub fn tag_update_spec(&self) -> TagUpdateSpec {
        let tagging = &self.tagging;
        TagUpdateSpec::new(tagging.fields.iter().copied())
            .with_overwrite(tagging.overwrite)
            .with_artist_separator(tagging.artist_separator.clone())
            .with_art(tagging.replace_art, tagging.art_resolution)
            .with_fuzziness(tagging.fuzziness)
    }

    /// Worker count, never below 1.
    pub fn workers(&self) -> usize {
        self.batch.workers.max(1)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("beatport-tagger"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> TaggerConfig {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return TaggerConfig::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path, with the same fallbacks as [`load`].
pub fn load_from(path: &Path) -> TaggerConfig {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return TaggerConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                TaggerConfig::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            TaggerConfig::default()
        }
    }
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &TaggerConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

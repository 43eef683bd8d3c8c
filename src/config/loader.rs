//! Configuration structures and loading logic.

use crate::config::modes::{ApiVariant, DownloadMode};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Account targeting configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// DeviantArt account whose gallery is downloaded.
    #[serde(default)]
    pub account: Option<String>,
}

/// OAuth2 client credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,
}

/// Download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Maximum number of downloads in flight at once. Required, must be >= 1.
    #[serde(default)]
    pub max_concurrent_downloads: Option<usize>,

    /// Extension used when an item does not declare its own filetype.
    #[serde(default)]
    pub default_filetype: Option<String>,

    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Which API surface to use.
    #[serde(default)]
    pub api: ApiVariant,

    /// Download mode (gallery, folder, all, collections, list).
    #[serde(default)]
    pub download_mode: DownloadMode,

    /// Folder ID for folder download mode.
    #[serde(default)]
    pub folder_id: Option<String>,

    /// In `all` mode, also download every collection afterwards.
    #[serde(default)]
    pub include_collections: bool,

    /// Whether to log each completed download.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Whether to log skipped items.
    #[serde(default = "default_true")]
    pub show_skipped_downloads: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: None,
            default_filetype: None,
            download_directory: None,
            api: ApiVariant::default(),
            download_mode: DownloadMode::default(),
            folder_id: None,
            include_collections: false,
            show_downloads: true,
            show_skipped_downloads: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Find the configuration file to use.
    ///
    /// The explicit path wins when it exists; otherwise `config.toml` in the
    /// platform config directory is tried.
    pub fn locate(explicit: &Path) -> Option<PathBuf> {
        if explicit.exists() {
            return Some(explicit.to_path_buf());
        }

        let dirs = ProjectDirs::from("com", "deviantart-downloader", "deviantart-downloader")?;
        let fallback = dirs.config_dir().join("config.toml");
        fallback.exists().then_some(fallback)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.settings
            .download_directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Get the validated concurrency limit.
    pub fn concurrency_limit(&self) -> Result<usize> {
        match self.settings.max_concurrent_downloads {
            None => Err(Error::MissingConfig(
                "max_concurrent_downloads (set it in [settings] or pass --concurrency)".to_string(),
            )),
            Some(0) => Err(Error::ConfigValidation {
                field: "max_concurrent_downloads".to_string(),
                message: "Please set max_concurrent_downloads to a value of 1 or greater."
                    .to_string(),
            }),
            Some(n) => Ok(n),
        }
    }
}

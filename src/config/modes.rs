//! Download mode and API variant definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available download modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Download the unfoldered "all" gallery view (default).
    #[default]
    Gallery,
    /// Download a single gallery folder by ID.
    Folder,
    /// Download the "all" view followed by every gallery folder.
    All,
    /// Download every collection (favourites) folder.
    Collections,
    /// Print the account's gallery folders without downloading.
    List,
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Gallery => write!(f, "gallery"),
            DownloadMode::Folder => write!(f, "folder"),
            DownloadMode::All => write!(f, "all"),
            DownloadMode::Collections => write!(f, "collections"),
            DownloadMode::List => write!(f, "list"),
        }
    }
}

impl FromStr for DownloadMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gallery" => Ok(DownloadMode::Gallery),
            "folder" => Ok(DownloadMode::Folder),
            "all" => Ok(DownloadMode::All),
            "collections" => Ok(DownloadMode::Collections),
            "list" => Ok(DownloadMode::List),
            _ => Err(format!("Unknown download mode: {}", s)),
        }
    }
}

/// Which DeviantArt API surface to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVariant {
    /// OAuth2 REST API, requires client credentials.
    #[default]
    OAuth,
    /// Unauthenticated profile endpoints used by the website.
    Public,
}

impl ApiVariant {
    /// Whether this variant needs client credentials.
    pub fn requires_credentials(&self) -> bool {
        matches!(self, ApiVariant::OAuth)
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVariant::OAuth => write!(f, "oauth"),
            ApiVariant::Public => write!(f, "public"),
        }
    }
}

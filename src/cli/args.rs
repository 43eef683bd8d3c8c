//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{ApiVariant, Config, DownloadMode};

/// Filetype used when neither the CLI nor the config names one.
pub const DEFAULT_FILETYPE: &str = "jpg";

/// DeviantArt gallery downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "deviantart-downloader",
    version,
    about = "Download images from a DeviantArt account",
    long_about = "A CLI tool to download the gallery, folders and collections of a DeviantArt account.\n\n\
                  Example usage:\n  deviantart-downloader hyanna-natsu --filetype png"
)]
pub struct Args {
    /// DeviantArt account name.
    pub account: Option<String>,

    /// File type used when an image does not declare one (default: jpg).
    #[arg(short = 'f', long = "filetype")]
    pub filetype: Option<String>,

    /// List the account's gallery folders.
    #[arg(long, conflicts_with_all = ["folder", "all", "collections"])]
    pub list: bool,

    /// Download the specified folder by its ID.
    #[arg(long, conflicts_with_all = ["all", "collections"])]
    pub folder: Option<String>,

    /// Download all images from the gallery and every folder.
    #[arg(long)]
    pub all: bool,

    /// Download every collection (favourites) folder. Combines with --all.
    #[arg(long)]
    pub collections: bool,

    /// Use the public, unauthenticated endpoints instead of OAuth.
    #[arg(long)]
    pub public: bool,

    /// OAuth client ID.
    #[arg(long = "client-id", env = "DEVIANTART_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret.
    #[arg(long = "client-secret", env = "DEVIANTART_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Maximum number of concurrent downloads.
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Replace contents of an existing account folder without asking.
    #[arg(short, long)]
    pub yes: bool,

    /// Hide per-file download and skip messages.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Download mode selected by the flags.
    pub fn mode(&self) -> Option<DownloadMode> {
        if self.list {
            Some(DownloadMode::List)
        } else if self.folder.is_some() {
            Some(DownloadMode::Folder)
        } else if self.all {
            Some(DownloadMode::All)
        } else if self.collections {
            Some(DownloadMode::Collections)
        } else {
            None
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(account) = &self.account {
            config.target.account = Some(account.clone());
        }

        if let Some(client_id) = &self.client_id {
            config.credentials.client_id = client_id.clone();
        }

        if let Some(client_secret) = &self.client_secret {
            config.credentials.client_secret = client_secret.clone();
        }

        if let Some(mode) = self.mode() {
            config.settings.download_mode = mode;
        }

        if self.all && self.collections {
            config.settings.include_collections = true;
        }

        if let Some(folder) = &self.folder {
            config.settings.folder_id = Some(folder.clone());
        }

        if self.public {
            config.settings.api = ApiVariant::Public;
        }

        if let Some(concurrency) = self.concurrency {
            config.settings.max_concurrent_downloads = Some(concurrency);
        }

        if let Some(dir) = &self.download_directory {
            config.settings.download_directory = Some(dir.clone());
        }

        if let Some(filetype) = &self.filetype {
            config.settings.default_filetype = Some(filetype.clone());
        } else if config.settings.default_filetype.is_none() {
            config.settings.default_filetype = Some(DEFAULT_FILETYPE.to_string());
        }

        if self.quiet {
            config.settings.show_downloads = false;
            config.settings.show_skipped_downloads = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["deviantart-downloader", "alice"]).unwrap();
        assert_eq!(args.account.as_deref(), Some("alice"));
        assert_eq!(args.filetype, None);
        assert_eq!(args.mode(), None);
        assert_eq!(args.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_modes() {
        let args = Args::try_parse_from(["dd", "alice", "--list"]).unwrap();
        assert_eq!(args.mode(), Some(DownloadMode::List));

        let args = Args::try_parse_from(["dd", "alice", "--folder", "ABC"]).unwrap();
        assert_eq!(args.mode(), Some(DownloadMode::Folder));

        let args = Args::try_parse_from(["dd", "alice", "--all"]).unwrap();
        assert_eq!(args.mode(), Some(DownloadMode::All));

        assert!(Args::try_parse_from(["dd", "alice", "--list", "--all"]).is_err());
    }

    #[test]
    fn test_all_with_collections() {
        let args = Args::try_parse_from(["dd", "alice", "--all", "--collections"]).unwrap();
        assert_eq!(args.mode(), Some(DownloadMode::All));

        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert_eq!(config.settings.download_mode, DownloadMode::All);
        assert!(config.settings.include_collections);

        let args = Args::try_parse_from(["dd", "alice", "--all"]).unwrap();
        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert!(!config.settings.include_collections);
    }

    #[test]
    fn test_merge_into_config() {
        let args = Args::try_parse_from([
            "dd",
            "alice",
            "--folder",
            "ABC",
            "--public",
            "-j",
            "6",
            "-f",
            "png",
            "--quiet",
        ])
        .unwrap();

        let mut config = Config::default();
        config.settings.max_concurrent_downloads = Some(2);
        args.merge_into_config(&mut config);

        assert_eq!(config.target.account.as_deref(), Some("alice"));
        assert_eq!(config.settings.download_mode, DownloadMode::Folder);
        assert_eq!(config.settings.folder_id.as_deref(), Some("ABC"));
        assert_eq!(config.settings.api, ApiVariant::Public);
        assert_eq!(config.settings.max_concurrent_downloads, Some(6));
        assert_eq!(config.settings.default_filetype.as_deref(), Some("png"));
        assert!(!config.settings.show_downloads);
    }

    #[test]
    fn test_merge_keeps_config_values_when_flags_absent() {
        let args = Args::try_parse_from(["dd"]).unwrap();
        let mut config = Config::default();
        config.target.account = Some("bob-the-artist".into());
        config.settings.max_concurrent_downloads = Some(2);
        args.merge_into_config(&mut config);

        assert_eq!(config.target.account.as_deref(), Some("bob-the-artist"));
        assert_eq!(config.settings.max_concurrent_downloads, Some(2));
        assert_eq!(config.settings.api, ApiVariant::OAuth);
        assert_eq!(config.settings.default_filetype.as_deref(), Some("jpg"));
    }
}

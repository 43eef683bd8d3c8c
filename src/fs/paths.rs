//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::fs::naming::sanitize_path_component;

/// Name of the directory collection folders are placed under.
///
/// A gallery folder with this name shares the directory with the collections
/// tree under `--all --collections`; existing files are still skipped.
pub const COLLECTIONS_FOLDER: &str = "Collections";

/// Get the base folder for an account: `<download_dir>/<account>`.
pub fn get_account_folder(config: &Config, account: &str) -> PathBuf {
    config
        .download_directory()
        .join(sanitize_path_component(account))
}

/// Get the folder for a named gallery folder inside an account folder.
pub fn get_gallery_folder(account_dir: &Path, folder_name: &str) -> PathBuf {
    account_dir.join(sanitize_path_component(folder_name))
}

/// Get the folder for a named collection inside an account folder.
pub fn get_collection_folder(account_dir: &Path, collection_name: &str) -> PathBuf {
    account_dir
        .join(COLLECTIONS_FOLDER)
        .join(sanitize_path_component(collection_name))
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

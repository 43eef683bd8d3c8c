//! Configuration validation logic.

use crate::config::loader::Config;
use crate::config::modes::DownloadMode;
use crate::error::{Error, Result};
use regex::Regex;

/// Minimum username length.
const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length.
const MAX_USERNAME_LENGTH: usize = 20;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    let account = config
        .target
        .account
        .as_deref()
        .ok_or_else(|| Error::MissingConfig("account (DeviantArt username)".to_string()))?;
    validate_username(account)?;

    // Listing folders downloads nothing, so the concurrency limit is only
    // required for download modes.
    if config.settings.download_mode != DownloadMode::List {
        config.concurrency_limit()?;
    }

    if config.settings.api.requires_credentials() {
        validate_credential("client_id", &config.credentials.client_id)?;
        validate_credential("client_secret", &config.credentials.client_secret)?;
    }

    if let Some(filetype) = &config.settings.default_filetype {
        validate_filetype(filetype)?;
    }

    if config.settings.download_mode == DownloadMode::Folder {
        let folder_id = config
            .settings
            .folder_id
            .as_deref()
            .ok_or_else(|| Error::MissingConfig("folder_id (required for folder mode)".into()))?;
        validate_folder_id(folder_id)?;
    }

    Ok(())
}

/// Validate a client credential value.
pub fn validate_credential(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingConfig(format!(
            "{} (please set the {} in the config file)",
            field, field
        )));
    }

    let lower = value.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_client") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "{} appears to be a placeholder. Register an application on DeviantArt and use its credentials.",
                field
            ),
        });
    }

    Ok(())
}

/// Validate a DeviantArt username.
pub fn validate_username(username: &str) -> Result<()> {
    let clean_username = username.trim_start_matches('@');

    if clean_username.len() < MIN_USERNAME_LENGTH {
        return Err(Error::ConfigValidation {
            field: "account".to_string(),
            message: format!(
                "Username '{}' is too short (minimum {} characters)",
                username, MIN_USERNAME_LENGTH
            ),
        });
    }

    if clean_username.len() > MAX_USERNAME_LENGTH {
        return Err(Error::ConfigValidation {
            field: "account".to_string(),
            message: format!(
                "Username '{}' is too long (maximum {} characters)",
                username, MAX_USERNAME_LENGTH
            ),
        });
    }

    let username_pattern = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    if !username_pattern.is_match(clean_username) {
        return Err(Error::ConfigValidation {
            field: "account".to_string(),
            message: format!(
                "Username '{}' contains invalid characters. Only alphanumeric, hyphens, and underscores allowed.",
                username
            ),
        });
    }

    let lower = clean_username.to_lowercase();
    if lower == "replaceme" || lower == "username" {
        return Err(Error::ConfigValidation {
            field: "account".to_string(),
            message: format!(
                "Username '{}' appears to be a placeholder. Please provide an actual account name.",
                username
            ),
        });
    }

    Ok(())
}

/// Validate a default filetype such as `jpg` or `png`.
pub fn validate_filetype(filetype: &str) -> Result<()> {
    let filetype_pattern = Regex::new(r"^[a-zA-Z0-9]{1,10}$").unwrap();
    if !filetype_pattern.is_match(filetype) {
        return Err(Error::ConfigValidation {
            field: "default_filetype".to_string(),
            message: format!(
                "Invalid filetype '{}'. Use a bare extension such as jpg or png.",
                filetype
            ),
        });
    }
    Ok(())
}

/// Validate a gallery folder ID.
pub fn validate_folder_id(folder_id: &str) -> Result<()> {
    let folder_pattern = Regex::new(r"^[a-zA-Z0-9-]+$").unwrap();
    if !folder_pattern.is_match(folder_id) {
        return Err(Error::ConfigValidation {
            field: "folder_id".to_string(),
            message: format!("Invalid folder ID: '{}'", folder_id),
        });
    }
    Ok(())
}

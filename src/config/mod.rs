//! Configuration module for the deviantart-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Download modes and API variants
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, CredentialsConfig, SettingsConfig, TargetConfig};
pub use modes::{ApiVariant, DownloadMode};
pub use validation::validate_config;

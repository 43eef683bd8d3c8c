//! DeviantArt Downloader - download the images of a DeviantArt account
//!
//! This library provides functionality for mirroring DeviantArt galleries to disk.
//!
//! # Features
//!
//! - Download the full gallery of an account
//! - Download a single gallery folder, or every folder
//! - Download collections (favourites)
//! - OAuth client-credentials API or the public unauthenticated API
//! - Bounded concurrent downloads with idempotent re-runs
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use deviantart_downloader::{Config, DeviantArtApi, GalleryDownloader, GlobalState};
//! use deviantart_downloader::api::Endpoints;
//! use deviantart_downloader::download::{DownloadSettings, Interrupt};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let api = DeviantArtApi::from_config(&config, Endpoints::default()).await?;
//!
//!     let downloader = GalleryDownloader::new(
//!         &api,
//!         "hyanna-natsu",
//!         DownloadSettings::from_config(&config)?,
//!         Interrupt::new(),
//!     );
//!     let mut global = GlobalState::default();
//!     downloader
//!         .download_gallery(Path::new("hyanna-natsu"), &mut global)
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{DeviantArtApi, GalleryApi};
pub use config::{Config, DownloadMode};
pub use download::{DownloadState, GalleryDownloader, GlobalState, ItemDownloader, Paginator};
pub use error::{Error, Result};
pub use media::Item;

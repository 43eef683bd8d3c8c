//! Download module for content downloading.
//!
//! This module provides:
//! - Offset pagination over listing endpoints
//! - Bounded-concurrency item downloading
//! - Gallery, folder and collection orchestration
//! - Download state tracking
//! - Ctrl-C handling

pub mod gallery;
pub mod interrupt;
pub mod item;
pub mod paginator;
pub mod state;

pub use gallery::{find_folder, list_folders, GalleryDownloader};
pub use interrupt::Interrupt;
pub use item::{DownloadSettings, ItemDownloader};
pub use paginator::{Cursor, FolderListing, ItemListing, PageSource, Paginator};
pub use state::{DownloadState, GlobalState, ItemOutcome, SkipReason};

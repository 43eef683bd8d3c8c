//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Filename sanitization

pub mod naming;
pub mod paths;

pub use naming::{destination_path, sanitize_filename, sanitize_path_component};
pub use paths::{
    ensure_dir, get_account_folder, get_collection_folder, get_gallery_folder,
    COLLECTIONS_FOLDER,
};

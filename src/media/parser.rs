//! Conversion from API responses to gallery items.

use crate::api::types::{Deviation, FolderResponse, PublicGalleryEntry};
use crate::fs::sanitize_path_component;
use crate::media::item::{Folder, Item};

/// Convert an OAuth deviation into an item.
pub fn parse_deviation(deviation: &Deviation) -> Item {
    Item {
        id: deviation.deviationid.to_string(),
        title: deviation.title.clone(),
        source_url: deviation.url.clone(),
        is_downloadable: deviation.is_downloadable,
        content_filetype: deviation
            .content
            .as_ref()
            .and_then(|c| c.filetype.clone()),
    }
}

/// Convert a public gallery entry into an item.
///
/// Entries without a deviation block become items with no metadata so the
/// downloader reports them as skipped instead of dropping them silently.
pub fn parse_public_entry(entry: &PublicGalleryEntry) -> Item {
    match &entry.deviation {
        Some(deviation) => parse_deviation(deviation),
        None => Item::default(),
    }
}

/// Convert a folder response, sanitizing its name for use as a directory.
pub fn parse_folder(folder: &FolderResponse) -> Folder {
    let name = sanitize_path_component(&folder.name);
    Folder {
        folder_id: folder.folderid.to_string(),
        name,
    }
}

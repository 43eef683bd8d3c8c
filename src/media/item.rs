//! Gallery item representation.

/// One artwork reference from a gallery or collection listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Deviation ID.
    pub id: String,

    /// Title as shown on the site.
    pub title: Option<String>,

    /// Public page URL, used as the key for the oEmbed lookup.
    pub source_url: Option<String>,

    /// Whether the artist allows downloading the original.
    pub is_downloadable: bool,

    /// Declared filetype, either a MIME type (`image/jpeg`) or a bare extension.
    pub content_filetype: Option<String>,
}

impl Item {
    /// Title and source URL are both needed to name and fetch the file.
    pub fn has_required_metadata(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
            && self.source_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// File extension for this item: its own filetype first, then the default.
    pub fn extension(&self, default_filetype: Option<&str>) -> Option<String> {
        self.content_filetype
            .as_deref()
            .and_then(extension_for_filetype)
            .or_else(|| default_filetype.and_then(extension_for_filetype))
    }
}

/// Real download location obtained from the oEmbed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub download_url: String,
    pub suggested_filetype: Option<String>,
}

impl ResolvedAsset {
    /// Build an asset, guessing the filetype from the URL path.
    pub fn new(download_url: String) -> Self {
        let suggested_filetype = url::Url::parse(&download_url)
            .ok()
            .and_then(|u| u.path_segments().and_then(|s| s.last().map(str::to_string)))
            .and_then(|last| last.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()))
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        Self {
            download_url,
            suggested_filetype,
        }
    }
}

/// A gallery or collection folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub folder_id: String,
    pub name: String,
}

/// Turn a declared filetype into a file extension.
///
/// Accepts bare extensions (`png`, `.png`) and MIME types (`image/jpeg`).
/// Returns `None` for empty or unusable input.
pub fn extension_for_filetype(filetype: &str) -> Option<String> {
    let filetype = filetype.trim().trim_start_matches('.').to_ascii_lowercase();
    if filetype.is_empty() {
        return None;
    }

    let Some(slash) = filetype.find('/') else {
        let is_bare = filetype.chars().all(|c| c.is_ascii_alphanumeric());
        return is_bare.then_some(filetype);
    };

    let (kind, subtype) = (&filetype[..slash], &filetype[slash + 1..]);
    if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let subtype = subtype.split(';').next().unwrap_or("").trim();
    if subtype == "jpeg" {
        return Some("jpg".to_string());
    }

    // Subtype doubles as the extension for most image types (png, gif, webp)
    let subtype_is_extension = mime_guess::from_ext(subtype)
        .iter()
        .any(|m| m.essence_str() == filetype);
    if subtype_is_extension {
        return Some(subtype.to_string());
    }

    if let Some(ext) = mime_guess::get_mime_extensions_str(&filetype).and_then(|e| e.first()) {
        return Some(ext.to_string());
    }

    let cleaned: String = subtype.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

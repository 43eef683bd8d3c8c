//! API response type definitions.

use serde::Deserialize;

/// One page of a paginated listing.
///
/// Both API surfaces use the same envelope; the OAuth API spells the
/// pagination fields in snake_case and the public one in camelCase.
#[derive(Debug, Deserialize)]
pub struct PageResponse<T> {
    pub results: Option<Vec<T>>,
    #[serde(default, alias = "hasMore")]
    pub has_more: Option<bool>,
    #[serde(default, alias = "nextOffset")]
    pub next_offset: Option<u64>,
}

/// A deviation as returned by the OAuth gallery and collection endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Deviation {
    #[serde(alias = "deviationId")]
    pub deviationid: IdValue,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_true", alias = "isDownloadable")]
    pub is_downloadable: bool,
    #[serde(default)]
    pub content: Option<DeviationContent>,
}

/// Full-size content block of an OAuth deviation.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviationContent {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub filetype: Option<String>,
}

/// Result entry of the public profile gallery endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicGalleryEntry {
    #[serde(default)]
    pub deviation: Option<Deviation>,
}

/// A gallery or collection folder.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderResponse {
    #[serde(alias = "folderId")]
    pub folderid: IdValue,
    pub name: String,
}

/// IDs are UUID strings on the OAuth API and integers on the public one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for IdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdValue::Text(s) => write!(f, "{}", s),
            IdValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// oEmbed lookup response.
#[derive(Debug, Deserialize)]
pub struct OEmbedResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_page_decodes() {
        let json = r#"{
            "has_more": true,
            "next_offset": 24,
            "results": [{
                "deviationid": "D1",
                "url": "https://www.deviantart.com/alice/art/A-1",
                "title": "A",
                "is_downloadable": false,
                "content": {"src": "https://images/a.jpg", "filetype": "image/jpeg"}
            }]
        }"#;
        let page: PageResponse<Deviation> = serde_json::from_str(json).unwrap();
        assert_eq!(page.has_more, Some(true));
        assert_eq!(page.next_offset, Some(24));
        let results = page.results.unwrap();
        assert!(!results[0].is_downloadable);
        assert_eq!(
            results[0].content.as_ref().unwrap().filetype.as_deref(),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_public_page_decodes() {
        let json = r#"{
            "hasMore": false,
            "nextOffset": null,
            "results": [{"deviation": {"deviationId": 7, "url": "https://x/art/B-2", "title": "B"}}]
        }"#;
        let page: PageResponse<PublicGalleryEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(page.has_more, Some(false));
        assert_eq!(page.next_offset, None);
        let deviation = page.results.unwrap()[0].deviation.clone().unwrap();
        assert_eq!(deviation.deviationid.to_string(), "7");
        assert!(deviation.is_downloadable);
        assert_eq!(deviation.title.as_deref(), Some("B"));
    }

    #[test]
    fn test_missing_results_key() {
        let page: PageResponse<Deviation> = serde_json::from_str(r#"{"error": "x"}"#).unwrap();
        assert!(page.results.is_none());
        assert!(page.has_more.is_none());
    }

    #[test]
    fn test_folder_ids_accept_both_shapes() {
        let oauth: FolderResponse =
            serde_json::from_str(r#"{"folderid": "ABC-123", "name": "Sketches"}"#).unwrap();
        assert_eq!(oauth.folderid.to_string(), "ABC-123");

        let public: FolderResponse =
            serde_json::from_str(r#"{"folderId": 98765, "name": "Comics"}"#).unwrap();
        assert_eq!(public.folderid.to_string(), "98765");
    }
}

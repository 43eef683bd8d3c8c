//! DeviantArt API HTTP client.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::auth::request_access_token;
use crate::api::types::{
    Deviation, FolderResponse, OEmbedResponse, PageResponse, PublicGalleryEntry,
};
use crate::api::{
    AssetBody, FolderKind, GalleryApi, GalleryPage, GalleryScope, GallerySource, Page,
};
use crate::config::{ApiVariant, Config};
use crate::download::Cursor;
use crate::error::{Error, Result};
use crate::media::{parse_deviation, parse_folder, parse_public_entry, Folder, ResolvedAsset};

/// Page size for OAuth item listings.
pub const OAUTH_PAGE_LIMIT: u32 = 24;

/// Page size for public item listings.
pub const PUBLIC_PAGE_LIMIT: u32 = 20;

/// Page size for folder listings.
pub const FOLDER_PAGE_LIMIT: u32 = 10;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("deviantart-downloader/", env!("CARGO_PKG_VERSION"));

/// Base URLs of the remote services.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Site and OAuth API base.
    pub api_base: String,
    /// oEmbed service base.
    pub oembed_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: "https://www.deviantart.com".to_string(),
            oembed_base: "https://backend.deviantart.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every service at one base URL.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            api_base: base.clone(),
            oembed_base: base,
        }
    }
}

/// How listing requests are authorized.
enum Access {
    OAuth { token: String },
    Public,
}

/// DeviantArt API client.
pub struct DeviantArtApi {
    client: Client,
    access: Access,
    endpoints: Endpoints,
}

impl DeviantArtApi {
    /// Authenticate with client credentials and create an OAuth client.
    pub async fn connect_oauth(
        endpoints: Endpoints,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self> {
        let client = build_http_client()?;
        let token_url = format!("{}/oauth2/token", endpoints.api_base);
        let token = request_access_token(&client, &token_url, client_id, client_secret).await?;

        Ok(Self {
            client,
            access: Access::OAuth { token },
            endpoints,
        })
    }

    /// Create a client for the unauthenticated public endpoints.
    pub fn public(endpoints: Endpoints) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            access: Access::Public,
            endpoints,
        })
    }

    /// Create a client for whichever API variant the configuration selects.
    pub async fn from_config(config: &Config, endpoints: Endpoints) -> Result<Self> {
        match config.settings.api {
            ApiVariant::OAuth => {
                Self::connect_oauth(
                    endpoints,
                    &config.credentials.client_id,
                    &config.credentials.client_secret,
                )
                .await
            }
            ApiVariant::Public => Self::public(endpoints),
        }
    }

    /// Which API variant this client talks to.
    pub fn variant(&self) -> ApiVariant {
        match self.access {
            Access::OAuth { .. } => ApiVariant::OAuth,
            Access::Public => ApiVariant::Public,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access {
            Access::OAuth { token } => request.bearer_auth(token),
            Access::Public => request,
        }
    }

    /// Make a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .authorize(self.client.get(url).query(query))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Auth error response: {}", body);
            return Err(Error::Authentication(format!("HTTP {} from {}", status, url)));
        }

        if !status.is_success() {
            return Err(Error::Fetch {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse response from {}: {} - Response: {}",
                url,
                e,
                truncate_for_log(&text, 500)
            ))
        })
    }

    fn listing_url(&self, source: &GallerySource) -> String {
        let base = &self.endpoints.api_base;
        match (&self.access, &source.scope) {
            (Access::OAuth { .. }, GalleryScope::All) => {
                format!("{}/api/v1/oauth2/gallery/all", base)
            }
            (Access::OAuth { .. }, GalleryScope::Folder(id)) => {
                format!("{}/api/v1/oauth2/gallery/{}", base, id)
            }
            (Access::OAuth { .. }, GalleryScope::Collection(id)) => {
                format!("{}/api/v1/oauth2/collections/{}", base, id)
            }
            (Access::Public, GalleryScope::Collection(_)) => {
                format!("{}/_napi/da-user-profile/api/collection/contents", base)
            }
            (Access::Public, _) => {
                format!("{}/_napi/da-user-profile/api/gallery/contents", base)
            }
        }
    }

    fn folders_url(&self, kind: FolderKind) -> String {
        let base = &self.endpoints.api_base;
        match (&self.access, kind) {
            (Access::OAuth { .. }, FolderKind::Gallery) => {
                format!("{}/api/v1/oauth2/gallery/folders", base)
            }
            (Access::OAuth { .. }, FolderKind::Collection) => {
                format!("{}/api/v1/oauth2/collections/folders", base)
            }
            (Access::Public, FolderKind::Gallery) => {
                format!("{}/_napi/da-user-profile/api/gallery/folders", base)
            }
            (Access::Public, FolderKind::Collection) => {
                format!("{}/_napi/da-user-profile/api/collection/folders", base)
            }
        }
    }

    fn base_query(&self, username: &str, cursor: Cursor) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("username", username.to_string()),
            ("offset", cursor.offset.to_string()),
            ("limit", cursor.limit.to_string()),
        ];
        if let Access::OAuth { .. } = self.access {
            query.push(("mature_content", "true".to_string()));
        }
        query
    }
}

#[async_trait]
impl GalleryApi for DeviantArtApi {
    async fn gallery_page(&self, source: &GallerySource, cursor: Cursor) -> Result<GalleryPage> {
        let url = self.listing_url(source);
        let mut query = self.base_query(&source.username, cursor);

        match &self.access {
            Access::OAuth { .. } => {
                let response: PageResponse<Deviation> = self.get_json(&url, &query).await?;
                Ok(into_page(response, parse_deviation))
            }
            Access::Public => {
                match &source.scope {
                    GalleryScope::All => query.push(("all_folder", "true".to_string())),
                    GalleryScope::Folder(id) | GalleryScope::Collection(id) => {
                        query.push(("folderid", id.clone()))
                    }
                }
                let response: PageResponse<PublicGalleryEntry> =
                    self.get_json(&url, &query).await?;
                Ok(into_page(response, parse_public_entry))
            }
        }
    }

    async fn folders_page(
        &self,
        username: &str,
        kind: FolderKind,
        cursor: Cursor,
    ) -> Result<Page<Folder>> {
        let url = self.folders_url(kind);
        let query = self.base_query(username, cursor);
        let response: PageResponse<FolderResponse> = self.get_json(&url, &query).await?;
        Ok(into_page(response, parse_folder))
    }

    async fn resolve(&self, source_url: &str) -> Result<ResolvedAsset> {
        let url = format!("{}/oembed", self.endpoints.oembed_base);
        let query = [("url", source_url.to_string())];

        tracing::debug!("GET {} {:?}", url, query);
        let response = self.client.get(&url).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                status: status.as_u16(),
                url,
            });
        }

        let oembed: OEmbedResponse = response.json().await?;
        let download_url = oembed
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Api(format!("oEmbed response for {} has no url", source_url)))?;

        Ok(ResolvedAsset::new(download_url))
    }

    async fn fetch_asset(&self, url: &str) -> Result<AssetBody> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(AssetBody {
            content_length: response.content_length(),
            stream: response
                .bytes_stream()
                .map_ok(|chunk| chunk.to_vec())
                .map_err(Error::from)
                .boxed(),
        })
    }

    fn page_limit(&self) -> u32 {
        match self.access {
            Access::OAuth { .. } => OAUTH_PAGE_LIMIT,
            Access::Public => PUBLIC_PAGE_LIMIT,
        }
    }
}

fn build_http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))
}

fn truncate_for_log(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

/// Normalize a wire page. A missing `results` key ends the listing.
fn into_page<W, T>(response: PageResponse<W>, parse: impl Fn(&W) -> T) -> Page<T> {
    match response.results {
        None => Page::last(Vec::new()),
        Some(results) => Page {
            results: results.iter().map(parse).collect(),
            has_more: response.has_more.unwrap_or(false),
            next_offset: response.next_offset,
        },
    }
}

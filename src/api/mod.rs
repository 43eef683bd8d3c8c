//! DeviantArt API module.
//!
//! This module provides:
//! - The `GalleryApi` trait the download pipeline is written against
//! - HTTP client for the OAuth2 and public listing endpoints
//! - OAuth2 client-credentials authentication
//! - API response types

pub mod auth;
pub mod client;
pub mod types;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::download::Cursor;
use crate::error::Result;
use crate::media::{Folder, Item, ResolvedAsset};

pub use client::{DeviantArtApi, Endpoints};

/// One page of a listing, normalized across API variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub has_more: bool,
    pub next_offset: Option<u64>,
}

impl<T> Page<T> {
    /// A page that ends the listing.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            has_more: false,
            next_offset: None,
        }
    }
}

/// A page of gallery items.
pub type GalleryPage = Page<Item>;

/// Which part of an account to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryScope {
    /// The unfoldered "all" gallery view.
    All,
    /// One gallery folder.
    Folder(String),
    /// One collection (favourites) folder.
    Collection(String),
}

/// A listing endpoint plus its base query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySource {
    pub username: String,
    pub scope: GalleryScope,
}

impl GallerySource {
    pub fn new(username: impl Into<String>, scope: GalleryScope) -> Self {
        Self {
            username: username.into(),
            scope,
        }
    }
}

/// Which folders listing to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderKind {
    Gallery,
    Collection,
}

/// Raw bytes of a chunked download.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>>>;

/// Response body of an asset download.
pub struct AssetBody {
    pub content_length: Option<u64>,
    pub stream: ByteStream,
}

/// Remote operations the download pipeline needs.
#[async_trait]
pub trait GalleryApi: Send + Sync {
    /// Fetch one page of items.
    async fn gallery_page(&self, source: &GallerySource, cursor: Cursor) -> Result<GalleryPage>;

    /// Fetch one page of folders.
    async fn folders_page(
        &self,
        username: &str,
        kind: FolderKind,
        cursor: Cursor,
    ) -> Result<Page<Folder>>;

    /// Resolve an item's page URL to its full-size asset.
    async fn resolve(&self, source_url: &str) -> Result<ResolvedAsset>;

    /// Open a streaming download of an asset.
    async fn fetch_asset(&self, url: &str) -> Result<AssetBody>;

    /// Page size for item listings.
    fn page_limit(&self) -> u32;
}

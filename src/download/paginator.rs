//! Offset-based pagination over listing endpoints.

use async_trait::async_trait;

use crate::api::{FolderKind, GalleryApi, GallerySource, Page};
use crate::download::interrupt::Interrupt;
use crate::error::{Error, Result};
use crate::media::{Folder, Item};

/// Position in a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: u64,
    pub limit: u32,
}

impl Cursor {
    /// Cursor at the start of a listing.
    pub fn new(limit: u32) -> Self {
        Self { offset: 0, limit }
    }
}

/// Something that can be fetched one page at a time.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    async fn fetch(&self, cursor: Cursor) -> Result<Page<Self::Item>>;
}

/// Item listing of one gallery, folder or collection.
pub struct ItemListing<'a, A: ?Sized> {
    api: &'a A,
    source: GallerySource,
}

impl<'a, A: GalleryApi + ?Sized> ItemListing<'a, A> {
    pub fn new(api: &'a A, source: GallerySource) -> Self {
        Self { api, source }
    }
}

#[async_trait]
impl<A: GalleryApi + ?Sized> PageSource for ItemListing<'_, A> {
    type Item = Item;

    async fn fetch(&self, cursor: Cursor) -> Result<Page<Item>> {
        self.api.gallery_page(&self.source, cursor).await
    }
}

/// Folder listing of an account.
pub struct FolderListing<'a, A: ?Sized> {
    api: &'a A,
    username: String,
    kind: FolderKind,
}

impl<'a, A: GalleryApi + ?Sized> FolderListing<'a, A> {
    pub fn new(api: &'a A, username: impl Into<String>, kind: FolderKind) -> Self {
        Self {
            api,
            username: username.into(),
            kind,
        }
    }
}

#[async_trait]
impl<A: GalleryApi + ?Sized> PageSource for FolderListing<'_, A> {
    type Item = Folder;

    async fn fetch(&self, cursor: Cursor) -> Result<Page<Folder>> {
        self.api.folders_page(&self.username, self.kind, cursor).await
    }
}

/// Lazily walks a listing page by page.
///
/// Call [`Paginator::next_page`] until it returns `Ok(None)`. Any error ends
/// the sequence.
pub struct Paginator<S> {
    source: S,
    cursor: Cursor,
    interrupt: Interrupt,
    finished: bool,
    requests: u64,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S, limit: u32, interrupt: Interrupt) -> Self {
        Self {
            source,
            cursor: Cursor::new(limit),
            interrupt,
            finished: false,
            requests: 0,
        }
    }

    /// Number of listing requests issued so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Fetch the next page, or `None` once the listing is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Page<S::Item>>> {
        if self.finished {
            return Ok(None);
        }

        if self.interrupt.is_triggered() {
            self.finished = true;
            return Err(Error::Interrupted);
        }

        self.requests += 1;
        let page = match self.source.fetch(self.cursor).await {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };

        if !page.has_more {
            self.finished = true;
            return Ok((!page.results.is_empty()).then_some(page));
        }

        // A server-supplied next offset is authoritative; the item count is
        // only a fallback.
        let next_offset = match page.next_offset {
            Some(next) => next,
            None if page.results.is_empty() => {
                self.finished = true;
                return Ok(None);
            }
            None => self.cursor.offset + page.results.len() as u64,
        };

        if next_offset <= self.cursor.offset {
            self.finished = true;
            return Err(Error::Protocol(format!(
                "listing did not advance past offset {} (server reported next offset {})",
                self.cursor.offset, next_offset
            )));
        }

        tracing::debug!(
            "Page at offset {} returned {} items, next offset {}",
            self.cursor.offset,
            page.results.len(),
            next_offset
        );
        self.cursor.offset = next_offset;
        Ok(Some(page))
    }

    /// Drain the listing into a single vector.
    pub async fn collect_all(mut self) -> Result<Vec<S::Item>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page.results);
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves pages from a fixed script and records requested offsets.
    struct Scripted {
        pages: Mutex<Vec<Result<Page<u32>>>>,
        offsets: Mutex<Vec<u64>>,
    }

    impl Scripted {
        fn new(pages: Vec<Result<Page<u32>>>) -> Self {
            Self {
                pages: Mutex::new(pages.into_iter().rev().collect()),
                offsets: Mutex::new(Vec::new()),
            }
        }

        fn offsets(&self) -> Vec<u64> {
            self.offsets.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for &Scripted {
        type Item = u32;

        async fn fetch(&self, cursor: Cursor) -> Result<Page<u32>> {
            self.offsets.lock().unwrap().push(cursor.offset);
            self.pages
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Page::last(Vec::new())))
        }
    }

    fn page(results: Vec<u32>, has_more: bool, next_offset: Option<u64>) -> Result<Page<u32>> {
        Ok(Page {
            results,
            has_more,
            next_offset,
        })
    }

    #[tokio::test]
    async fn test_advances_by_item_count_without_next_offset() {
        let source = Scripted::new(vec![
            page(vec![1, 2], true, None),
            page(vec![3, 4], true, None),
            page(vec![5], false, None),
        ]);
        let all = Paginator::new(&source, 2, Interrupt::new())
            .collect_all()
            .await
            .unwrap();

        assert_eq!(all, vec![1, 2, 3, 4, 5]);
        assert_eq!(source.offsets(), vec![0, 2, 4]);
    }

    #[tokio::test]
    async fn test_server_next_offset_is_authoritative() {
        let source = Scripted::new(vec![
            page(vec![1, 2], true, Some(10)),
            page(vec![3], false, None),
        ]);
        let all = Paginator::new(&source, 2, Interrupt::new())
            .collect_all()
            .await
            .unwrap();

        assert_eq!(all, vec![1, 2, 3]);
        assert_eq!(source.offsets(), vec![0, 10]);
    }

    #[tokio::test]
    async fn test_stuck_offset_is_protocol_error() {
        let source = Scripted::new(vec![
            page(vec![1, 2], true, Some(0)),
            page(vec![1, 2], true, Some(0)),
        ]);
        let mut pages = Paginator::new(&source, 2, Interrupt::new());

        let err = pages.next_page().await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
        assert!(pages.next_page().await.unwrap().is_none());
        assert_eq!(source.offsets(), vec![0]);
    }

    #[tokio::test]
    async fn test_offset_repeated_later_is_protocol_error() {
        let source = Scripted::new(vec![
            page(vec![1, 2], true, Some(2)),
            page(vec![3, 4], true, Some(2)),
        ]);
        let mut pages = Paginator::new(&source, 2, Interrupt::new());

        assert!(pages.next_page().await.unwrap().is_some());
        assert!(matches!(
            pages.next_page().await.unwrap_err(),
            Error::Protocol(_)
        ));
    }

    #[tokio::test]
    async fn test_empty_page_ends_listing() {
        let source = Scripted::new(vec![page(vec![1], true, None), page(vec![], true, None)]);
        let all = Paginator::new(&source, 1, Interrupt::new())
            .collect_all()
            .await
            .unwrap();
        assert_eq!(all, vec![1]);
    }

    #[tokio::test]
    async fn test_empty_page_with_advancing_offset_continues() {
        let source = Scripted::new(vec![
            page(vec![], true, Some(5)),
            page(vec![9], false, None),
        ]);
        let all = Paginator::new(&source, 5, Interrupt::new())
            .collect_all()
            .await
            .unwrap();
        assert_eq!(all, vec![9]);
        assert_eq!(source.offsets(), vec![0, 5]);
    }

    #[tokio::test]
    async fn test_request_bound_for_truthful_server() {
        // 7 items, limit 3: pages of 3, 3, 1
        let source = Scripted::new(vec![
            page(vec![1, 2, 3], true, None),
            page(vec![4, 5, 6], true, None),
            page(vec![7], false, None),
        ]);
        let mut pages = Paginator::new(&source, 3, Interrupt::new());
        while pages.next_page().await.unwrap().is_some() {}

        assert!(pages.requests() <= (7u64).div_ceil(3) + 1);
    }

    #[tokio::test]
    async fn test_fetch_error_is_fatal() {
        let source = Scripted::new(vec![
            page(vec![1], true, None),
            Err(Error::Fetch {
                status: 500,
                url: "http://x".into(),
            }),
        ]);
        let mut pages = Paginator::new(&source, 1, Interrupt::new());
        assert!(pages.next_page().await.unwrap().is_some());
        assert!(matches!(
            pages.next_page().await.unwrap_err(),
            Error::Fetch { status: 500, .. }
        ));
        assert!(pages.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_interrupt_stops_before_request() {
        let source = Scripted::new(vec![page(vec![1], false, None)]);
        let interrupt = Interrupt::new();
        interrupt.trigger();

        let mut pages = Paginator::new(&source, 1, interrupt);
        assert!(matches!(
            pages.next_page().await.unwrap_err(),
            Error::Interrupted
        ));
        assert!(source.offsets().is_empty());
    }
}

//! End-to-end download pipeline tests against an in-memory gallery.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;

use deviantart_downloader::api::{
    AssetBody, FolderKind, GalleryApi, GalleryPage, GalleryScope, GallerySource, Page,
};
use deviantart_downloader::download::{
    Cursor, DownloadSettings, GalleryDownloader, GlobalState, Interrupt,
};
use deviantart_downloader::error::{Error, Result};
use deviantart_downloader::media::{Folder, Item, ResolvedAsset};

fn item(id: &str, downloadable: bool, filetype: Option<&str>) -> Item {
    Item {
        id: id.to_string(),
        title: Some(id.to_string()),
        source_url: Some(format!("https://www.deviantart.com/alice/art/{}", id)),
        is_downloadable: downloadable,
        content_filetype: filetype.map(str::to_string),
    }
}

/// Pages keyed by offset, plus counters for what the pipeline asked for.
#[derive(Default)]
struct MemoryGallery {
    pages: HashMap<u64, GalleryPage>,
    folders: Vec<Folder>,
    folder_pages: HashMap<String, Vec<Item>>,
    asset_delay: Duration,
    listing_requests: AtomicUsize,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetched_urls: Mutex<Vec<String>>,
}

impl MemoryGallery {
    fn alice() -> Self {
        let mut pages = HashMap::new();
        pages.insert(
            0,
            Page {
                results: vec![item("A", true, Some("image/jpeg")), item("B", false, Some("jpg"))],
                has_more: true,
                next_offset: Some(2),
            },
        );
        pages.insert(
            2,
            Page::last(vec![item("C", true, None), item("D", true, Some("jpg"))]),
        );
        Self {
            pages,
            ..Default::default()
        }
    }
}

#[async_trait]
impl GalleryApi for MemoryGallery {
    async fn gallery_page(&self, source: &GallerySource, cursor: Cursor) -> Result<GalleryPage> {
        self.listing_requests.fetch_add(1, Ordering::SeqCst);

        if let GalleryScope::Folder(id) = &source.scope {
            let items = self.folder_pages.get(id).cloned().unwrap_or_default();
            return Ok(Page::last(items));
        }

        Ok(self
            .pages
            .get(&cursor.offset)
            .cloned()
            .unwrap_or_else(|| Page::last(Vec::new())))
    }

    async fn folders_page(
        &self,
        _username: &str,
        kind: FolderKind,
        _cursor: Cursor,
    ) -> Result<Page<Folder>> {
        match kind {
            FolderKind::Gallery => Ok(Page::last(self.folders.clone())),
            FolderKind::Collection => Ok(Page::last(Vec::new())),
        }
    }

    async fn resolve(&self, source_url: &str) -> Result<ResolvedAsset> {
        let id = source_url.rsplit('/').next().unwrap_or_default();
        Ok(ResolvedAsset::new(format!("https://images.example/{}.bin", id)))
    }

    async fn fetch_asset(&self, url: &str) -> Result<AssetBody> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.asset_delay.is_zero() {
            tokio::time::sleep(self.asset_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetched_urls.lock().unwrap().push(url.to_string());

        let bytes = url.as_bytes().to_vec();
        Ok(AssetBody {
            content_length: Some(bytes.len() as u64),
            stream: Box::pin(stream::iter(vec![Ok::<_, Error>(bytes)])),
        })
    }

    fn page_limit(&self) -> u32 {
        2
    }
}

fn settings(limit: usize, default: Option<&str>) -> DownloadSettings {
    DownloadSettings::new(limit, default.map(str::to_string))
}

fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_alice_gallery_end_to_end() {
    let temp = tempfile::tempdir().unwrap();
    let account_dir = temp.path().join("alice");
    std::fs::create_dir_all(&account_dir).unwrap();
    std::fs::write(account_dir.join("D.jpg"), b"old").unwrap();

    let api = MemoryGallery::alice();
    let downloader =
        GalleryDownloader::new(&api, "alice", settings(2, Some("png")), Interrupt::new());
    let mut global = GlobalState::default();

    let state = downloader
        .download_gallery(&account_dir, &mut global)
        .await
        .unwrap();

    assert_eq!(file_names(&account_dir), vec!["A.jpg", "C.png", "D.jpg"]);
    assert_eq!(std::fs::read(account_dir.join("D.jpg")).unwrap(), b"old");

    assert_eq!(state.pages, 2);
    assert_eq!(state.downloaded, 2);
    assert_eq!(state.not_downloadable, 1);
    assert_eq!(state.already_existing, 1);
    assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(global.downloaded, 2);
    assert_eq!(global.skipped, 2);
}

#[tokio::test]
async fn test_rerun_downloads_nothing_new() {
    let temp = tempfile::tempdir().unwrap();
    let account_dir = temp.path().join("alice");

    let api = MemoryGallery::alice();
    let downloader =
        GalleryDownloader::new(&api, "alice", settings(2, Some("png")), Interrupt::new());

    let mut first = GlobalState::default();
    downloader.download_gallery(&account_dir, &mut first).await.unwrap();
    let fetched_first = api.fetches.load(Ordering::SeqCst);
    assert_eq!(first.downloaded, 3);

    let mut second = GlobalState::default();
    let state = downloader
        .download_gallery(&account_dir, &mut second)
        .await
        .unwrap();

    assert_eq!(state.downloaded, 0);
    assert_eq!(state.already_existing, 3);
    assert_eq!(api.fetches.load(Ordering::SeqCst), fetched_first);
    assert_eq!(file_names(&account_dir), vec!["A.jpg", "C.png", "D.jpg"]);
}

#[tokio::test]
async fn test_duplicate_title_on_later_page_is_skipped() {
    let temp = tempfile::tempdir().unwrap();
    let mut api = MemoryGallery::default();
    api.pages.insert(
        0,
        Page {
            results: vec![item("Same", true, Some("png")), item("Other", true, Some("png"))],
            has_more: true,
            next_offset: None,
        },
    );
    api.pages
        .insert(2, Page::last(vec![item("Same", true, Some("png"))]));

    let downloader = GalleryDownloader::new(&api, "alice", settings(1, None), Interrupt::new());
    let mut global = GlobalState::default();
    let state = downloader
        .download_gallery(temp.path(), &mut global)
        .await
        .unwrap();

    assert_eq!(state.pages, 2);
    assert_eq!(state.downloaded, 2);
    assert_eq!(state.already_existing, 1);
    assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(file_names(temp.path()), vec!["Other.png", "Same.png"]);
}

#[tokio::test]
async fn test_non_advancing_offset_is_protocol_error() {
    let temp = tempfile::tempdir().unwrap();
    let mut api = MemoryGallery::default();
    api.pages.insert(
        0,
        Page {
            results: vec![item("A", true, Some("png"))],
            has_more: true,
            next_offset: Some(0),
        },
    );

    let downloader = GalleryDownloader::new(&api, "alice", settings(2, None), Interrupt::new());
    let mut global = GlobalState::default();
    let result = downloader.download_gallery(temp.path(), &mut global).await;

    assert!(matches!(result, Err(Error::Protocol(_))));
    assert_eq!(api.listing_requests.load(Ordering::SeqCst), 1);
    assert_eq!(api.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_request_count_bounded_by_pages() {
    let temp = tempfile::tempdir().unwrap();
    let mut api = MemoryGallery::default();
    for page in 0..5u64 {
        let offset = page * 2;
        let results = vec![
            item(&format!("i{}", offset), true, Some("png")),
            item(&format!("i{}", offset + 1), true, Some("png")),
        ];
        let page = if page == 4 {
            Page::last(results)
        } else {
            Page {
                results,
                has_more: true,
                next_offset: None,
            }
        };
        api.pages.insert(offset, page);
    }

    let downloader = GalleryDownloader::new(&api, "alice", settings(4, None), Interrupt::new());
    let mut global = GlobalState::default();
    let state = downloader
        .download_gallery(temp.path(), &mut global)
        .await
        .unwrap();

    assert_eq!(state.pages, 5);
    assert_eq!(state.downloaded, 10);
    assert_eq!(api.listing_requests.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_concurrency_never_exceeds_limit() {
    let temp = tempfile::tempdir().unwrap();
    let mut api = MemoryGallery {
        asset_delay: Duration::from_millis(20),
        ..Default::default()
    };
    let items = (0..12).map(|i| item(&format!("n{}", i), true, Some("png"))).collect();
    api.pages.insert(0, Page::last(items));

    let downloader = GalleryDownloader::new(&api, "alice", settings(3, None), Interrupt::new());
    let mut global = GlobalState::default();
    let state = downloader
        .download_gallery(temp.path(), &mut global)
        .await
        .unwrap();

    assert_eq!(state.downloaded, 12);
    assert!(api.max_in_flight.load(Ordering::SeqCst) <= 3);
    assert!(api.max_in_flight.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_folder_download_by_id() {
    let temp = tempfile::tempdir().unwrap();
    let mut api = MemoryGallery::default();
    api.folders = vec![Folder {
        folder_id: "F00-1".into(),
        name: "Sketches".into(),
    }];
    api.folder_pages
        .insert("F00-1".into(), vec![item("S1", true, Some("png"))]);

    let downloader = GalleryDownloader::new(&api, "alice", settings(2, None), Interrupt::new());
    let mut global = GlobalState::default();
    let state = downloader
        .download_folder_by_id("f00-1", temp.path(), &mut global)
        .await
        .unwrap();

    assert_eq!(state.label, "alice/Sketches");
    assert!(temp.path().join("Sketches").join("S1.png").exists());

    let missing = downloader
        .download_folder_by_id("nope", temp.path(), &mut global)
        .await;
    assert!(matches!(missing, Err(Error::FolderNotFound(_))));
}

#[tokio::test]
async fn test_interrupted_run_stops_listing() {
    let temp = tempfile::tempdir().unwrap();
    let api = MemoryGallery::alice();
    let interrupt = Interrupt::new();
    interrupt.trigger();

    let downloader = GalleryDownloader::new(&api, "alice", settings(2, Some("png")), interrupt);
    let mut global = GlobalState::default();
    let result = downloader.download_gallery(temp.path(), &mut global).await;

    assert!(matches!(result, Err(Error::Interrupted)));
    assert_eq!(api.listing_requests.load(Ordering::SeqCst), 0);
    assert_eq!(global.destinations_processed, 1);
}

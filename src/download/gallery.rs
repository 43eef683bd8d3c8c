//! Gallery, folder and collection download logic.

use std::path::Path;

use crate::api::client::FOLDER_PAGE_LIMIT;
use crate::api::{FolderKind, GalleryApi, GalleryScope, GallerySource};
use crate::download::interrupt::Interrupt;
use crate::download::item::{DownloadSettings, ItemDownloader};
use crate::download::paginator::{FolderListing, ItemListing, Paginator};
use crate::download::state::{DownloadState, GlobalState};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, get_collection_folder, get_gallery_folder};
use crate::media::Folder;

/// List every folder of an account.
pub async fn list_folders<A: GalleryApi + ?Sized>(
    api: &A,
    username: &str,
    kind: FolderKind,
    interrupt: &Interrupt,
) -> Result<Vec<Folder>> {
    Paginator::new(
        FolderListing::new(api, username, kind),
        FOLDER_PAGE_LIMIT,
        interrupt.clone(),
    )
    .collect_all()
    .await
}

/// Find a gallery folder by ID (case-insensitive).
pub fn find_folder<'f>(folders: &'f [Folder], folder_id: &str) -> Result<&'f Folder> {
    folders
        .iter()
        .find(|f| f.folder_id.eq_ignore_ascii_case(folder_id))
        .ok_or_else(|| Error::FolderNotFound(folder_id.to_string()))
}

/// Drives the paginator and item downloader for one account.
pub struct GalleryDownloader<'a, A: ?Sized> {
    api: &'a A,
    username: String,
    items: ItemDownloader<'a, A>,
    interrupt: Interrupt,
}

impl<'a, A: GalleryApi + ?Sized> GalleryDownloader<'a, A> {
    pub fn new(
        api: &'a A,
        username: impl Into<String>,
        settings: DownloadSettings,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            api,
            username: username.into(),
            items: ItemDownloader::new(api, settings, interrupt.clone()),
            interrupt,
        }
    }

    /// Download one listing into `destination`, page by page.
    ///
    /// Each page's items are all finished before the next page is requested.
    /// Partial statistics are added to `global` even when the listing fails.
    pub async fn download_source(
        &self,
        scope: GalleryScope,
        destination: &Path,
        label: &str,
        global: &mut GlobalState,
    ) -> Result<DownloadState> {
        ensure_dir(destination).await?;
        tracing::info!("Downloading {} into {}", label, destination.display());

        let mut state = DownloadState::new(label);
        let result = self.walk_pages(scope, destination, &mut state).await;
        global.add_destination_stats(&state);
        result.map(|()| state)
    }

    async fn walk_pages(
        &self,
        scope: GalleryScope,
        destination: &Path,
        state: &mut DownloadState,
    ) -> Result<()> {
        let source = GallerySource::new(self.username.clone(), scope);
        let mut pages = Paginator::new(
            ItemListing::new(self.api, source),
            self.api.page_limit(),
            self.interrupt.clone(),
        );

        while let Some(page) = pages.next_page().await? {
            state.increment_pages();
            tracing::debug!("Processing page {} ({} items)", state.pages, page.results.len());

            for outcome in self.items.process_page(&page, destination).await {
                state.record(&outcome);
            }
        }

        Ok(())
    }

    /// Download the unfoldered "all" view into the account folder.
    pub async fn download_gallery(
        &self,
        account_dir: &Path,
        global: &mut GlobalState,
    ) -> Result<DownloadState> {
        self.download_source(GalleryScope::All, account_dir, &self.username, global)
            .await
    }

    /// Download one gallery folder, named after the folder.
    pub async fn download_folder(
        &self,
        folder: &Folder,
        account_dir: &Path,
        global: &mut GlobalState,
    ) -> Result<DownloadState> {
        let destination = get_gallery_folder(account_dir, &folder.name);
        let label = format!("{}/{}", self.username, folder.name);
        self.download_source(
            GalleryScope::Folder(folder.folder_id.clone()),
            &destination,
            &label,
            global,
        )
        .await
    }

    /// Look up a gallery folder by ID and download it.
    pub async fn download_folder_by_id(
        &self,
        folder_id: &str,
        account_dir: &Path,
        global: &mut GlobalState,
    ) -> Result<DownloadState> {
        let folders =
            list_folders(self.api, &self.username, FolderKind::Gallery, &self.interrupt).await?;
        let folder = find_folder(&folders, folder_id)?;
        self.download_folder(folder, account_dir, global).await
    }

    /// Download the "all" view followed by every gallery folder.
    pub async fn download_all(
        &self,
        account_dir: &Path,
        global: &mut GlobalState,
    ) -> Result<Vec<DownloadState>> {
        let mut states = vec![self.download_gallery(account_dir, global).await?];

        let folders = list_folders(self.api, &self.username, FolderKind::Gallery, &self.interrupt)
            .await?;
        tracing::info!("Found {} gallery folders", folders.len());

        for folder in &folders {
            states.push(self.download_folder(folder, account_dir, global).await?);
        }

        Ok(states)
    }

    /// Download every collection folder under `<account>/Collections`.
    pub async fn download_collections(
        &self,
        account_dir: &Path,
        global: &mut GlobalState,
    ) -> Result<Vec<DownloadState>> {
        let collections = list_folders(
            self.api,
            &self.username,
            FolderKind::Collection,
            &self.interrupt,
        )
        .await?;

        if collections.is_empty() {
            tracing::info!("No collections found for {}", self.username);
            return Ok(Vec::new());
        }
        tracing::info!("Found {} collections", collections.len());

        let mut states = Vec::with_capacity(collections.len());
        for collection in &collections {
            let destination = get_collection_folder(account_dir, &collection.name);
            let label = format!("{}/Collections/{}", self.username, collection.name);
            states.push(
                self.download_source(
                    GalleryScope::Collection(collection.folder_id.clone()),
                    &destination,
                    &label,
                    global,
                )
                .await?,
            );
        }

        Ok(states)
    }
}

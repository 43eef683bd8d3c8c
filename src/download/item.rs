//! Per-item downloading under a concurrency cap.

use std::path::Path;

use futures::future::join_all;
use futures::StreamExt;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;

use crate::api::{AssetBody, GalleryApi, GalleryPage};
use crate::config::Config;
use crate::download::interrupt::Interrupt;
use crate::download::state::{ItemOutcome, SkipReason};
use crate::error::{Error, Result};
use crate::fs::destination_path;
use crate::media::Item;
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Settings the item downloader needs, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    /// Maximum number of items handled at once. Always >= 1.
    pub concurrency_limit: usize,
    pub default_filetype: Option<String>,
    pub show_downloads: bool,
    pub show_skipped: bool,
}

impl DownloadSettings {
    pub fn new(concurrency_limit: usize, default_filetype: Option<String>) -> Self {
        Self {
            concurrency_limit: concurrency_limit.max(1),
            default_filetype,
            show_downloads: true,
            show_skipped: true,
        }
    }

    /// Take the download settings from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            concurrency_limit: config.concurrency_limit()?,
            default_filetype: config.settings.default_filetype.clone(),
            show_downloads: config.settings.show_downloads,
            show_skipped: config.settings.show_skipped_downloads,
        })
    }
}

/// Downloads the items of a page, at most `concurrency_limit` at a time.
pub struct ItemDownloader<'a, A: ?Sized> {
    api: &'a A,
    settings: DownloadSettings,
    semaphore: Semaphore,
    interrupt: Interrupt,
}

impl<'a, A: GalleryApi + ?Sized> ItemDownloader<'a, A> {
    pub fn new(api: &'a A, settings: DownloadSettings, interrupt: Interrupt) -> Self {
        let semaphore = Semaphore::new(settings.concurrency_limit.max(1));
        Self {
            api,
            settings,
            semaphore,
            interrupt,
        }
    }

    /// Handle every item of a page and wait for all of them.
    ///
    /// Individual failures are logged and reported in the returned outcomes;
    /// they never cancel sibling items.
    pub async fn process_page(&self, page: &GalleryPage, destination: &Path) -> Vec<ItemOutcome> {
        join_all(
            page.results
                .iter()
                .map(|item| self.process_item(item, destination)),
        )
        .await
    }

    /// Handle one item while holding a semaphore permit.
    pub async fn process_item(&self, item: &Item, destination: &Path) -> ItemOutcome {
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => return ItemOutcome::Failed(format!("Semaphore acquire failed: {}", e)),
        };

        if self.interrupt.is_triggered() {
            tracing::debug!("Skipped {} (interrupted)", display_name(item));
            return ItemOutcome::Skipped(SkipReason::Interrupted);
        }

        match self.download_item(item, destination).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", display_name(item), e);
                ItemOutcome::Failed(e.to_string())
            }
        }
    }

    async fn download_item(&self, item: &Item, destination: &Path) -> Result<ItemOutcome> {
        let (Some(title), Some(source_url)) = (
            item.title.as_deref().filter(|_| item.has_required_metadata()),
            item.source_url.as_deref(),
        ) else {
            self.log_skip(&format!(
                "Skipped item {} (missing title or URL)",
                display_name(item)
            ));
            return Ok(ItemOutcome::Skipped(SkipReason::MissingMetadata));
        };

        if !item.is_downloadable {
            tracing::debug!("Skipped {} (not downloadable)", title);
            return Ok(ItemOutcome::Skipped(SkipReason::NotDownloadable));
        }

        let Some(extension) = item.extension(self.settings.default_filetype.as_deref()) else {
            self.log_skip(&format!(
                "Skipped {} (missing filetype information and no default filetype)",
                title
            ));
            return Ok(ItemOutcome::Skipped(SkipReason::MissingFiletype));
        };

        let output_path = destination_path(destination, title, &extension);
        if tokio::fs::try_exists(&output_path).await? {
            self.log_skip(&format!("Skipped {} (already exists)", file_name(&output_path)));
            return Ok(ItemOutcome::Skipped(SkipReason::AlreadyExists));
        }

        let asset = self.api.resolve(source_url).await?;
        if let Some(suggested) = &asset.suggested_filetype {
            if suggested != &extension {
                tracing::debug!(
                    "{}: saving as .{} although the asset URL suggests .{}",
                    title,
                    extension,
                    suggested
                );
            }
        }

        let body = self.api.fetch_asset(&asset.download_url).await?;
        if !write_new_file(&output_path, body, self.settings.show_downloads).await? {
            self.log_skip(&format!("Skipped {} (already exists)", file_name(&output_path)));
            return Ok(ItemOutcome::Skipped(SkipReason::AlreadyExists));
        }

        if self.settings.show_downloads {
            tracing::info!("Downloaded {}", output_path.display());
        } else {
            tracing::debug!("Downloaded {}", output_path.display());
        }

        Ok(ItemOutcome::Downloaded(output_path))
    }

    fn log_skip(&self, message: &str) {
        if self.settings.show_skipped {
            tracing::info!("{}", message);
        } else {
            tracing::debug!("{}", message);
        }
    }
}

/// Stream a body into a file that must not exist yet.
///
/// Returns `Ok(false)` when another writer created the file first. A failure
/// mid-stream leaves the partial file behind.
async fn write_new_file(path: &Path, body: AssetBody, show_progress: bool) -> Result<bool> {
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    let progress = body
        .content_length
        .filter(|len| show_progress && *len > PROGRESS_THRESHOLD)
        .map(|len| create_download_bar(&file_name(path), len));

    let mut stream = body.stream;
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(ref pb) = progress {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(true)
}

fn display_name(item: &Item) -> String {
    match (&item.title, item.id.is_empty()) {
        (Some(title), _) => title.clone(),
        (None, false) => item.id.clone(),
        (None, true) => "<unknown>".to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! Download state tracking.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Why an item was not downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No title or source URL.
    MissingMetadata,
    /// The artist disabled downloads.
    NotDownloadable,
    /// No declared filetype and no default.
    MissingFiletype,
    /// A file with the destination name is already on disk.
    AlreadyExists,
    /// The run was interrupted before the item started.
    Interrupted,
}

/// Result of handling one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Downloaded(PathBuf),
    Skipped(SkipReason),
    Failed(String),
}

/// Per-destination download state.
#[derive(Debug, Default)]
pub struct DownloadState {
    /// Label shown in statistics, e.g. `alice` or `alice/Sketches`.
    pub label: String,

    pub pages: u64,
    pub downloaded: u64,
    pub already_existing: u64,
    pub not_downloadable: u64,
    pub missing_metadata: u64,
    pub interrupted: u64,
    pub failed: u64,
}

impl DownloadState {
    /// Create a new download state for a destination.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Count one item outcome.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Downloaded(_) => self.downloaded += 1,
            ItemOutcome::Skipped(SkipReason::AlreadyExists) => self.already_existing += 1,
            ItemOutcome::Skipped(SkipReason::NotDownloadable) => self.not_downloadable += 1,
            ItemOutcome::Skipped(SkipReason::MissingMetadata)
            | ItemOutcome::Skipped(SkipReason::MissingFiletype) => self.missing_metadata += 1,
            ItemOutcome::Skipped(SkipReason::Interrupted) => self.interrupted += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Increment page count.
    pub fn increment_pages(&mut self) {
        self.pages += 1;
    }

    /// Items that were looked at but not downloaded.
    pub fn skipped(&self) -> u64 {
        self.already_existing + self.not_downloadable + self.missing_metadata + self.interrupted
    }

    /// Every item seen.
    pub fn total_items(&self) -> u64 {
        self.downloaded + self.skipped() + self.failed
    }
}

/// Statistics across every destination of a run.
#[derive(Debug)]
pub struct GlobalState {
    pub started: Instant,
    pub destinations_processed: u64,
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            destinations_processed: 0,
            downloaded: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

impl GlobalState {
    /// Add statistics from one destination.
    pub fn add_destination_stats(&mut self, state: &DownloadState) {
        self.downloaded += state.downloaded;
        self.skipped += state.skipped();
        self.failed += state.failed;
        self.destinations_processed += 1;
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

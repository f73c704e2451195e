//! Sync engine for mirroring Workable into a local file tree
//!
//! Runs are incremental: a record is only rewritten when the remote snapshot
//! is strictly newer than the local baseline. A run must not overlap with
//! another run against the same base directory.

mod candidates;
mod freshness;
mod jobs;
mod quarantine;

pub use candidates::{CandidateSyncStats, sync_candidates};
pub use freshness::{baseline_updated_at, is_newer, parse_timestamp, should_update};
pub use jobs::{JobSyncStats, sync_jobs};
pub use quarantine::move_disqualified_candidates;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Options shared by the sync operations
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Root of the local tree (`candidates/`, `jobs/` live underneath)
    pub base_dir: PathBuf,
    /// Only fetch entities updated after this ISO-8601 timestamp
    pub updated_after: Option<String>,
    /// Threads available for per-entity detail work
    pub detail_workers: usize,
}

impl SyncOptions {
    pub const DEFAULT_DETAIL_WORKERS: usize = 8;

    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            updated_after: None,
            detail_workers: Self::DEFAULT_DETAIL_WORKERS,
        }
    }

    pub fn updated_after(mut self, updated_after: Option<String>) -> Self {
        self.updated_after = updated_after;
        self
    }

    pub fn detail_workers(mut self, workers: usize) -> Self {
        self.detail_workers = workers.max(1);
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Thread pool for per-entity fan-out. Network calls made from it are still
/// serialized by the client's scheduler.
fn worker_pool(options: &SyncOptions, name: &'static str) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(options.detail_workers.max(1))
        .thread_name(move |i| format!("{}-{}", name, i))
        .build()
        .context("Failed to start worker pool")
}

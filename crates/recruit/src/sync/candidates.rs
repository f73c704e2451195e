//! Candidate sync implementation

use anyhow::{Context, Result};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use super::{SyncOptions, should_update, worker_pool};
use crate::models::{Candidate, CandidateDetail};
use crate::render::render_profile;
use crate::storage::{RecordDir, files};
use crate::workable::WorkableClient;

/// Statistics from a candidate sync
#[derive(Debug, Default, Clone)]
pub struct CandidateSyncStats {
    /// Candidates seen in the remote listing
    pub processed: usize,
    /// Candidates whose baseline was rewritten and details refetched
    pub updated: usize,
    /// Candidates whose local baseline was already current
    pub skipped: usize,
    /// Detail tasks that failed before writing the detail snapshot
    pub detail_failures: usize,
    /// Secondary artifacts (profile, resume, cover letter) that failed
    pub artifact_failures: usize,
    /// Duration of the sync operation
    pub duration_ms: u64,
}

/// Sync a job's candidates from Workable into `<base_dir>/candidates/`
///
/// Pages are consumed as they arrive. For every candidate that is newer than
/// its local baseline, the baseline is written immediately and a detail task
/// is handed to the worker pool, so detail fetching overlaps with paging.
/// All detail tasks finish before this returns, even when listing fails.
///
/// # Errors
/// Fails if listing candidates fails or a baseline cannot be written.
/// Failures inside detail tasks are logged and counted, never returned.
pub fn sync_candidates(
    client: &WorkableClient,
    shortcode: &str,
    options: &SyncOptions,
) -> Result<CandidateSyncStats> {
    info!("Downloading candidates for job: {}", shortcode);

    let start = Instant::now();
    let pool = worker_pool(options, "candidate-detail")?;
    let collection = options.base_dir.join(files::CANDIDATES_DIR);
    let detail_failures = AtomicUsize::new(0);
    let artifact_failures = AtomicUsize::new(0);
    let mut stats = CandidateSyncStats::default();

    let listing: Result<()> = pool.in_place_scope(|scope| {
        let pages = client.candidates(shortcode, options.updated_after.as_deref())?;

        for page in pages {
            let page =
                page.with_context(|| format!("Failed to list candidates for {}", shortcode))?;

            for candidate in page.items {
                stats.processed += 1;

                let label = candidate.record_key().to_string();
                let record = RecordDir::open_in(&collection, &label)?;

                if !should_update(&candidate, record.path()) {
                    info!("Skipping candidate (up to date): {}", label);
                    stats.skipped += 1;
                    continue;
                }

                info!("Updating candidate: {}", label);

                // Baseline first: a crash during the detail task must not
                // cause the same snapshot to be downloaded forever.
                record.write_json(files::CANDIDATE_INDEX, &candidate)?;
                stats.updated += 1;

                let detail_failures = &detail_failures;
                let artifact_failures = &artifact_failures;
                scope.spawn(move |_| {
                    match process_candidate_details(client, &candidate, &record) {
                        Ok(failed) => {
                            artifact_failures.fetch_add(failed, Ordering::Relaxed);
                        }
                        Err(e) => {
                            error!("  Failed to process details for {}: {:#}", label, e);
                            detail_failures.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        }

        info!("Processing details for {} candidates...", stats.updated);
        Ok(())
    });
    listing?;

    stats.detail_failures = detail_failures.into_inner();
    stats.artifact_failures = artifact_failures.into_inner();
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!("Processed {} candidates", stats.processed);
    Ok(stats)
}

/// Fetch and persist one candidate's details and derived artifacts.
///
/// Returns the number of secondary artifacts that could not be saved.
fn process_candidate_details(
    client: &WorkableClient,
    candidate: &Candidate,
    record: &RecordDir,
) -> Result<usize> {
    let label = candidate.record_key();
    info!("Processing details for {}", label);

    let detail = client
        .candidate(candidate.id())
        .with_context(|| format!("Failed to fetch candidate {}", candidate.id().as_str()))?;
    record.write_json(files::CANDIDATE_DETAIL, &detail)?;

    let mut failed = 0;

    let profile = CandidateDetail::deserialize(&detail)
        .map_err(anyhow::Error::from)
        .and_then(|view| record.write_text(files::CANDIDATE_PROFILE, &render_profile(&view)));
    match profile {
        Ok(()) => info!("  Generated profile for {}", label),
        Err(e) => {
            warn!("  Failed to write profile for {}: {:#}", label, e);
            failed += 1;
        }
    }

    if let Some(url) = text_field(&detail, "resume_url") {
        let saved = client
            .download(url)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| record.write_bytes(files::CANDIDATE_RESUME, &bytes));
        match saved {
            Ok(()) => info!("  Downloaded resume for {}", label),
            Err(e) => {
                warn!("  Failed to download resume for {}: {:#}", label, e);
                failed += 1;
            }
        }
    }

    if let Some(cover_letter) = text_field(&detail, "cover_letter") {
        match record.write_text(files::CANDIDATE_COVER_LETTER, cover_letter) {
            Ok(()) => info!("  Saved cover letter for {}", label),
            Err(e) => {
                warn!("  Failed to save cover letter for {}: {:#}", label, e);
                failed += 1;
            }
        }
    }

    Ok(failed)
}

/// A non-empty string field of a detail snapshot
fn text_field<'a>(detail: &'a Value, key: &str) -> Option<&'a str> {
    detail.get(key).and_then(Value::as_str).filter(|text| !text.is_empty())
}

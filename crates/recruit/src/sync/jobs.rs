//! Job sync implementation

use anyhow::{Context, Result};
use log::{error, info};
use rayon::prelude::*;
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;

use super::{SyncOptions, worker_pool};
use crate::models::{Job, StagesResponse};
use crate::render::render_stages;
use crate::storage::{RecordDir, files};
use crate::workable::WorkableClient;

/// Statistics from a job sync
#[derive(Debug, Default, Clone)]
pub struct JobSyncStats {
    /// Number of jobs listed and written
    pub jobs: usize,
    /// Number of jobs whose stages could not be fetched or written
    pub stage_failures: usize,
    /// Duration of the sync operation
    pub duration_ms: u64,
}

/// Sync every job and its recruitment stages into `<base_dir>/jobs/`
///
/// Jobs are processed in parallel. A stage failure only affects its own job.
pub fn sync_jobs(client: &WorkableClient, options: &SyncOptions) -> Result<JobSyncStats> {
    info!("Fetching all jobs...");

    let start = Instant::now();
    let jobs = client
        .jobs(options.updated_after.as_deref())
        .context("Failed to list jobs")?;

    let collection = options.base_dir.join(files::JOBS_DIR);
    let pool = worker_pool(options, "job")?;
    let results: Vec<Result<bool>> = pool.install(|| {
        jobs.par_iter()
            .map(|job| process_job(client, job, &collection))
            .collect()
    });

    let mut stats = JobSyncStats {
        jobs: jobs.len(),
        ..JobSyncStats::default()
    };
    for result in results {
        if !result? {
            stats.stage_failures += 1;
        }
    }
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!("Processed {} jobs", stats.jobs);
    Ok(stats)
}

/// Write one job's index and stages. Returns whether the stages were saved.
fn process_job(client: &WorkableClient, job: &Job, collection: &Path) -> Result<bool> {
    info!("Processing job: {} ({})", job.title(), job.shortcode());

    let record = RecordDir::open_in(collection, job.shortcode())?;
    record.write_json(files::JOB_INDEX, job)?;

    match write_stages(client, job, &record) {
        Ok(count) => {
            info!("  Processed {} stages for {}", count, job.title());
            Ok(true)
        }
        Err(e) => {
            error!("  Failed to process stages for {}: {:#}", job.title(), e);
            Ok(false)
        }
    }
}

fn write_stages(client: &WorkableClient, job: &Job, record: &RecordDir) -> Result<usize> {
    let raw = client.job_stages(job.shortcode())?;
    record.write_json(files::JOB_STAGES, &raw)?;

    let stages = StagesResponse::deserialize(&raw).context("Failed to read stages")?;
    record.write_text(files::JOB_STAGES_MARKDOWN, &render_stages(job, &stages))?;
    Ok(stages.stages.len())
}

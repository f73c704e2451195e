//! Wable - Incremental Workable mirror
//!
//! Command-line entry point. Runs the requested actions in order:
//! jobs, candidates, then quarantine of disqualified candidates.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use recruit::{Credentials, SyncOptions, WorkableClient};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "wable", version, about = "Mirror Workable jobs and candidates to disk")]
struct Args {
    /// Download all jobs and their recruitment stages
    #[arg(long)]
    get_jobs: bool,

    /// Download the candidates of the job given by --shortcode
    #[arg(long)]
    get_candidates: bool,

    /// Job shortcode for --get-candidates
    #[arg(long)]
    shortcode: Option<String>,

    /// Only fetch entities updated after this ISO-8601 timestamp
    #[arg(long)]
    updated_after: Option<String>,

    /// Move disqualified candidates into this directory
    #[arg(long, value_name = "DIR")]
    move_disqualified_candidates_to: Option<PathBuf>,

    /// Workable subdomain (falls back to the credentials file, then WORKABLE_SUBDOMAIN)
    #[arg(long)]
    subdomain: Option<String>,

    /// Workable API token (falls back to the credentials file, then WORKABLE_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Root of the local mirror
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Threads used for per-candidate and per-job detail work
    #[arg(long, default_value_t = SyncOptions::DEFAULT_DETAIL_WORKERS)]
    detail_workers: usize,
}

impl Args {
    fn needs_api(&self) -> bool {
        self.get_jobs || self.get_candidates
    }

    fn sync_options(&self) -> SyncOptions {
        SyncOptions::new(&self.base_dir)
            .updated_after(self.updated_after.clone())
            .detail_workers(self.detail_workers)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.needs_api() && args.move_disqualified_candidates_to.is_none() {
        warn!("Nothing to do: pass --get-jobs, --get-candidates or --move-disqualified-candidates-to");
        return Ok(());
    }

    // Validate before touching the network
    if args.get_candidates && args.shortcode.is_none() {
        anyhow::bail!("--shortcode is required with --get-candidates");
    }

    if args.needs_api() {
        if let Err(e) = config::init() {
            warn!("Failed to initialize config directory: {}", e);
        }

        let credentials = Credentials::resolve(args.subdomain.clone(), args.token.clone())?;
        let client = WorkableClient::new(&credentials)?;
        let options = args.sync_options();

        if args.get_jobs {
            let stats = recruit::sync_jobs(&client, &options)?;
            info!(
                "Job sync complete: {} jobs, {} stage failures in {}ms",
                stats.jobs, stats.stage_failures, stats.duration_ms
            );
        }

        if args.get_candidates
            && let Some(shortcode) = &args.shortcode
        {
            let stats = recruit::sync_candidates(&client, shortcode, &options)
                .with_context(|| format!("Candidate sync failed for {}", shortcode))?;
            info!(
                "Candidate sync complete: {} processed, {} updated, {} skipped, {} detail failures in {}ms",
                stats.processed,
                stats.updated,
                stats.skipped,
                stats.detail_failures,
                stats.duration_ms
            );
        }
    }

    if let Some(move_to) = &args.move_disqualified_candidates_to {
        recruit::move_disqualified_candidates(&args.base_dir, move_to)?;
    }

    Ok(())
}

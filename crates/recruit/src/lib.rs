//! Recruit crate - Incremental Workable sync
//!
//! This crate mirrors a Workable account into a local directory tree:
//! - Domain models (Candidate, Job, Stage, rate-limit state)
//! - Workable API client behind a single-flight, rate-limited scheduler
//! - Streaming cursor pagination
//! - Freshness-gated candidate sync with parallel detail fetching
//! - Job and stage snapshots
//! - Quarantine of disqualified candidates
//!
//! The crate has no CLI dependencies; `wable` is a thin front end over it.

pub mod config;
pub mod models;
pub mod render;
pub mod storage;
pub mod sync;
pub mod workable;

pub use config::Credentials;
pub use models::{Candidate, CandidateDetail, CandidateId, Job, RateLimitState, Stage, StagesResponse};
pub use render::{render_profile, render_stages};
pub use storage::RecordDir;
pub use sync::{
    CandidateSyncStats, JobSyncStats, SyncOptions, is_newer, move_disqualified_candidates,
    should_update, sync_candidates, sync_jobs,
};
pub use workable::{
    ApiError, HttpResponse, InMemoryTransport, Page, Pager, RequestScheduler, SchedulerConfig,
    Transport, UreqTransport, WorkableClient,
};

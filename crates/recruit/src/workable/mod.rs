//! Workable API integration
//!
//! This module provides:
//! - A transport seam over blocking HTTP (ureq in production)
//! - A single-flight request scheduler that respects the API rate limit
//! - Cursor-driven pagination that streams pages lazily
//! - The Workable client built on top of those pieces

mod client;
mod error;
mod pager;
mod scheduler;
mod transport;

pub use client::WorkableClient;
pub use error::ApiError;
pub use pager::{Page, Pager};
pub use scheduler::{RequestScheduler, SchedulerConfig};
pub use transport::{HttpResponse, InMemoryTransport, RecordedRequest, Transport, UreqTransport};

/// Workable API response envelopes
pub mod api {
    use serde::Deserialize;

    /// `paging` block of a list response
    #[derive(Debug, Default, Deserialize)]
    pub struct Paging {
        #[serde(default)]
        pub next: Option<String>,
    }

    /// Envelope of `GET /candidates/{id}`
    #[derive(Debug, Deserialize)]
    pub struct CandidateEnvelope {
        pub candidate: serde_json::Value,
    }
}

//! Workable API HTTP client
//!
//! Provides methods for listing jobs and candidates and fetching candidate
//! details. All authenticated calls go through the client's
//! [`RequestScheduler`]; attachment downloads do not, since they hit
//! presigned storage URLs outside the API quota.

use anyhow::{Context, Result};
use log::warn;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use super::api::CandidateEnvelope;
use super::{ApiError, HttpResponse, Pager, RequestScheduler, SchedulerConfig, Transport, UreqTransport};
use crate::config::Credentials;
use crate::models::{Candidate, CandidateId, Job};

/// Workable API client
pub struct WorkableClient {
    base_url: String,
    token: String,
    transport: Arc<dyn Transport>,
    scheduler: RequestScheduler,
}

impl WorkableClient {
    /// Largest page size the candidates endpoint accepts
    pub const PAGE_SIZE: u32 = 100;

    /// Create a client for the account described by `credentials`
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_transport(
            Self::base_url_for(&credentials.subdomain),
            credentials.token.clone(),
            Arc::new(UreqTransport::new()),
            SchedulerConfig::default(),
        )
        .context("Failed to start request scheduler")
    }

    /// Create a client with an explicit base URL, transport and scheduler timing
    pub fn with_transport(
        base_url: impl Into<String>,
        token: impl Into<String>,
        transport: Arc<dyn Transport>,
        config: SchedulerConfig,
    ) -> std::io::Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            transport,
            scheduler: RequestScheduler::new(config)?,
        })
    }

    /// API root for a Workable account subdomain
    pub fn base_url_for(subdomain: &str) -> String {
        format!("https://{}.workable.com/spi/v3", subdomain)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticated, scheduled GET. Non-2xx responses become errors.
    pub(crate) fn fetch(&self, url: &str) -> Result<HttpResponse, ApiError> {
        let transport = Arc::clone(&self.transport);
        let token = self.token.clone();
        let target = url.to_string();

        let response = self
            .scheduler
            .schedule(move || transport.get(&target, Some(&token)))?;

        if response.status == 429 {
            warn!("Rate limit exceeded for {}", url);
        }

        response.error_for_status()
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    /// URL of the first jobs page
    pub fn jobs_url(&self, updated_after: Option<&str>) -> Result<String, ApiError> {
        let mut params = Vec::new();
        if let Some(after) = updated_after {
            params.push(("updated_after", after));
        }
        self.endpoint("/jobs", &params)
    }

    /// URL of the first candidates page for a job
    pub fn candidates_url(
        &self,
        shortcode: &str,
        updated_after: Option<&str>,
    ) -> Result<String, ApiError> {
        let limit = Self::PAGE_SIZE.to_string();
        let mut params = vec![("limit", limit.as_str())];
        if let Some(after) = updated_after {
            params.push(("updated_after", after));
        }
        self.endpoint(
            &format!("/jobs/{}/candidates", urlencoding::encode(shortcode)),
            &params,
        )
    }

    /// List every job, following pagination to the end
    pub fn jobs(&self, updated_after: Option<&str>) -> Result<Vec<Job>, ApiError> {
        let url = self.jobs_url(updated_after)?;
        Pager::new(self, "jobs", url).collect_all()
    }

    /// Stream the candidates of a job page by page
    pub fn candidates(
        &self,
        shortcode: &str,
        updated_after: Option<&str>,
    ) -> Result<Pager<'_, Candidate>, ApiError> {
        let url = self.candidates_url(shortcode, updated_after)?;
        Ok(Pager::new(self, "candidates", url))
    }

    /// Get the full candidate record, exactly as the API returned it
    pub fn candidate(&self, id: &CandidateId) -> Result<Value, ApiError> {
        let url = self.endpoint(
            &format!("/candidates/{}", urlencoding::encode(id.as_str())),
            &[],
        )?;
        let envelope: CandidateEnvelope = self.fetch(&url)?.json()?;
        Ok(envelope.candidate)
    }

    /// Get the recruitment pipeline of a job, exactly as the API returned it
    pub fn job_stages(&self, shortcode: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(
            &format!("/jobs/{}/stages", urlencoding::encode(shortcode)),
            &[],
        )?;
        self.fetch(&url)?.json()
    }

    /// Download an attachment from a presigned URL.
    ///
    /// Not scheduled and never authenticated: the API token must not leak to
    /// third-party storage.
    pub fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.transport.get(url, None)?.error_for_status()?;
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workable::InMemoryTransport;
    use serde_json::json;
    use std::time::Duration;

    const BASE: &str = "https://test-company.workable.com/spi/v3";

    fn test_client(transport: Arc<InMemoryTransport>) -> WorkableClient {
        let config = SchedulerConfig {
            min_spacing: Duration::ZERO,
            ..SchedulerConfig::default()
        };
        WorkableClient::with_transport(BASE, "test-token", transport, config).unwrap()
    }

    #[test]
    fn test_base_url_for_subdomain() {
        assert_eq!(WorkableClient::base_url_for("test-company"), BASE);
    }

    #[test]
    fn test_list_urls() {
        let client = test_client(Arc::new(InMemoryTransport::new()));

        assert_eq!(client.jobs_url(None).unwrap(), format!("{}/jobs", BASE));
        assert_eq!(
            client.jobs_url(Some("2024-01-01")).unwrap(),
            format!("{}/jobs?updated_after=2024-01-01", BASE)
        );
        assert_eq!(
            client.candidates_url("SE001", None).unwrap(),
            format!("{}/jobs/SE001/candidates?limit=100", BASE)
        );
        assert_eq!(
            client
                .candidates_url("SE 1", Some("2024-01-01T00:00:00Z"))
                .unwrap(),
            format!(
                "{}/jobs/SE%201/candidates?limit=100&updated_after=2024-01-01T00%3A00%3A00Z",
                BASE
            )
        );
    }

    #[test]
    fn test_jobs_are_authenticated() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.respond_json(
            format!("{}/jobs", BASE),
            json!({
                "jobs": [{ "id": "1", "title": "Software Engineer", "shortcode": "SE001" }],
                "paging": { "next": null }
            }),
        );

        let client = test_client(Arc::clone(&transport));
        let jobs = client.jobs(None).unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title(), "Software Engineer");
        assert_eq!(jobs[0].shortcode(), "SE001");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bearer.as_deref(), Some("test-token"));
    }

    #[test]
    fn test_status_error() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.respond(format!("{}/jobs", BASE), HttpResponse::new(401, "{}"));

        let client = test_client(transport);
        let err = client.jobs(None).unwrap_err();
        assert_eq!(err.to_string(), "Workable API error: 401 Unauthorized");
    }

    #[test]
    fn test_network_error() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.fail(format!("{}/jobs", BASE), "Network Error");

        let client = test_client(transport);
        let err = client.jobs(None).unwrap_err();
        assert_eq!(err.to_string(), "Network Error");
    }

    #[test]
    fn test_candidate_unwraps_envelope() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.respond_json(
            format!("{}/candidates/c1", BASE),
            json!({ "candidate": { "id": "c1", "name": "John Doe", "phone": null } }),
        );

        let client = test_client(transport);
        let detail = client.candidate(&CandidateId::new("c1")).unwrap();
        assert_eq!(detail, json!({ "id": "c1", "name": "John Doe", "phone": null }));
    }

    #[test]
    fn test_candidate_without_envelope_is_decode_error() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.respond_json(format!("{}/candidates/c1", BASE), json!({ "id": "c1" }));

        let client = test_client(transport);
        let err = client.candidate(&CandidateId::new("c1")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_download_skips_token() {
        let transport = Arc::new(InMemoryTransport::new());
        let url = "https://s3.example.com/resume.pdf?sig=abc";
        transport.respond(url, HttpResponse::new(200, b"PDF content".to_vec()));

        let client = test_client(Arc::clone(&transport));
        let bytes = client.download(url).unwrap();

        assert_eq!(bytes, b"PDF content");
        assert_eq!(transport.requests()[0].bearer, None);
    }
}

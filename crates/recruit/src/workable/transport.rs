//! HTTP transport seam
//!
//! The client never talks to ureq directly. Every physical request goes
//! through a [`Transport`], which lets the scheduler read rate limit headers
//! from any response and lets tests script the remote side.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use super::ApiError;
use crate::models::RateLimitHeaders;

/// A completed HTTP exchange, whatever its status
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub rate_limit: RateLimitHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with the canonical reason phrase for `status`
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let status_text = ureq::http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("")
            .to_string();

        Self {
            status,
            status_text,
            rate_limit: RateLimitHeaders::default(),
            body: body.into(),
        }
    }

    /// Create a 200 response carrying a JSON document
    pub fn json_body(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitHeaders) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a non-2xx response into [`ApiError::Status`]
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                status: self.status,
                status_text: self.status_text,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Performs one blocking GET
pub trait Transport: Send + Sync {
    /// Fetch `url`. When `bearer` is set the request is authenticated with
    /// `Authorization: Bearer <token>` and `Content-Type: application/json`.
    /// Non-2xx statuses are returned as responses, not errors.
    fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, ApiError>;
}

/// Production transport backed by a ureq agent
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Upper bound for a single response body (resumes included)
    const MAX_BODY_BYTES: u64 = 100 * 1024 * 1024;

    pub fn new() -> Self {
        // Status errors are handled by the client so that rate limit headers
        // of 4xx/5xx responses still reach the scheduler.
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, ApiError> {
        let mut request = self.agent.get(url);

        if let Some(token) = bearer {
            request = request
                .header("Authorization", &format!("Bearer {}", token))
                .header("Content-Type", "application/json");
        }

        let mut response = request
            .call()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let rate_limit = RateLimitHeaders::from_lookup(|name| {
            response.headers().get(name).and_then(|v| v.to_str().ok())
        });

        let body = response
            .body_mut()
            .with_config()
            .limit(Self::MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            rate_limit,
            body,
        })
    }
}

/// A request seen by [`InMemoryTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub bearer: Option<String>,
}

enum Route {
    Respond(HttpResponse),
    Fail(String),
}

/// Scripted transport keyed by exact URL
///
/// Used for testing and offline runs. Unknown URLs answer `404 Not Found`.
#[derive(Default)]
pub struct InMemoryTransport {
    routes: RwLock<HashMap<String, Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `response`
    pub fn respond(&self, url: impl Into<String>, response: HttpResponse) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), Route::Respond(response));
    }

    /// Answer `url` with a 200 JSON document
    pub fn respond_json(&self, url: impl Into<String>, body: serde_json::Value) {
        self.respond(url, HttpResponse::json_body(&body));
    }

    /// Make requests to `url` fail before any response is produced
    pub fn fail(&self, url: impl Into<String>, message: impl Into<String>) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), Route::Fail(message.into()));
    }

    /// Every request made so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests made to `url`
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.url == url)
            .count()
    }
}

impl Transport for InMemoryTransport {
    fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, ApiError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                url: url.to_string(),
                bearer: bearer.map(str::to_string),
            });

        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        match routes.get(url) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::Fail(message)) => Err(ApiError::Transport(message.clone())),
            None => Ok(HttpResponse::new(404, Vec::new())),
        }
    }
}

//! Errors raised by the Workable API layer

/// Failure of a single Workable API call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("Workable API error: {status} {status_text}")]
    Status { status: u16, status_text: String },

    /// The request never produced a response
    #[error("{0}")]
    Transport(String),

    /// The response body was not what we expected
    #[error("Failed to parse Workable response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request could not be built
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The scheduler worker is gone
    #[error("Request scheduler is not running")]
    SchedulerClosed,
}

impl ApiError {
    /// HTTP status, when the server responded at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

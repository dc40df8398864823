//! Error types for calls to the agent's external collaborators.

use crate::util::sanitize_for_log;
use thiserror::Error;

/// Result type alias using the vigil error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure talking to a remote service.
#[derive(Error, Debug)]
pub enum Error {
    /// The service answered, but not with what was asked for
    #[error("External service error: {0}")]
    External(String),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Build an external-service error from a non-success HTTP status.
    ///
    /// The body is redacted since some services echo credentials back.
    pub fn from_status(service: &str, status: reqwest::StatusCode, body: &str) -> Self {
        let body = sanitize_for_log(body.trim());
        if body.is_empty() {
            Self::External(format!("{service} returned {status}"))
        } else {
            Self::External(format!("{service} returned {status}: {body}"))
        }
    }
}

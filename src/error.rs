//! Error types for the collection pipeline.

use thiserror::Error;

/// Errors that can occur during one collection cycle.
///
/// `Fetch`, `Timeout` and `Connection` abandon the cycle that produced
/// them, as does `Parse`. `Write` is record-local: the cycle keeps
/// going and attempts the remaining documents.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// HTTP request to a monitoring endpoint failed or returned non-2xx.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Monitoring payload was malformed or missing required fields.
    #[error("failed to parse monitoring payload: {0}")]
    Parse(String),

    /// The store rejected the document or could not be reached.
    #[error("store write failed: {0}")]
    Write(String),

    /// Connection to the monitoring endpoint failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for a response.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CollectorError::Timeout
        } else if err.is_connect() {
            CollectorError::Connection(err.to_string())
        } else {
            CollectorError::Fetch(err.to_string())
        }
    }
}

//! Error types for review service requests

use review_core::{Operation, TransportError};
use thiserror::Error;

/// Result type for review service requests
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the review service
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be sent or the connection failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Review service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Review not found
    #[error("Review {0} not found")]
    NotFound(String),

    /// The response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The base URL cannot be used to build request URLs
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl Error {
    /// Collapse into the gateway's uniform failure signal
    pub fn into_transport(self, operation: Operation) -> TransportError {
        TransportError::new(operation, self.to_string())
    }
}


//! Boundary to the external review service
//!
//! Workflows only ever see [`ReviewGateway`]. Every failure, whatever its
//! cause, arrives as a [`TransportError`]; the detail it carries is meant for
//! logs, not for the user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Review, ReviewListItem};

/// The gateway operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    GetById,
    Submit,
    Rerun,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::List => write!(f, "list reviews"),
            Operation::GetById => write!(f, "get review"),
            Operation::Submit => write!(f, "submit review"),
            Operation::Rerun => write!(f, "rerun review"),
        }
    }
}

/// Uniform failure signal for any gateway call
///
/// Covers network failure, non-success status, unknown ids and malformed
/// responses alike.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {detail}")]
pub struct TransportError {
    operation: Operation,
    detail: String,
}

impl TransportError {
    /// Create a transport error for an operation
    pub fn new(operation: Operation, detail: impl Into<String>) -> Self {
        Self {
            operation,
            detail: detail.into(),
        }
    }

    /// The operation that failed
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Raw failure detail, for logging only
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Body of a new review request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Source code to review
    pub code: String,
    /// Path the code belongs to; also drives language auto-detection
    pub file_path: String,
    /// Explicit language, omitted to let the service infer it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SubmitRequest {
    /// Create a request that lets the service detect the language
    pub fn new(code: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            file_path: file_path.into(),
            language: None,
        }
    }

    /// Set an explicit language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A window into the review list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of reviews to skip
    pub skip: u32,
    /// Maximum number of reviews to return
    pub limit: u32,
}

/// Access to the review service
///
/// Calls are single-shot: no retry, no backoff, no client-side timeout.
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// Fetch all review summaries
    async fn list(&self) -> Result<Vec<ReviewListItem>, TransportError>;

    /// Fetch one page of review summaries
    ///
    /// Defaults to slicing the full list; services that page server-side
    /// should override it.
    async fn list_page(&self, page: Page) -> Result<Vec<ReviewListItem>, TransportError> {
        let items = self.list().await?;
        Ok(items
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect())
    }

    /// Fetch one review; an unknown id is an error
    async fn get_by_id(&self, id: &str) -> Result<Review, TransportError>;

    /// Submit code for a new review
    async fn submit(&self, request: &SubmitRequest) -> Result<Review, TransportError>;

    /// Re-run analysis for an existing review, returning its replacement
    async fn rerun(&self, id: &str) -> Result<Review, TransportError>;
}

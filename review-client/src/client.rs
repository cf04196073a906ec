//! Review service API client using reqwest

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use review_core::{
    Config, Operation, Page, Review, ReviewGateway, ReviewListItem, SubmitRequest, TransportError,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::{Error, Result};

/// Page size the service uses when none is given
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Response of the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    /// Check if the service reports itself healthy
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Client for the review service
#[derive(Clone)]
pub struct ReviewClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ReviewClient {
    /// Create a client for the service at `base_url`
    ///
    /// A path on the base URL is kept as a prefix for every endpoint.
    pub fn new(base_url: Url) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(Error::Url(format!("{} cannot be used as a base URL", base_url)));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("ai-review/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(base_url = %base_url, "Created review client");

        Ok(Self { http, base_url })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config
            .base_url()
            .map_err(|e| Error::Url(e.to_string()))?;
        Self::new(base_url)
    }

    /// The service base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List reviews using the service's default page
    pub async fn list_reviews(&self) -> Result<Vec<ReviewListItem>> {
        let url = self.endpoint(&["reviews"])?;
        self.send(self.http.get(url), None).await
    }

    /// List one page of reviews
    pub async fn list_page(&self, skip: u32, limit: u32) -> Result<Vec<ReviewListItem>> {
        let url = self.endpoint(&["reviews"])?;
        let request = self
            .http
            .get(url)
            .query(&[("skip", skip), ("limit", limit)]);
        self.send(request, None).await
    }

    /// Fetch one review by id
    pub async fn get_review(&self, id: &str) -> Result<Review> {
        let url = self.endpoint(&["reviews", id])?;
        self.send(self.http.get(url), Some(id)).await
    }

    /// Submit code for a new review
    pub async fn submit_review(&self, request: &SubmitRequest) -> Result<Review> {
        let url = self.endpoint(&["review"])?;
        self.send(self.http.post(url).json(request), None).await
    }

    /// Re-run analysis for an existing review
    pub async fn rerun_review(&self, id: &str) -> Result<Review> {
        let url = self.endpoint(&["reviews", id, "rerun"])?;
        self.send(self.http.post(url), Some(id)).await
    }

    /// Check service health
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["health"])?;
        self.send(self.http.get(url), None).await
    }

    /// Build an endpoint URL from path segments below the base URL
    ///
    /// Segments are percent-encoded, so ids cannot escape their position.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Url(format!("{} cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON response
    ///
    /// When `review_id` is given, a 404 becomes [`Error::NotFound`].
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        review_id: Option<&str>,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = %status, "Review service response");

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = review_id {
                return Err(Error::NotFound(id.to_string()));
            }
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(Error::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse review service response: {}", e)))
    }
}

impl std::fmt::Debug for ReviewClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReviewGateway for ReviewClient {
    async fn list(&self) -> std::result::Result<Vec<ReviewListItem>, TransportError> {
        self.list_reviews()
            .await
            .map_err(|e| e.into_transport(Operation::List))
    }

    async fn list_page(
        &self,
        page: Page,
    ) -> std::result::Result<Vec<ReviewListItem>, TransportError> {
        ReviewClient::list_page(self, page.skip, page.limit)
            .await
            .map_err(|e| e.into_transport(Operation::List))
    }

    async fn get_by_id(&self, id: &str) -> std::result::Result<Review, TransportError> {
        self.get_review(id)
            .await
            .map_err(|e| e.into_transport(Operation::GetById))
    }

    async fn submit(&self, request: &SubmitRequest) -> std::result::Result<Review, TransportError> {
        self.submit_review(request)
            .await
            .map_err(|e| e.into_transport(Operation::Submit))
    }

    async fn rerun(&self, id: &str) -> std::result::Result<Review, TransportError> {
        self.rerun_review(id)
            .await
            .map_err(|e| e.into_transport(Operation::Rerun))
    }
}

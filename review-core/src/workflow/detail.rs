//! Review detail workflow
//!
//! Loads one review by id and lets the user re-run its analysis. The load
//! phase and the re-run status are tracked separately: while a re-run is in
//! flight the review already on screen stays visible, and a failed re-run
//! never touches it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::state::{Activation, Applied, Completion, Pending, Workflow};
use crate::error::{Error, Result};
use crate::gateway::ReviewGateway;
use crate::model::Review;
use crate::route::Route;

/// Message shown when the review cannot be loaded
pub const DETAIL_FAILED: &str = "Failed to load review details. Please try again later.";

/// Message shown next to the review when a re-run fails
pub const RERUN_FAILED: &str = "Failed to rerun review. Please try again later.";

/// Load phase of the detail workflow
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPhase {
    /// Not bound to a review
    Idle,
    /// Waiting for the review
    Loading,
    /// The review currently displayed
    Ready(Review),
    /// Loading failed
    Failed(String),
}

impl DetailPhase {
    fn name(&self) -> &'static str {
        match self {
            DetailPhase::Idle => "idle",
            DetailPhase::Loading => "loading",
            DetailPhase::Ready(_) => "ready",
            DetailPhase::Failed(_) => "failed",
        }
    }
}

/// Re-run progress, independent of the displayed review
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RerunStatus {
    /// A re-run request is in flight
    pub in_flight: bool,
    /// Message from the last failed re-run
    pub error: Option<String>,
}

/// What the detail view should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailView<'a> {
    Idle,
    Loading,
    Failed(&'a str),
    /// A review with no findings
    Clean(&'a Review),
    /// A review with at least one finding
    Findings(&'a Review),
}

/// Workflow behind the review detail view
pub struct DetailWorkflow {
    gateway: Arc<dyn ReviewGateway>,
    review_id: Option<String>,
    phase: DetailPhase,
    rerun: RerunStatus,
    activation: Activation,
}

impl DetailWorkflow {
    /// Create an idle detail workflow
    pub fn new(gateway: Arc<dyn ReviewGateway>) -> Self {
        Self {
            gateway,
            review_id: None,
            phase: DetailPhase::Idle,
            rerun: RerunStatus::default(),
            activation: Activation::default(),
        }
    }

    /// Bind the view to a review and start loading it
    ///
    /// Always restarts from `Loading`: nothing from a previous activation is
    /// shown, and its in-flight calls are discarded when they complete.
    pub fn activate(&mut self, id: impl Into<String>) -> Pending<Review> {
        let id = id.into();
        let ticket = self.activation.start();
        self.review_id = Some(id.clone());
        self.rerun = RerunStatus::default();
        self.set_phase(DetailPhase::Loading);

        let gateway = Arc::clone(&self.gateway);
        Pending::new(ticket, async move { gateway.get_by_id(&id).await })
    }

    /// Apply the result of loading the review
    pub fn complete_load(&mut self, completion: Completion<Review>) -> Applied {
        let (ticket, result) = completion.into_parts();
        if !self.activation.accepts(ticket) || self.phase != DetailPhase::Loading {
            debug!(workflow = self.name(), "Discarding stale review response");
            return Applied::Discarded;
        }

        match result {
            Ok(review) => {
                info!(
                    review_id = %review.review_id,
                    suggestions = review.suggestions.len(),
                    "Loaded review"
                );
                self.set_phase(DetailPhase::Ready(review));
            }
            Err(e) => {
                warn!(review_id = ?self.review_id, error = %e, "Failed to fetch review");
                self.set_phase(DetailPhase::Failed(DETAIL_FAILED.to_string()));
            }
        }
        Applied::Applied
    }

    /// Start re-running the bound review
    ///
    /// Only available once the review is displayed, and only one re-run may
    /// be in flight at a time.
    pub fn begin_rerun(&mut self) -> Result<Pending<Review>> {
        let ticket = self
            .activation
            .current()
            .ok_or(Error::Inactive(self.name()))?;

        if !matches!(self.phase, DetailPhase::Ready(_)) {
            return Err(Error::InvalidTransition {
                action: "rerun review",
                phase: self.phase.name(),
            });
        }
        if self.rerun.in_flight {
            return Err(Error::Busy("Review rerun"));
        }
        let id = self
            .review_id
            .clone()
            .ok_or_else(|| Error::Other("Detail workflow has no review id".to_string()))?;

        info!(review_id = %id, "Rerunning review");
        self.rerun = RerunStatus {
            in_flight: true,
            error: None,
        };

        let gateway = Arc::clone(&self.gateway);
        Ok(Pending::new(ticket, async move { gateway.rerun(&id).await }))
    }

    /// Apply the result of a re-run
    ///
    /// Success replaces the displayed review wholesale; failure leaves it
    /// untouched and records an error alongside it.
    pub fn complete_rerun(&mut self, completion: Completion<Review>) -> Applied {
        let (ticket, result) = completion.into_parts();
        if !self.activation.accepts(ticket) || !self.rerun.in_flight {
            debug!(workflow = self.name(), "Discarding stale rerun response");
            return Applied::Discarded;
        }

        self.rerun.in_flight = false;
        match result {
            Ok(review) => {
                info!(review_id = %review.review_id, "Rerun complete");
                self.phase = DetailPhase::Ready(review);
            }
            Err(e) => {
                warn!(review_id = ?self.review_id, error = %e, "Failed to rerun review");
                self.rerun.error = Some(RERUN_FAILED.to_string());
            }
        }
        Applied::Applied
    }

    /// Activate, load and apply in one step
    pub async fn load(&mut self, id: impl Into<String>) -> Applied {
        let completion = self.activate(id).run().await;
        self.complete_load(completion)
    }

    /// Re-run and apply in one step
    pub async fn rerun(&mut self) -> Result<Applied> {
        let completion = self.begin_rerun()?.run().await;
        Ok(self.complete_rerun(completion))
    }

    /// The id the view is bound to
    pub fn review_id(&self) -> Option<&str> {
        self.review_id.as_deref()
    }

    /// The displayed review, if loaded
    pub fn review(&self) -> Option<&Review> {
        match &self.phase {
            DetailPhase::Ready(review) => Some(review),
            _ => None,
        }
    }

    /// Re-run progress
    pub fn rerun_status(&self) -> &RerunStatus {
        &self.rerun
    }

    /// Check if a re-run is in flight
    pub fn is_rerunning(&self) -> bool {
        self.rerun.in_flight
    }

    /// Whether the re-run action should be enabled
    pub fn can_rerun(&self) -> bool {
        self.activation.is_active()
            && matches!(self.phase, DetailPhase::Ready(_))
            && !self.rerun.in_flight
    }

    /// What the view should render
    pub fn view(&self) -> DetailView<'_> {
        match &self.phase {
            DetailPhase::Idle => DetailView::Idle,
            DetailPhase::Loading => DetailView::Loading,
            DetailPhase::Failed(message) => DetailView::Failed(message),
            DetailPhase::Ready(review) if review.is_clean() => DetailView::Clean(review),
            DetailPhase::Ready(review) => DetailView::Findings(review),
        }
    }

    /// Navigate back to the list
    pub fn back(&self) -> Route {
        Route::List
    }

    fn set_phase(&mut self, next: DetailPhase) {
        info!(
            workflow = self.name(),
            from = self.phase.name(),
            to = next.name(),
            "Workflow phase transition"
        );
        self.phase = next;
    }
}

impl Workflow for DetailWorkflow {
    type Phase = DetailPhase;

    fn name(&self) -> &'static str {
        "detail"
    }

    fn phase(&self) -> &DetailPhase {
        &self.phase
    }

    fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    fn deactivate(&mut self) {
        self.activation.end();
        self.review_id = None;
        self.rerun = RerunStatus::default();
        self.phase = DetailPhase::Idle;
    }
}

impl std::fmt::Debug for DetailWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailWorkflow")
            .field("review_id", &self.review_id)
            .field("phase", &self.phase)
            .field("rerun", &self.rerun)
            .finish_non_exhaustive()
    }
}

//! Review list workflow
//!
//! Loads the collection of review summaries once per activation. There is no
//! retry timer; activating again is the only way out of `Failed`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::state::{Activation, Applied, Completion, Pending, Workflow};
use crate::gateway::{Page, ReviewGateway};
use crate::model::ReviewListItem;
use crate::route::Route;

/// Message shown when the list cannot be loaded
pub const LIST_FAILED: &str = "Failed to load reviews. Please try again later.";

/// Phase of the list workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    /// Not yet activated
    Idle,
    /// Waiting for the service
    Loading,
    /// Summaries in server order; may be empty
    Ready(Vec<ReviewListItem>),
    /// Loading failed
    Failed(String),
}

impl ListPhase {
    fn name(&self) -> &'static str {
        match self {
            ListPhase::Idle => "idle",
            ListPhase::Loading => "loading",
            ListPhase::Ready(_) => "ready",
            ListPhase::Failed(_) => "failed",
        }
    }
}

/// Workflow behind the review list view
pub struct ListWorkflow {
    gateway: Arc<dyn ReviewGateway>,
    page: Option<Page>,
    phase: ListPhase,
    activation: Activation,
}

impl ListWorkflow {
    /// Create an idle list workflow
    pub fn new(gateway: Arc<dyn ReviewGateway>) -> Self {
        Self {
            gateway,
            page: None,
            phase: ListPhase::Idle,
            activation: Activation::default(),
        }
    }

    /// Load only one page of the list instead of the whole collection
    pub fn with_page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    /// Activate the view and start loading
    ///
    /// Any load still in flight from an earlier activation will be discarded
    /// when it completes.
    pub fn activate(&mut self) -> Pending<Vec<ReviewListItem>> {
        let ticket = self.activation.start();
        self.set_phase(ListPhase::Loading);

        let gateway = Arc::clone(&self.gateway);
        let page = self.page;
        Pending::new(ticket, async move {
            match page {
                Some(page) => gateway.list_page(page).await,
                None => gateway.list().await,
            }
        })
    }

    /// Apply the result of a load
    pub fn complete(&mut self, completion: Completion<Vec<ReviewListItem>>) -> Applied {
        let (ticket, result) = completion.into_parts();
        if !self.activation.accepts(ticket) || self.phase != ListPhase::Loading {
            debug!(workflow = self.name(), "Discarding stale list response");
            return Applied::Discarded;
        }

        match result {
            Ok(items) => {
                info!(count = items.len(), "Loaded reviews");
                self.set_phase(ListPhase::Ready(items));
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch reviews");
                self.set_phase(ListPhase::Failed(LIST_FAILED.to_string()));
            }
        }
        Applied::Applied
    }

    /// Activate, load and apply in one step
    pub async fn load(&mut self) -> Applied {
        let completion = self.activate().run().await;
        self.complete(completion)
    }

    /// Loaded summaries, if ready
    pub fn items(&self) -> Option<&[ReviewListItem]> {
        match &self.phase {
            ListPhase::Ready(items) => Some(items),
            _ => None,
        }
    }

    /// User-facing error message, if loading failed
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ListPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Check if a load is in flight
    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    /// Check if the list loaded with no reviews
    pub fn is_empty(&self) -> bool {
        self.items().is_some_and(|items| items.is_empty())
    }

    /// Navigate to the submission view
    pub fn create(&self) -> Route {
        Route::Submit
    }

    /// Navigate to the detail view of a listed review
    pub fn select(&self, item: &ReviewListItem) -> Route {
        Route::detail(item.id.clone())
    }

    fn set_phase(&mut self, next: ListPhase) {
        info!(
            workflow = self.name(),
            from = self.phase.name(),
            to = next.name(),
            "Workflow phase transition"
        );
        self.phase = next;
    }
}

impl Workflow for ListWorkflow {
    type Phase = ListPhase;

    fn name(&self) -> &'static str {
        "list"
    }

    fn phase(&self) -> &ListPhase {
        &self.phase
    }

    fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    fn deactivate(&mut self) {
        self.activation.end();
        self.phase = ListPhase::Idle;
    }
}

impl std::fmt::Debug for ListWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListWorkflow")
            .field("page", &self.page)
            .field("phase", &self.phase)
            .field("activation", &self.activation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Operation;
    use crate::model::Tone;
    use crate::testing::{list_item, transport_error, FakeGateway};

    #[test]
    fn test_starts_idle() {
        let workflow = ListWorkflow::new(FakeGateway::new().into_arc());
        assert_eq!(workflow.phase(), &ListPhase::Idle);
        assert!(!workflow.is_active());
        assert!(workflow.items().is_none());
    }

    #[tokio::test]
    async fn test_load_success() {
        let gateway = FakeGateway::new()
            .with_list(Ok(vec![list_item("r1", 0)]))
            .into_arc();
        let mut workflow = ListWorkflow::new(gateway.clone());

        let pending = workflow.activate();
        assert!(workflow.is_loading());

        let applied = workflow.complete(pending.run().await);
        assert!(applied.is_applied());

        let items = workflow.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "r1");
        assert_eq!(items[0].suggestion_badge(), "0 suggestions");
        assert_eq!(items[0].suggestion_tone(), Tone::Success);
        assert_eq!(gateway.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_items_keep_server_order() {
        let gateway = FakeGateway::new()
            .with_list(Ok(vec![list_item("r3", 1), list_item("r1", 5), list_item("r2", 0)]))
            .into_arc();
        let mut workflow = ListWorkflow::new(gateway);
        workflow.load().await;

        let ids: Vec<&str> = workflow.items().unwrap().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r1", "r2"]);
    }

    #[tokio::test]
    async fn test_empty_list_is_ready() {
        let gateway = FakeGateway::new().with_list(Ok(vec![])).into_arc();
        let mut workflow = ListWorkflow::new(gateway);
        workflow.load().await;

        assert!(workflow.is_empty());
        assert!(workflow.error().is_none());
        assert_eq!(workflow.create(), Route::Submit);
    }

    #[tokio::test]
    async fn test_failure_uses_fixed_message() {
        let gateway = FakeGateway::new()
            .with_list(Err(transport_error(Operation::List)))
            .into_arc();
        let mut workflow = ListWorkflow::new(gateway);
        workflow.load().await;

        assert_eq!(workflow.error(), Some(LIST_FAILED));
        assert!(!workflow.error().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_reactivation_after_failure_reloads() {
        let gateway = FakeGateway::new()
            .with_list(Err(transport_error(Operation::List)))
            .with_list(Ok(vec![list_item("r1", 2)]))
            .into_arc();
        let mut workflow = ListWorkflow::new(gateway.clone());

        workflow.load().await;
        assert!(workflow.error().is_some());

        let pending = workflow.activate();
        assert_eq!(workflow.phase(), &ListPhase::Loading);
        workflow.complete(pending.run().await);

        assert_eq!(workflow.items().unwrap().len(), 1);
        assert_eq!(gateway.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_response_after_deactivation_is_discarded() {
        let gateway = FakeGateway::new()
            .with_list(Ok(vec![list_item("r1", 0)]))
            .into_arc();
        let mut workflow = ListWorkflow::new(gateway);

        let pending = workflow.activate();
        workflow.deactivate();

        let applied = workflow.complete(pending.run().await);
        assert_eq!(applied, Applied::Discarded);
        assert_eq!(workflow.phase(), &ListPhase::Idle);
    }

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let gateway = FakeGateway::new()
            .with_list(Ok(vec![list_item("old", 0)]))
            .with_list(Ok(vec![list_item("new", 0)]))
            .into_arc();
        let mut workflow = ListWorkflow::new(gateway);

        let first = workflow.activate();
        let second = workflow.activate();

        let first = first.run().await;
        let second = second.run().await;

        assert_eq!(workflow.complete(first), Applied::Discarded);
        assert!(workflow.is_loading());
        assert_eq!(workflow.complete(second), Applied::Applied);
        assert_eq!(workflow.items().unwrap()[0].id, "new");
    }

    #[tokio::test]
    async fn test_paged_load_returns_window() {
        let gateway = FakeGateway::new()
            .with_list(Ok(vec![list_item("r1", 0), list_item("r2", 0), list_item("r3", 0)]))
            .into_arc();
        let mut workflow =
            ListWorkflow::new(gateway.clone()).with_page(Page { skip: 1, limit: 1 });
        workflow.load().await;

        let ids: Vec<&str> = workflow.items().unwrap().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["r2"]);
        assert_eq!(gateway.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_paged_load_failure_uses_fixed_message() {
        let gateway = FakeGateway::new()
            .with_list(Err(transport_error(Operation::List)))
            .into_arc();
        let mut workflow = ListWorkflow::new(gateway).with_page(Page { skip: 0, limit: 10 });
        workflow.load().await;

        assert_eq!(workflow.error(), Some(LIST_FAILED));
    }

    #[tokio::test]
    async fn test_select_routes_to_detail() {
        let gateway = FakeGateway::new()
            .with_list(Ok(vec![list_item("r7", 1)]))
            .into_arc();
        let mut workflow = ListWorkflow::new(gateway);
        workflow.load().await;

        let item = workflow.items().unwrap()[0].clone();
        assert_eq!(workflow.select(&item), Route::detail("r7"));
        assert_eq!(workflow.select(&item).path(), "/reviews/r7");
    }
}

//! Review submission workflow
//!
//! Validates the form locally, sends it, and on success hands out a single
//! [`Redirect`] to the new review's detail view. The redirect delay only
//! gives the confirmation time to be seen; it is not a readiness poll, since
//! the service already returned the finished review.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::state::{Activation, Applied, Completion, Pending, Workflow};
use crate::config::DEFAULT_REDIRECT_DELAY;
use crate::error::{Error, Result};
use crate::gateway::{ReviewGateway, SubmitRequest};
use crate::model::Review;
use crate::route::Route;

/// Validation message for an empty code field
pub const CODE_REQUIRED: &str = "Please enter code to review.";

/// Validation message for an empty file path
pub const FILE_PATH_REQUIRED: &str = "Please enter a file path.";

/// Message shown when the service rejects or fails the submission
pub const SUBMIT_FAILED: &str = "Failed to submit code for review. Please try again later.";

/// Confirmation shown while waiting to navigate
pub const SUBMIT_CONFIRMATION: &str = "Review submitted successfully! Redirecting...";

/// Phase of the submission workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    /// The user is filling in the form
    Editing,
    /// Checking the form before sending
    Validating,
    /// Waiting for the service
    Submitting,
    /// The service created the review with this id
    Succeeded(String),
    /// Validation or submission failed; the form is intact
    Failed(String),
}

impl SubmitPhase {
    fn name(&self) -> &'static str {
        match self {
            SubmitPhase::Editing => "editing",
            SubmitPhase::Validating => "validating",
            SubmitPhase::Submitting => "submitting",
            SubmitPhase::Succeeded(_) => "succeeded",
            SubmitPhase::Failed(_) => "failed",
        }
    }

    /// Whether a submission is underway and the form is locked
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmitPhase::Validating | SubmitPhase::Submitting)
    }
}

/// What the user has entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub code: String,
    pub file_path: String,
    /// Empty means auto-detect from the file extension
    pub language: String,
}

impl SubmissionForm {
    /// Check the form and build the request body
    pub fn validate(&self) -> std::result::Result<SubmitRequest, &'static str> {
        if self.code.is_empty() {
            return Err(CODE_REQUIRED);
        }
        if self.file_path.is_empty() {
            return Err(FILE_PATH_REQUIRED);
        }

        let request = SubmitRequest::new(self.code.clone(), self.file_path.clone());
        let language = self.language.trim();
        Ok(if language.is_empty() {
            request
        } else {
            request.with_language(language)
        })
    }
}

/// A one-time scheduled navigation after a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Where to go
    pub route: Route,
    /// How long to show the confirmation first
    pub delay: Duration,
}

impl Redirect {
    /// Confirmation text to show until the redirect fires
    pub fn message(&self) -> &'static str {
        SUBMIT_CONFIRMATION
    }

    /// Wait out the delay once, then yield the route
    pub async fn wait(self) -> Route {
        tokio::time::sleep(self.delay).await;
        self.route
    }
}

/// Result of pressing submit
#[derive(Debug)]
pub enum SubmitAttempt {
    /// Validation failed; nothing was sent
    Rejected(&'static str),
    /// The request is ready to be sent
    Sending(Pending<Review>),
}

/// Workflow behind the submission view
pub struct SubmitWorkflow {
    gateway: Arc<dyn ReviewGateway>,
    form: SubmissionForm,
    phase: SubmitPhase,
    redirect: Option<Redirect>,
    redirect_delay: Duration,
    activation: Activation,
}

impl SubmitWorkflow {
    /// Create a submission workflow with the default redirect delay
    pub fn new(gateway: Arc<dyn ReviewGateway>) -> Self {
        Self {
            gateway,
            form: SubmissionForm::default(),
            phase: SubmitPhase::Editing,
            redirect: None,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            activation: Activation::default(),
        }
    }

    /// Set the delay before navigating after success
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Show the view with an empty form
    pub fn activate(&mut self) {
        self.activation.start();
        self.form = SubmissionForm::default();
        self.redirect = None;
        self.set_phase(SubmitPhase::Editing);
    }

    /// Set the code field
    pub fn set_code(&mut self, code: impl Into<String>) -> Result<()> {
        self.edit(|form| form.code = code.into())
    }

    /// Set the file path field
    pub fn set_file_path(&mut self, file_path: impl Into<String>) -> Result<()> {
        self.edit(|form| form.file_path = file_path.into())
    }

    /// Set the language field; empty means auto-detect
    pub fn set_language(&mut self, language: impl Into<String>) -> Result<()> {
        self.edit(|form| form.language = language.into())
    }

    fn edit(&mut self, apply: impl FnOnce(&mut SubmissionForm)) -> Result<()> {
        if !self.activation.is_active() {
            return Err(Error::Inactive(self.name()));
        }
        if self.phase.is_busy() {
            return Err(Error::Busy("Submission"));
        }

        apply(&mut self.form);
        if self.phase != SubmitPhase::Editing {
            self.set_phase(SubmitPhase::Editing);
        }
        Ok(())
    }

    /// Validate the form and, if it passes, start sending it
    ///
    /// Rejected while a submission is already underway.
    pub fn submit(&mut self) -> Result<SubmitAttempt> {
        let ticket = self
            .activation
            .current()
            .ok_or(Error::Inactive(self.name()))?;
        if self.phase.is_busy() {
            return Err(Error::Busy("Submission"));
        }

        self.set_phase(SubmitPhase::Validating);
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(message) => {
                debug!(reason = message, "Submission failed validation");
                self.set_phase(SubmitPhase::Failed(message.to_string()));
                return Ok(SubmitAttempt::Rejected(message));
            }
        };

        self.redirect = None;
        self.set_phase(SubmitPhase::Submitting);
        info!(
            file_path = %request.file_path,
            language = request.language.as_deref().unwrap_or("auto"),
            "Submitting code for review"
        );

        let gateway = Arc::clone(&self.gateway);
        Ok(SubmitAttempt::Sending(Pending::new(ticket, async move {
            gateway.submit(&request).await
        })))
    }

    /// Apply the service's answer
    pub fn complete(&mut self, completion: Completion<Review>) -> Applied {
        let (ticket, result) = completion.into_parts();
        if !self.activation.accepts(ticket) || self.phase != SubmitPhase::Submitting {
            debug!(workflow = self.name(), "Discarding stale submit response");
            return Applied::Discarded;
        }

        match result {
            Ok(review) => {
                info!(review_id = %review.review_id, "Review created");
                self.redirect = Some(Redirect {
                    route: Route::detail(review.review_id.clone()),
                    delay: self.redirect_delay,
                });
                self.set_phase(SubmitPhase::Succeeded(review.review_id));
            }
            Err(e) => {
                warn!(error = %e, "Failed to submit code");
                self.set_phase(SubmitPhase::Failed(SUBMIT_FAILED.to_string()));
            }
        }
        Applied::Applied
    }

    /// Submit and apply in one step
    ///
    /// Returns the validation message when the form was rejected.
    pub async fn send(&mut self) -> Result<Option<&'static str>> {
        match self.submit()? {
            SubmitAttempt::Rejected(message) => Ok(Some(message)),
            SubmitAttempt::Sending(pending) => {
                let completion = pending.run().await;
                self.complete(completion);
                Ok(None)
            }
        }
    }

    /// Take the scheduled navigation, at most once per success
    pub fn take_redirect(&mut self) -> Option<Redirect> {
        self.redirect.take()
    }

    /// The form as currently entered
    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    /// Id of the created review, once succeeded
    pub fn created_id(&self) -> Option<&str> {
        match &self.phase {
            SubmitPhase::Succeeded(id) => Some(id),
            _ => None,
        }
    }

    /// User-facing error message, if failed
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            SubmitPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the submit action should be enabled
    pub fn can_submit(&self) -> bool {
        self.activation.is_active() && !self.phase.is_busy()
    }

    /// Navigate back to the list
    pub fn cancel(&self) -> Route {
        Route::List
    }

    fn set_phase(&mut self, next: SubmitPhase) {
        info!(
            workflow = self.name(),
            from = self.phase.name(),
            to = next.name(),
            "Workflow phase transition"
        );
        self.phase = next;
    }
}

impl Workflow for SubmitWorkflow {
    type Phase = SubmitPhase;

    fn name(&self) -> &'static str {
        "submit"
    }

    fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    fn deactivate(&mut self) {
        self.activation.end();
        self.redirect = None;
        self.phase = SubmitPhase::Editing;
    }
}

impl std::fmt::Debug for SubmitWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitWorkflow")
            .field("phase", &self.phase)
            .field("redirect_delay", &self.redirect_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Operation;
    use crate::testing::{review, transport_error, FakeGateway};

    fn active(gateway: Arc<FakeGateway>) -> SubmitWorkflow {
        let mut workflow = SubmitWorkflow::new(gateway);
        workflow.activate();
        workflow
    }

    fn fill(workflow: &mut SubmitWorkflow, code: &str, file_path: &str, language: &str) {
        workflow.set_code(code).unwrap();
        workflow.set_file_path(file_path).unwrap();
        workflow.set_language(language).unwrap();
    }

    #[test]
    fn test_validation_order() {
        let form = SubmissionForm::default();
        assert_eq!(form.validate(), Err(CODE_REQUIRED));

        let form = SubmissionForm {
            code: "print(1)".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(FILE_PATH_REQUIRED));
    }

    #[test]
    fn test_blank_language_means_auto_detect() {
        let form = SubmissionForm {
            code: "print(1)".to_string(),
            file_path: "a.py".to_string(),
            language: "  ".to_string(),
        };
        assert_eq!(form.validate().unwrap().language, None);

        let form = SubmissionForm {
            language: "python".to_string(),
            ..form
        };
        assert_eq!(form.validate().unwrap().language.as_deref(), Some("python"));
    }

    #[tokio::test]
    async fn test_submit_success_schedules_redirect() {
        let gateway = FakeGateway::new()
            .with_submit(Ok(review("r9", vec![])))
            .into_arc();
        let mut workflow = active(gateway.clone());
        fill(&mut workflow, "print(1)", "a.py", "");

        let pending = match workflow.submit().unwrap() {
            SubmitAttempt::Sending(pending) => pending,
            other => panic!("unexpected attempt: {:?}", other),
        };
        assert_eq!(workflow.phase(), &SubmitPhase::Submitting);
        assert!(!workflow.can_submit());

        workflow.complete(pending.run().await);
        assert_eq!(workflow.phase(), &SubmitPhase::Succeeded("r9".to_string()));
        assert_eq!(workflow.created_id(), Some("r9"));

        let redirect = workflow.take_redirect().unwrap();
        assert_eq!(redirect.route, Route::detail("r9"));
        assert_eq!(redirect.delay, DEFAULT_REDIRECT_DELAY);
        assert_eq!(redirect.message(), SUBMIT_CONFIRMATION);
        assert!(workflow.take_redirect().is_none());

        let sent = gateway.submitted();
        assert_eq!(sent, vec![SubmitRequest::new("print(1)", "a.py")]);
    }

    #[tokio::test]
    async fn test_empty_code_never_calls_gateway() {
        let gateway = FakeGateway::new().into_arc();
        let mut workflow = active(gateway.clone());
        fill(&mut workflow, "", "a.py", "");

        match workflow.submit().unwrap() {
            SubmitAttempt::Rejected(message) => assert_eq!(message, CODE_REQUIRED),
            other => panic!("unexpected attempt: {:?}", other),
        }
        assert_eq!(workflow.error(), Some(CODE_REQUIRED));
        assert_eq!(gateway.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_file_path_never_calls_gateway() {
        let gateway = FakeGateway::new().into_arc();
        let mut workflow = active(gateway.clone());
        fill(&mut workflow, "print(1)", "", "");

        assert_eq!(workflow.send().await.unwrap(), Some(FILE_PATH_REQUIRED));
        assert_eq!(workflow.error(), Some(FILE_PATH_REQUIRED));
        assert_eq!(gateway.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_preserves_form() {
        let gateway = FakeGateway::new()
            .with_submit(Err(transport_error(Operation::Submit)))
            .into_arc();
        let mut workflow = active(gateway);
        fill(&mut workflow, "fn main() {}\n", "src/main.rs", "rust");

        assert_eq!(workflow.send().await.unwrap(), None);
        assert_eq!(workflow.error(), Some(SUBMIT_FAILED));
        assert!(workflow.take_redirect().is_none());

        let form = workflow.form();
        assert_eq!(form.code, "fn main() {}\n");
        assert_eq!(form.file_path, "src/main.rs");
        assert_eq!(form.language, "rust");
    }

    #[tokio::test]
    async fn test_edit_after_failure_returns_to_editing() {
        let gateway = FakeGateway::new()
            .with_submit(Err(transport_error(Operation::Submit)))
            .with_submit(Ok(review("r2", vec![])))
            .into_arc();
        let mut workflow = active(gateway.clone());
        fill(&mut workflow, "x = 1", "a.py", "");

        workflow.send().await.unwrap();
        assert!(workflow.error().is_some());

        workflow.set_file_path("b.py").unwrap();
        assert_eq!(workflow.phase(), &SubmitPhase::Editing);

        workflow.send().await.unwrap();
        assert_eq!(workflow.created_id(), Some("r2"));
        assert_eq!(gateway.submitted()[1].file_path, "b.py");
        assert_eq!(gateway.submitted()[1].code, "x = 1");
    }

    #[tokio::test]
    async fn test_double_submit_rejected() {
        let gateway = FakeGateway::new()
            .with_submit(Ok(review("r1", vec![])))
            .into_arc();
        let mut workflow = active(gateway.clone());
        fill(&mut workflow, "print(1)", "a.py", "");

        let first = workflow.submit().unwrap();
        assert!(matches!(workflow.submit(), Err(Error::Busy(_))));
        assert!(matches!(workflow.set_code("other"), Err(Error::Busy(_))));

        if let SubmitAttempt::Sending(pending) = first {
            workflow.complete(pending.run().await);
        }
        assert_eq!(gateway.submit_calls(), 1);
    }

    #[tokio::test]
    async fn test_response_after_deactivation_is_discarded() {
        let gateway = FakeGateway::new()
            .with_submit(Ok(review("r1", vec![])))
            .into_arc();
        let mut workflow = active(gateway);
        fill(&mut workflow, "print(1)", "a.py", "");

        let attempt = workflow.submit().unwrap();
        workflow.deactivate();

        if let SubmitAttempt::Sending(pending) = attempt {
            assert_eq!(workflow.complete(pending.run().await), Applied::Discarded);
        } else {
            panic!("expected a pending submission");
        }
        assert!(workflow.take_redirect().is_none());
        assert!(workflow.created_id().is_none());
    }

    #[test]
    fn test_inactive_workflow_rejects_input() {
        let mut workflow = SubmitWorkflow::new(FakeGateway::new().into_arc());
        assert!(matches!(workflow.set_code("x"), Err(Error::Inactive(_))));
        assert!(matches!(workflow.submit(), Err(Error::Inactive(_))));
        assert_eq!(workflow.cancel(), Route::List);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redirect_fires_once_after_delay() {
        let redirect = Redirect {
            route: Route::detail("r9"),
            delay: Duration::from_millis(1500),
        };

        let started = tokio::time::Instant::now();
        let route = redirect.wait().await;

        assert_eq!(route, Route::detail("r9"));
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_custom_redirect_delay() {
        let gateway = FakeGateway::new()
            .with_submit(Ok(review("r3", vec![])))
            .into_arc();
        let mut workflow =
            SubmitWorkflow::new(gateway).with_redirect_delay(Duration::from_millis(10));
        workflow.activate();
        fill(&mut workflow, "print(1)", "a.py", "");

        workflow.send().await.unwrap();
        assert_eq!(
            workflow.take_redirect().map(|r| r.delay),
            Some(Duration::from_millis(10))
        );
    }
}

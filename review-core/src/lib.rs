//! Review Core - data model and workflows for the AI code review client
//!
//! This crate holds everything the client knows about reviews that is not
//! tied to a particular transport or front-end: the shared data model, the
//! [`ReviewGateway`] boundary, and the list / detail / submission workflows
//! that drive each view.

pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod route;
pub mod workflow;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::{ApiConfig, Config, UiConfig};
pub use error::{Error, Result};
pub use gateway::{Operation, Page, ReviewGateway, SubmitRequest, TransportError};
pub use model::{
    format_timestamp, Category, Language, Review, ReviewListItem, Severity, Suggestion, Tone,
    LANGUAGES,
};
pub use route::Route;
pub use workflow::{
    Applied, Completion, DetailPhase, DetailView, DetailWorkflow, ListPhase, ListWorkflow,
    Pending, Redirect, RerunStatus, SubmissionForm, SubmitAttempt, SubmitPhase, SubmitWorkflow,
    Ticket, Workflow,
};

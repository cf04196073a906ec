//! Workflows behind each view
//!
//! Each view owns one workflow instance. Workflows share no state with each
//! other and keep no cache: the list and detail views load their own copies
//! of a review independently.

pub mod detail;
pub mod list;
pub mod state;
pub mod submit;

pub use detail::{
    DetailPhase, DetailView, DetailWorkflow, RerunStatus, DETAIL_FAILED, RERUN_FAILED,
};
pub use list::{ListPhase, ListWorkflow, LIST_FAILED};
pub use state::{Applied, Completion, Pending, Ticket, Workflow};
pub use submit::{
    Redirect, SubmissionForm, SubmitAttempt, SubmitPhase, SubmitWorkflow, CODE_REQUIRED,
    FILE_PATH_REQUIRED, SUBMIT_CONFIRMATION, SUBMIT_FAILED,
};

//! Error types for the review client core

use thiserror::Error;

/// Result type alias for review client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for review client operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The workflow is not bound to a visible view
    #[error("{0} workflow is not active")]
    Inactive(&'static str),

    /// An operation of the same kind is already in flight
    #[error("{0} already in progress")]
    Busy(&'static str),

    /// The requested action is not available in the current phase
    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        /// What was attempted
        action: &'static str,
        /// The phase the workflow was in
        phase: &'static str,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

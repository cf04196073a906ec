//! Review Client - HTTP access to the AI code review service
//!
//! [`ReviewClient`] speaks the service's JSON API and implements
//! [`review_core::ReviewGateway`], so the workflows can drive it without
//! knowing anything about HTTP.

mod client;
mod error;

pub use client::{HealthStatus, ReviewClient, DEFAULT_PAGE_LIMIT};
pub use error::{Error, Result};

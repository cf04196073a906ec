//! CLI command implementations

pub mod health;
pub mod list;
pub mod rerun;
pub mod show;
pub mod submit;

use std::sync::Arc;

use anyhow::Context;
use review_client::ReviewClient;
use review_core::Config;

pub use health::HealthArgs;
pub use list::ListArgs;
pub use rerun::RerunArgs;
pub use show::ShowArgs;
pub use submit::SubmitArgs;

/// Build the HTTP client for the configured service
pub(crate) fn connect(config: &Config) -> anyhow::Result<Arc<ReviewClient>> {
    let client = ReviewClient::from_config(config)
        .with_context(|| format!("Invalid API base URL: {}", config.api.base_url))?;
    Ok(Arc::new(client))
}

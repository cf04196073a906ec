//! Rerun command - re-analyze an existing review

use std::sync::Arc;

use clap::Args;
use review_core::{Config, DetailView, DetailWorkflow, Review, ReviewGateway};

use crate::render::{self, OutputFormat};

/// Re-run analysis for a review and show the result
#[derive(Args, Debug)]
pub struct RerunArgs {
    /// Review id
    pub id: String,
}

impl RerunArgs {
    /// Execute the rerun command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
        let client = super::connect(config)?;
        let (review, error) = rerun(client, &self.id).await?;

        print!("{}", render::review(&review, format)?);
        if let Some(message) = error {
            anyhow::bail!("{}", message);
        }
        Ok(())
    }
}

/// Load the review, then re-run it
///
/// Returns the review to display and the re-run error, if any. A failed
/// re-run keeps the previously loaded review.
pub(crate) async fn rerun(
    gateway: Arc<dyn ReviewGateway>,
    id: &str,
) -> anyhow::Result<(Review, Option<String>)> {
    let mut workflow = DetailWorkflow::new(gateway);
    workflow.load(id).await;
    if let DetailView::Failed(message) = workflow.view() {
        anyhow::bail!("{}", message);
    }

    workflow.rerun().await?;

    let review = workflow
        .review()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Review {} is no longer displayed", id))?;
    Ok((review, workflow.rerun_status().error.clone()))
}

//! Show command - display one review and its suggestions

use std::sync::Arc;

use clap::Args;
use review_core::{Config, DetailView, DetailWorkflow, Review, ReviewGateway};

use crate::render::{self, OutputFormat};

/// Show a review by id
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Review id
    pub id: String,
}

impl ShowArgs {
    /// Execute the show command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
        let client = super::connect(config)?;
        let review = fetch(client, &self.id).await?;
        print!("{}", render::review(&review, format)?);
        Ok(())
    }
}

/// Run the detail workflow for one id and return the loaded review
pub(crate) async fn fetch(gateway: Arc<dyn ReviewGateway>, id: &str) -> anyhow::Result<Review> {
    let mut workflow = DetailWorkflow::new(gateway);
    workflow.load(id).await;

    match workflow.view() {
        DetailView::Clean(review) | DetailView::Findings(review) => Ok(review.clone()),
        DetailView::Failed(message) => anyhow::bail!("{}", message),
        other => anyhow::bail!("Review {} did not finish loading ({:?})", id, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::testing::{review, suggestion, FakeGateway};
    use review_core::workflow::DETAIL_FAILED;

    #[tokio::test]
    async fn test_fetch_returns_review() {
        let gateway = FakeGateway::new()
            .with_review(Ok(review("r1", vec![suggestion(1, "low"), suggestion(9, "high")])))
            .into_arc();
        let loaded = fetch(gateway, "r1").await.unwrap();
        assert_eq!(loaded.review_id, "r1");
        assert_eq!(loaded.suggestions.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_review_reports_fixed_message() {
        let gateway = FakeGateway::new().into_arc();
        let err = fetch(gateway, "missing").await.unwrap_err();
        assert_eq!(err.to_string(), DETAIL_FAILED);
    }
}

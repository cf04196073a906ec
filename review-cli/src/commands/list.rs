//! List command - show previously created reviews

use std::sync::Arc;

use clap::Args;
use review_core::{Config, ListWorkflow, Page, ReviewGateway, ReviewListItem};

use crate::render::{self, OutputFormat};

/// List reviews in the order the service returns them
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Number of reviews to skip
    #[arg(long)]
    pub skip: Option<u32>,

    /// Maximum number of reviews to return
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
        let client = super::connect(config)?;
        let items = fetch(client, self.page()).await?;
        print!("{}", render::review_list(&items, format)?);
        Ok(())
    }

    /// The requested page, if any paging flag was given
    fn page(&self) -> Option<Page> {
        if self.skip.is_none() && self.limit.is_none() {
            return None;
        }
        Some(Page {
            skip: self.skip.unwrap_or(0),
            limit: self.limit.unwrap_or(review_client::DEFAULT_PAGE_LIMIT),
        })
    }
}

/// Run the list workflow once and return the loaded summaries
pub(crate) async fn fetch(
    gateway: Arc<dyn ReviewGateway>,
    page: Option<Page>,
) -> anyhow::Result<Vec<ReviewListItem>> {
    let mut workflow = ListWorkflow::new(gateway);
    if let Some(page) = page {
        tracing::debug!(skip = page.skip, limit = page.limit, "Fetching review page");
        workflow = workflow.with_page(page);
    }
    workflow.load().await;

    if let Some(message) = workflow.error() {
        anyhow::bail!("{}", message);
    }
    Ok(workflow.items().map(<[_]>::to_vec).unwrap_or_default())
}

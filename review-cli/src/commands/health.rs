//! Health command - check that the review service is reachable

use clap::Args;
use review_core::Config;

/// Check the review service health endpoint
#[derive(Args, Debug)]
pub struct HealthArgs {}

impl HealthArgs {
    /// Execute the health command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = super::connect(config)?;

        let health = client
            .health()
            .await
            .map_err(|e| anyhow::anyhow!("Service at {} is unreachable: {}", client.base_url(), e))?;

        println!("Service: {}", client.base_url());
        println!("Status:  {}", health.status);

        if !health.is_ok() {
            anyhow::bail!("Service reported status '{}'", health.status);
        }
        Ok(())
    }
}

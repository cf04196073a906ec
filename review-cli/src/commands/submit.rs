//! Submit command - send code for review and follow the result

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use review_core::{Config, Language, Redirect, ReviewGateway, Route, SubmitWorkflow};
use tokio::io::AsyncReadExt;

use crate::render::{self, OutputFormat};

/// Submit a source file for review
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// File to review, or `-` to read from stdin
    pub file: PathBuf,

    /// Language of the code (omit to auto-detect)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Path to report to the service (defaults to FILE)
    #[arg(long)]
    pub file_path: Option<String>,

    /// Print the new review id and exit without waiting for the redirect
    #[arg(long)]
    pub no_follow: bool,
}

impl SubmitArgs {
    /// Execute the submit command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
        let code = self.read_code().await?;

        if let Some(language) = self.language.as_deref() {
            if !language.trim().is_empty() && Language::find(language).is_none() {
                tracing::warn!(language, "Language is not in the supported list; sending as-is");
            }
        }

        let client = super::connect(config)?;
        let gateway: Arc<dyn ReviewGateway> = client;

        let redirect = submit(
            Arc::clone(&gateway),
            code,
            self.reported_path(),
            self.language.clone(),
            config.ui.redirect_delay,
        )
        .await?;

        println!("{}", redirect.message());
        let Route::Detail(id) = redirect.route.clone() else {
            anyhow::bail!("Unexpected redirect to {}", redirect.route);
        };
        println!("Review ID: {}", id);

        if self.no_follow {
            return Ok(());
        }

        let route = redirect.wait().await;
        tracing::debug!(route = %route, "Following redirect");
        println!();

        let review = super::show::fetch(gateway, &id).await?;
        print!("{}", render::review(&review, format)?);
        Ok(())
    }

    fn is_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }

    fn reported_path(&self) -> String {
        match &self.file_path {
            Some(path) => path.clone(),
            None if self.is_stdin() => String::new(),
            None => self.file.display().to_string(),
        }
    }

    async fn read_code(&self) -> anyhow::Result<String> {
        if self.is_stdin() {
            let mut code = String::new();
            tokio::io::stdin()
                .read_to_string(&mut code)
                .await
                .context("Failed to read code from stdin")?;
            Ok(code)
        } else {
            tokio::fs::read_to_string(&self.file)
                .await
                .with_context(|| format!("Failed to read {}", self.file.display()))
        }
    }
}

/// Fill in the submission form, send it, and return the scheduled redirect
///
/// Validation and service failures surface as the form's user-facing message.
pub(crate) async fn submit(
    gateway: Arc<dyn ReviewGateway>,
    code: String,
    file_path: String,
    language: Option<String>,
    redirect_delay: Duration,
) -> anyhow::Result<Redirect> {
    let mut workflow = SubmitWorkflow::new(gateway).with_redirect_delay(redirect_delay);
    workflow.activate();
    workflow.set_code(code)?;
    workflow.set_file_path(file_path)?;
    if let Some(language) = language {
        workflow.set_language(language)?;
    }

    if let Some(message) = workflow.send().await? {
        anyhow::bail!("{}", message);
    }
    if let Some(message) = workflow.error() {
        anyhow::bail!("{}", message);
    }

    workflow
        .take_redirect()
        .ok_or_else(|| anyhow::anyhow!("Submission finished without a review id"))
}

//! ai-review - Command line interface for the AI code review service
//!
//! Submit code, browse past reviews and re-run analysis from the terminal.

mod commands;
mod render;

use clap::{Parser, Subcommand};
use review_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{HealthArgs, ListArgs, RerunArgs, ShowArgs, SubmitArgs};
use render::OutputFormat;

/// AI code review: submit code and browse review results
#[derive(Parser, Debug)]
#[command(name = "ai-review")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the review service (overrides config and env)
    #[arg(long, global = true, env = "AI_REVIEW_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// List reviews
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a review
    Show(ShowArgs),

    /// Re-run analysis for a review
    Rerun(RerunArgs),

    /// Submit code for review
    Submit(SubmitArgs),

    /// List languages that can be passed to `submit --language`
    Languages,

    /// Check that the review service is reachable
    Health(HealthArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.api_url.clone())?;

    if cli.verbose {
        tracing::info!(
            base_url = %config.api.base_url,
            redirect_delay = ?config.ui.redirect_delay,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("ai-review {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::List(args)) => {
            args.execute(&config, cli.format).await?;
        }
        Some(Commands::Show(args)) => {
            args.execute(&config, cli.format).await?;
        }
        Some(Commands::Rerun(args)) => {
            args.execute(&config, cli.format).await?;
        }
        Some(Commands::Submit(args)) => {
            args.execute(&config, cli.format).await?;
        }
        Some(Commands::Languages) => {
            print!("{}", render::languages(cli.format)?);
        }
        Some(Commands::Health(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Config) => {
            println!("AI Review Configuration");
            println!("=======================");
            println!();
            println!("API Settings:");
            println!("  base_url: {}", config.api.base_url);
            println!();
            println!("UI Settings:");
            println!("  redirect_delay: {:?}", config.ui.redirect_delay);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("ai-review - AI code review from the terminal");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

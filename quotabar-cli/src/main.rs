// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Quotabar CLI - AI provider usage monitoring from the command line.
//!
//! # Examples
//!
//! ```bash
//! # One refresh round over all providers
//! quotabar
//!
//! # A single provider
//! quotabar usage --provider claude
//!
//! # JSON output
//! quotabar --format json
//!
//! # List providers
//! quotabar providers
//!
//! # Watch mode
//! quotabar watch --interval 300
//!
//! # Environment doctor
//! quotabar check
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{check, providers, usage, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// Quotabar CLI - AI provider usage monitoring.
#[derive(Parser)]
#[command(name = "quotabar")]
#[command(about = "AI provider usage and quota monitoring CLI")]
#[command(long_about = r"
Quotabar polls usage quotas across providers and shows one normalized
reading per provider, falling back to the last cached reading when a
fetch fails.

Providers:
  • OpenRouter credits (openrouter)
  • Local Claude cost ledger (claude)
  • Cursor billing dashboard (cursor; needs an authenticated browser
    session and therefore shows cached data from the CLI)

Examples:
  quotabar                        # One round over all providers
  quotabar usage -p claude        # Single provider
  quotabar --format json          # JSON output
  quotabar watch --interval 300   # Keep refreshing
")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'usage' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch current usage (default if no command specified).
    #[command(visible_alias = "u")]
    Usage(usage::UsageArgs),

    /// List available providers.
    #[command(visible_alias = "p")]
    Providers,

    /// Keep refreshing and stream updates.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Check the local environment (binary, credential, cache dir).
    Check,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("quotabar=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quotabar=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Usage(args)) => usage::run(args, &cli).await,
        Some(Commands::Providers) => providers::run(&cli),
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        Some(Commands::Check) => check::run(&cli).await,
        None => usage::run(&usage::UsageArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}

//! Watch command - run the scheduler loop and stream updates.

use anyhow::Result;
use clap::Args;
use tracing::info;

use quotabar_engine::{RefreshTrigger, Update};
use quotabar_store::Settings;

use crate::output::TextFormatter;
use crate::Cli;

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds (overrides settings).
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Minimum interval to accept.
    #[arg(long, default_value = "30")]
    pub min_interval: u64,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    let mut settings = Settings::load_default().await;
    if let Some(interval) = args.interval {
        settings.refresh_interval_secs = interval.max(args.min_interval);
    }

    info!(
        interval = settings.refresh_interval_secs,
        "Starting watch mode"
    );

    let mut engine = super::build_engine(&settings).await;
    let formatter = TextFormatter::new(!cli.no_color);

    // Manual kick for the first round; if it races the loop's immediate
    // first tick, the single-flight gate drops the duplicate.
    engine.triggers_tx.send(RefreshTrigger::Manual(None))?;

    let scheduler = engine.scheduler.clone();
    let loop_task = tokio::spawn(scheduler.run(engine.triggers_rx));

    loop {
        tokio::select! {
            update = engine.updates.recv() => {
                let Some(update) = update else { break };
                let now = chrono::Local::now().format("%H:%M:%S");
                match update {
                    Update::Provider { provider, payload } => {
                        println!("[{now}] {}", formatter.format_line(provider, &payload));
                    }
                    Update::Session(state) => {
                        println!("[{now}] session: {state}");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    loop_task.abort();
    Ok(())
}

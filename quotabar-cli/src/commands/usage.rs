//! Usage command - one refresh round.

use anyhow::Result;
use clap::Args;
use std::collections::HashMap;

use quotabar_core::ProviderId;
use quotabar_engine::{Update, UpdatePayload};
use quotabar_store::Settings;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

use super::{build_engine, resolve_providers};

/// Arguments for the usage command.
#[derive(Args, Default)]
pub struct UsageArgs {
    /// Provider to query (or "all").
    #[arg(long, short)]
    pub provider: Option<String>,
}

/// Runs the usage command.
pub async fn run(args: &UsageArgs, cli: &Cli) -> Result<()> {
    let settings = Settings::load_default().await;
    let providers = resolve_providers(args.provider.as_deref())?;

    let mut engine = build_engine(&settings).await;

    // One round, providers concurrently, results in completion order.
    for id in &providers {
        engine.scheduler.spawn_refresh(*id);
    }

    // Collect the terminal payload per provider ("Refreshing" is not
    // terminal), stopping once every requested provider reported.
    let mut terminal: HashMap<ProviderId, UpdatePayload> = HashMap::new();
    while terminal.len() < providers.len() {
        let Some(update) = engine.updates.recv().await else {
            break;
        };
        if let Update::Provider { provider, payload } = update {
            if !matches!(payload, UpdatePayload::Refreshing) {
                terminal.insert(provider, payload);
            }
        }
    }

    match cli.format {
        OutputFormat::Json => {
            let formatter = JsonFormatter::new();
            println!("{}", formatter.format_round(&providers, &terminal)?);
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            for id in &providers {
                if let Some(payload) = terminal.get(id) {
                    println!("{}", formatter.format_payload(*id, payload));
                    println!();
                }
            }
        }
    }

    Ok(())
}

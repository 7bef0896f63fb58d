//! Providers command - list what can be polled.

use anyhow::Result;

use quotabar_core::{ProviderId, ProviderType};

use crate::{Cli, OutputFormat};

/// Static listing row.
struct Row {
    id: ProviderId,
    provider_type: ProviderType,
    requires_session: bool,
    description: &'static str,
}

fn rows() -> Vec<Row> {
    vec![
        Row {
            id: ProviderId::OpenRouter,
            provider_type: ProviderType::PayAsYouGo,
            requires_session: false,
            description: "Token-credit API (bearer key)",
        },
        Row {
            id: ProviderId::Claude,
            provider_type: ProviderType::PayAsYouGo,
            requires_session: false,
            description: "Local cost ledger (statistics CLI)",
        },
        Row {
            id: ProviderId::Cursor,
            provider_type: ProviderType::Metered,
            requires_session: true,
            description: "Billing dashboard (browser session)",
        },
    ]
}

/// Runs the providers command.
pub fn run(cli: &Cli) -> Result<()> {
    if cli.format == OutputFormat::Json {
        let listing: Vec<serde_json::Value> = rows()
            .iter()
            .map(|row| {
                serde_json::json!({
                    "id": row.id.wire_name(),
                    "name": row.id.display_name(),
                    "type": row.provider_type.label(),
                    "requires_session": row.requires_session,
                    "description": row.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{:<12} {:<15} {:<8} DESCRIPTION", "ID", "TYPE", "SESSION");
    for row in rows() {
        println!(
            "{:<12} {:<15} {:<8} {}",
            row.id.wire_name(),
            row.provider_type.label(),
            if row.requires_session { "yes" } else { "no" },
            row.description,
        );
    }

    Ok(())
}

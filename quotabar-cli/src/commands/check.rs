//! Check command - environment doctor.

use anyhow::Result;

use quotabar_fetch::{CredentialStore, KeyringCredentials};
use quotabar_store::{default_cache_dir, Settings};

use crate::{Cli, OutputFormat};

/// One doctor finding.
struct Finding {
    subject: &'static str,
    ok: bool,
    detail: String,
}

/// Runs the check command.
pub async fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::load_default().await;
    let mut findings = Vec::new();

    // Ledger binary on PATH.
    let ledger_found = which::which(&settings.ledger_command).is_ok();
    findings.push(Finding {
        subject: "ledger command",
        ok: ledger_found,
        detail: if ledger_found {
            settings.ledger_command.clone()
        } else {
            format!("{} not on PATH", settings.ledger_command)
        },
    });

    // OpenRouter credential present.
    let credential = KeyringCredentials::new()
        .get("quotabar", "openrouter")
        .await;
    let (ok, detail) = match credential {
        Ok(Some(_)) => (true, "stored".to_string()),
        Ok(None) => (false, "no key stored for quotabar/openrouter".to_string()),
        Err(e) => (false, format!("credential storage unavailable: {e}")),
    };
    findings.push(Finding {
        subject: "openrouter key",
        ok,
        detail,
    });

    // Cache directory writable.
    let cache_dir = default_cache_dir();
    let writable = tokio::fs::create_dir_all(&cache_dir).await.is_ok();
    findings.push(Finding {
        subject: "cache directory",
        ok: writable,
        detail: cache_dir.display().to_string(),
    });

    if cli.format == OutputFormat::Json {
        let listing: Vec<serde_json::Value> = findings
            .iter()
            .map(|f| {
                serde_json::json!({
                    "subject": f.subject,
                    "ok": f.ok,
                    "detail": f.detail,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for f in &findings {
        let mark = if f.ok {
            if cli.no_color { "✓" } else { "\x1b[32m✓\x1b[0m" }
        } else if cli.no_color {
            "✗"
        } else {
            "\x1b[31m✗\x1b[0m"
        };
        println!("{mark} {:<16} {}", f.subject, f.detail);
    }

    Ok(())
}

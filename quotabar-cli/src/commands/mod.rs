//! CLI subcommands.

pub mod check;
pub mod providers;
pub mod usage;
pub mod watch;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch as watch_ch};

use quotabar_core::{ProviderId, SessionState};
use quotabar_engine::{RefreshTrigger, Scheduler, Update};
use quotabar_fetch::FetchContext;
use quotabar_providers::{default_providers, LedgerConfig};
use quotabar_store::{CacheStore, Settings};

/// Everything a command needs to drive the engine.
pub struct Engine {
    /// The scheduler, ready to refresh.
    pub scheduler: Scheduler,
    /// Display updates from the scheduler.
    pub updates: mpsc::UnboundedReceiver<Update>,
    /// Trigger input for the scheduler's run loop.
    pub triggers_tx: mpsc::UnboundedSender<RefreshTrigger>,
    /// Trigger channel handed to `Scheduler::run`.
    pub triggers_rx: mpsc::UnboundedReceiver<RefreshTrigger>,
}

/// Wires up the scheduler the way every command uses it.
///
/// The CLI has no embedded browser, so the session starts (and stays)
/// unauthenticated; the Cursor provider degrades to its cached snapshot.
pub async fn build_engine(settings: &Settings) -> Engine {
    let ledger = LedgerConfig {
        command: settings.ledger_command.clone(),
        monthly_budget_usd: settings.ledger_monthly_budget_usd,
    };

    let (_session_tx, session_rx) = watch_ch::channel(SessionState::Unauthenticated);
    let providers = default_providers(ledger, session_rx.clone());

    let cache = CacheStore::open_default();
    let ctx = Arc::new(FetchContext::new());

    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let (triggers_tx, triggers_rx) = mpsc::unbounded_channel();

    let scheduler = Scheduler::new(
        providers,
        ctx,
        cache,
        session_rx,
        updates_tx,
        Duration::from_secs(settings.refresh_interval_secs),
    );

    Engine {
        scheduler,
        updates: updates_rx,
        triggers_tx,
        triggers_rx,
    }
}

/// Resolves a provider argument to ids.
pub fn resolve_providers(arg: Option<&str>) -> anyhow::Result<Vec<ProviderId>> {
    match arg {
        None => Ok(ProviderId::all().to_vec()),
        Some("all") => Ok(ProviderId::all().to_vec()),
        Some(name) => {
            let id = ProviderId::from_wire_name(name)
                .map_err(|_| anyhow::anyhow!("Unknown provider: {name}"))?;
            Ok(vec![id])
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Quotabar Providers
//!
//! The three usage providers behind the [`quotabar_fetch::UsageProvider`]
//! contract, plus the tolerant text-extraction utilities they share:
//!
//! - [`openrouter`] - Token-credit REST API (bearer key, credits + limits,
//!   best-effort activity history)
//! - [`claude`] - Local cost ledger reported by an external statistics CLI
//! - [`cursor`] - Billing dashboard scraped through an authenticated
//!   document host (staged account-identifier discovery)
//! - [`extract`] - Labeled-field and repeated-row extraction

pub mod claude;
pub mod cursor;
pub mod extract;
pub mod openrouter;

pub use claude::{ClaudeLedgerProvider, LedgerConfig};
pub use cursor::CursorDashboardProvider;
pub use openrouter::OpenRouterProvider;

use quotabar_fetch::UsageProvider;
use std::sync::Arc;
use tokio::sync::watch;

/// Builds the default provider set.
///
/// The Cursor provider observes the given session state channel; the
/// others are session-independent.
pub fn default_providers(
    ledger: LedgerConfig,
    session: watch::Receiver<quotabar_core::SessionState>,
) -> Vec<Arc<dyn UsageProvider>> {
    vec![
        Arc::new(OpenRouterProvider::new()),
        Arc::new(ClaudeLedgerProvider::new(ledger)),
        Arc::new(CursorDashboardProvider::new(session)),
    ]
}

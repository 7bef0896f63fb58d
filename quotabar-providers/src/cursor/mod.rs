//! Cursor billing-dashboard provider.
//!
//! No stable API exists; the provider reuses the authenticated session of
//! an embedded document host, discovers the account identifier through an
//! ordered fallback chain, then reads the usage table and the
//! premium-request entitlement.

mod api;
mod fetcher;
mod identify;

pub use api::{TableTotals, UsageRow};
pub use fetcher::CursorDashboardProvider;
pub use identify::discover_account_id;

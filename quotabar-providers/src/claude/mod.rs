//! Local Claude cost-ledger provider.
//!
//! Usage is reported by an external statistics CLI; one summary
//! invocation covers the 30-day window and seven more build the trailing
//! daily history from cumulative totals.

mod fetcher;
mod parser;

pub use fetcher::{ClaudeLedgerProvider, LedgerConfig};
pub use parser::{parse_usage_summary, CliUsageStats};

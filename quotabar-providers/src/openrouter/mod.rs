//! OpenRouter token-credit API provider.
//!
//! Two required reads (credits summary, key limits) plus a best-effort
//! activity listing bucketed into a daily history.

mod api;
mod fetcher;

pub use api::{ActivityRecord, CreditsData, KeyData};
pub use fetcher::OpenRouterProvider;

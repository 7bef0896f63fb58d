//! The provider capability contract.
//!
//! A provider is one pluggable source of usage data. The three shipped
//! implementations live in `quotabar-providers`; the scheduler drives any
//! of them uniformly through this trait.

use async_trait::async_trait;
use quotabar_core::{ProviderId, ProviderResult, ProviderType};

use crate::context::FetchContext;
use crate::error::FetchError;

// ============================================================================
// Usage Provider Trait
// ============================================================================

/// A source of usage data for one account/service.
///
/// Contract:
/// - `fetch()` performs exactly one round of acquisition and must complete
///   or fail within a bounded time (the context timeout governs each
///   suspension point).
/// - Internal fallbacks (e.g. an ordered identifier-discovery chain) are
///   allowed; retries across rounds are not — those belong to the
///   scheduler.
/// - Providers never touch the cache store; degrading a failure into a
///   cached reading is the scheduler's job.
///
/// ## Implementing a provider
///
/// ```ignore
/// struct CreditApiProvider;
///
/// #[async_trait]
/// impl UsageProvider for CreditApiProvider {
///     fn id(&self) -> ProviderId {
///         ProviderId::OpenRouter
///     }
///
///     async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderResult, FetchError> {
///         let key = ctx.credentials.get("quotabar", "openrouter").await?;
///         // Issue requests, parse, normalize...
///     }
/// }
/// ```
#[async_trait]
pub trait UsageProvider: Send + Sync {
    /// Stable identifier for this provider.
    fn id(&self) -> ProviderId;

    /// The billing model this provider reports.
    fn provider_type(&self) -> ProviderType;

    /// Whether fetches require an authenticated browser session.
    ///
    /// The scheduler consults this before invoking `fetch()` and degrades
    /// to cache when the session is not ready.
    fn requires_session(&self) -> bool {
        false
    }

    /// Performs one round of data acquisition.
    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderResult, FetchError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quotabar_core::UsageResult;

    struct StubProvider;

    #[async_trait]
    impl UsageProvider for StubProvider {
        fn id(&self) -> ProviderId {
            ProviderId::OpenRouter
        }

        fn provider_type(&self) -> ProviderType {
            ProviderType::PayAsYouGo
        }

        async fn fetch(&self, _ctx: &FetchContext) -> Result<ProviderResult, FetchError> {
            Ok(ProviderResult::new(UsageResult::PayAsYouGo {
                utilization_percent: 10.0,
                cost_so_far: 1.0,
                resets_at: None,
            }))
        }
    }

    #[test]
    fn test_default_requires_session() {
        assert!(!StubProvider.requires_session());
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let provider: Box<dyn UsageProvider> = Box::new(StubProvider);
        let ctx = FetchContext::new();
        let result = provider.fetch(&ctx).await.unwrap();
        assert_eq!(result.usage.used_percent(), 10.0);
    }
}

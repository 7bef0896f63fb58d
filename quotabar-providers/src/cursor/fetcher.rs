//! Cursor dashboard fetcher.

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use quotabar_core::{ProviderId, ProviderResult, ProviderType, SessionState, UsageResult};
use quotabar_fetch::{FetchContext, FetchError, UsageProvider};

use super::api::{fetch_entitlement, fetch_usage_table};
use super::identify::discover_account_id;

// ============================================================================
// Provider
// ============================================================================

/// Browser-billing-scrape provider for Cursor.
///
/// Observes the shared session state and refuses to touch the document
/// host while the session is not authenticated.
#[derive(Debug, Clone)]
pub struct CursorDashboardProvider {
    session: watch::Receiver<SessionState>,
}

impl CursorDashboardProvider {
    /// Creates a provider observing the given session channel.
    pub fn new(session: watch::Receiver<SessionState>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UsageProvider for CursorDashboardProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Cursor
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Metered
    }

    fn requires_session(&self) -> bool {
        true
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderResult, FetchError> {
        // Checked here as well as by the scheduler: a direct caller must
        // not reach the document host with a dead session either.
        if *self.session.borrow() != SessionState::Authenticated {
            return Err(FetchError::NotAuthenticated);
        }

        let account_id = discover_account_id(ctx.document.as_ref()).await?;

        // The table is required; the entitlement card is not.
        let totals = fetch_usage_table(ctx.document.as_ref(), &account_id).await?;

        let limit = match fetch_entitlement(ctx.document.as_ref()).await {
            Ok(limit) => limit,
            Err(e) => {
                // Zero means "no limit info" to the display layer, not
                // "zero quota".
                warn!(error = %e, "Entitlement unavailable, emitting unknown limit");
                0
            }
        };

        info!(
            account_id = %account_id,
            used = totals.used_requests,
            limit = limit,
            "Cursor dashboard fetched"
        );

        Ok(ProviderResult {
            usage: UsageResult::Metered {
                used: totals.used_requests,
                limit,
                resets_at: None,
            },
            details: totals.details,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quotabar_fetch::{DocumentError, DocumentHost, FetchContext};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Host serving the happy path: identifier on stage 1, JSON table,
    /// camel-cased entitlement.
    struct DashboardHost {
        evals: AtomicUsize,
        fail_entitlement: bool,
    }

    impl DashboardHost {
        fn new(fail_entitlement: bool) -> Self {
            Self {
                evals: AtomicUsize::new(0),
                fail_entitlement,
            }
        }
    }

    #[async_trait]
    impl DocumentHost for DashboardHost {
        async fn eval(&self, script: &str) -> Result<serde_json::Value, DocumentError> {
            self.evals.fetch_add(1, Ordering::SeqCst);

            if script.contains("/api/auth/me") {
                return Ok(json!({"id": 7001}));
            }
            if script.contains("/api/dashboard/usage") {
                assert!(script.contains("customerId=7001"));
                return Ok(json!(
                    r#"[{"date":"2025-03-01","includedRequests":40,"billedRequests":5}]"#
                ));
            }
            if script.contains("/api/dashboard/premium-requests") {
                if self.fail_entitlement {
                    return Err(DocumentError::EvalFailed("card 500".to_string()));
                }
                return Ok(json!(r#"{"premiumRequests":500}"#));
            }
            Err(DocumentError::EvalFailed(format!("unexpected script: {script}")))
        }

        async fn navigate(&self, _url: &str) -> Result<(), DocumentError> {
            Ok(())
        }
    }

    fn authenticated_session() -> watch::Receiver<SessionState> {
        // The last value stays readable after the sender drops.
        let (_tx, rx) = watch::channel(SessionState::Authenticated);
        rx
    }

    #[tokio::test]
    async fn test_full_fetch() {
        let ctx = FetchContext::builder()
            .document(Arc::new(DashboardHost::new(false)))
            .build();

        let provider = CursorDashboardProvider::new(authenticated_session());
        let result = provider.fetch(&ctx).await.unwrap();

        match result.usage {
            UsageResult::Metered { used, limit, .. } => {
                assert_eq!(used, 45);
                assert_eq!(limit, 500);
            }
            UsageResult::PayAsYouGo { .. } => panic!("wrong variant"),
        }
        assert_eq!(result.details.unwrap().daily.len(), 1);
    }

    #[tokio::test]
    async fn test_entitlement_failure_degrades_to_unknown_limit() {
        let ctx = FetchContext::builder()
            .document(Arc::new(DashboardHost::new(true)))
            .build();

        let provider = CursorDashboardProvider::new(authenticated_session());
        let result = provider.fetch(&ctx).await.unwrap();

        match result.usage {
            UsageResult::Metered { used, limit, .. } => {
                assert_eq!(used, 45);
                assert_eq!(limit, 0);
            }
            UsageResult::PayAsYouGo { .. } => panic!("wrong variant"),
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_fetch_makes_zero_host_calls() {
        let host = Arc::new(DashboardHost::new(false));
        let ctx = FetchContext::builder().document(host.clone()).build();

        let (_tx, rx) = watch::channel(SessionState::Unauthenticated);
        let provider = CursorDashboardProvider::new(rx);

        let err = provider.fetch(&ctx).await.unwrap_err();
        assert!(matches!(err, FetchError::NotAuthenticated));
        assert_eq!(host.evals.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_requires_session() {
        let (_tx, rx) = watch::channel(SessionState::Unauthenticated);
        assert!(CursorDashboardProvider::new(rx).requires_session());
    }
}

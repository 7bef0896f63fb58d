//! Fetch context providing access to host APIs.
//!
//! The fetch context is passed to every provider and bundles the injected
//! transports: credential store, HTTP client, command runner, and the
//! scriptable document host. Tests swap any of them through the builder.

use std::sync::Arc;
use std::time::Duration;

use crate::host::{
    credentials::{CredentialStore, KeyringCredentials},
    document::{DetachedDocumentHost, DocumentHost},
    http::HttpClient,
    process::{CommandRunner, SystemCommandRunner},
};

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Bound on each network request, script evaluation, or subprocess
    /// invocation. Providers issuing several sequential calls take
    /// proportionally longer overall.
    pub timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl FetchSettings {
    /// Creates settings with a custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to providers, giving access to host APIs.
pub struct FetchContext {
    /// Read-only credential lookup.
    pub credentials: Arc<dyn CredentialStore>,
    /// HTTP client with tracing.
    pub http: Arc<HttpClient>,
    /// Subprocess runner for CLI ledgers.
    pub process: Arc<dyn CommandRunner>,
    /// Scriptable document host (detached unless a browser is attached).
    pub document: Arc<dyn DocumentHost>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with default host API implementations.
    pub fn new() -> Self {
        Self::with_settings(FetchSettings::default())
    }

    /// Creates a context with custom settings.
    pub fn with_settings(settings: FetchSettings) -> Self {
        Self {
            credentials: Arc::new(KeyringCredentials::new()),
            http: Arc::new(HttpClient::with_timeout(settings.timeout)),
            process: Arc::new(SystemCommandRunner::new()),
            document: Arc::new(DetachedDocumentHost::new()),
            settings,
        }
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the per-operation timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
pub struct FetchContextBuilder {
    credentials: Option<Arc<dyn CredentialStore>>,
    http: Option<Arc<HttpClient>>,
    process: Option<Arc<dyn CommandRunner>>,
    document: Option<Arc<dyn DocumentHost>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            credentials: None,
            http: None,
            process: None,
            document: None,
            settings: FetchSettings::default(),
        }
    }

    /// Sets the credential store.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the HTTP client.
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the command runner.
    pub fn process(mut self, process: Arc<dyn CommandRunner>) -> Self {
        self.process = Some(process);
        self
    }

    /// Attaches a document host.
    pub fn document(mut self, document: Arc<dyn DocumentHost>) -> Self {
        self.document = Some(document);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the per-operation timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Builds the fetch context.
    pub fn build(self) -> FetchContext {
        let timeout = self.settings.timeout;
        FetchContext {
            credentials: self
                .credentials
                .unwrap_or_else(|| Arc::new(KeyringCredentials::new())),
            http: self
                .http
                .unwrap_or_else(|| Arc::new(HttpClient::with_timeout(timeout))),
            process: self
                .process
                .unwrap_or_else(|| Arc::new(SystemCommandRunner::new())),
            document: self
                .document
                .unwrap_or_else(|| Arc::new(DetachedDocumentHost::new())),
            settings: self.settings,
        }
    }
}

impl Default for FetchContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = FetchContext::new();
        assert_eq!(ctx.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_context_builder_timeout() {
        let ctx = FetchContext::builder()
            .timeout(Duration::from_secs(60))
            .build();

        assert_eq!(ctx.settings.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_default_document_host_is_detached() {
        let ctx = FetchContext::new();
        let result = ctx.document.eval("1 + 1").await;
        assert!(result.is_err());
    }
}

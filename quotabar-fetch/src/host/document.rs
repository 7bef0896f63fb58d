//! Scriptable document host.
//!
//! The billing-dashboard provider has no stable API; it reuses the
//! authenticated session of an embedded browser by evaluating script
//! expressions against the loaded page. The browser itself lives outside
//! this workspace — consumers hand the engine an implementation of
//! [`DocumentHost`], and the host's page-load / session-expired lifecycle
//! events reach the engine as `SessionEvent`s over a channel.

use async_trait::async_trait;

use crate::error::DocumentError;

// ============================================================================
// Document Host Trait
// ============================================================================

/// Capability to evaluate scripts against an authenticated page.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Evaluates a script expression against the current page.
    ///
    /// The expression must resolve to a JSON-serializable value; promises
    /// are awaited by the host before serialization.
    async fn eval(&self, script: &str) -> Result<serde_json::Value, DocumentError>;

    /// Navigates the page to the given URL.
    async fn navigate(&self, url: &str) -> Result<(), DocumentError>;
}

// ============================================================================
// Detached Host
// ============================================================================

/// Placeholder host for contexts with no embedded browser attached
/// (headless CLI runs). Every operation fails with
/// [`DocumentError::NotAttached`].
#[derive(Debug, Clone, Default)]
pub struct DetachedDocumentHost;

impl DetachedDocumentHost {
    /// Creates a detached host.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentHost for DetachedDocumentHost {
    async fn eval(&self, _script: &str) -> Result<serde_json::Value, DocumentError> {
        Err(DocumentError::NotAttached)
    }

    async fn navigate(&self, _url: &str) -> Result<(), DocumentError> {
        Err(DocumentError::NotAttached)
    }
}

// ============================================================================
// Tests
// ============================================================================

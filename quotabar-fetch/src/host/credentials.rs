//! Read-only bearer credential lookup.
//!
//! Credentials are provisioned out of band (keychain entry, secret
//! service); this module only reads them. An absent credential is a
//! configuration problem for the provider that needed it, never a
//! transport failure.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::error::CredentialError;

// ============================================================================
// Credential Store Trait
// ============================================================================

/// Capability to look up a stored bearer credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Gets a credential.
    ///
    /// Returns `Ok(None)` when no credential is stored — callers decide
    /// whether that is fatal. An empty stored value counts as absent.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` only for storage-level failures (access
    /// denied, backend unavailable), not for missing entries.
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, CredentialError>;
}

// ============================================================================
// Keyring Credentials
// ============================================================================

/// Production credential store over the system keychain.
///
/// - macOS: Keychain Services
/// - Linux: Secret Service (GNOME Keyring, KDE Wallet)
/// - Windows: Credential Manager
#[derive(Debug, Clone, Default)]
pub struct KeyringCredentials;

impl KeyringCredentials {
    /// Creates a new keyring-backed store.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialStore for KeyringCredentials {
    async fn get(&self, service: &str, account: &str) -> Result<Option<String>, CredentialError> {
        debug!(service = %service, account = %account, "Credential lookup");

        let entry = Entry::new(service, account).map_err(CredentialError::from)?;

        match entry.get_password() {
            Ok(password) if !password.is_empty() => Ok(Some(password)),
            // Empty password and no entry both mean "not configured".
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(service = %service, account = %account, error = %e, "Credential lookup failed");
                Err(CredentialError::from(e))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

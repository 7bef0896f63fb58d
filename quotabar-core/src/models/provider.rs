//! Provider identity types.
//!
//! This module contains the types identifying a usage source:
//! - [`ProviderId`] - Enum of supported providers, stable cache key
//! - [`ProviderType`] - Billing model (metered vs pay-as-you-go)

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Provider Id
// ============================================================================

/// Supported usage providers.
///
/// The wire name (lowercase) is the stable key used for cache files and
/// CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// OpenRouter token-credit API.
    OpenRouter,
    /// Local Claude cost ledger (CLI-reported).
    Claude,
    /// Cursor billing dashboard (browser session).
    Cursor,
}

impl ProviderId {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenRouter => "OpenRouter",
            Self::Claude => "Claude",
            Self::Cursor => "Cursor",
        }
    }

    /// Returns the stable lowercase wire name.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::OpenRouter => "openrouter",
            Self::Claude => "claude",
            Self::Cursor => "cursor",
        }
    }

    /// Returns all provider ids.
    pub fn all() -> &'static [ProviderId] {
        &[Self::OpenRouter, Self::Claude, Self::Cursor]
    }

    /// Parses a wire name back into a provider id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownProvider` for an unrecognized name.
    pub fn from_wire_name(name: &str) -> Result<Self, CoreError> {
        Self::all()
            .iter()
            .find(|p| p.wire_name() == name)
            .copied()
            .ok_or_else(|| CoreError::UnknownProvider(name.to_string()))
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Provider Type
// ============================================================================

/// Billing model of a provider.
///
/// Selects which fields of a [`super::UsageResult`] are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// Hard numeric limit with a reset time.
    Metered,
    /// Billed by accrued cost, optionally capped by a derived percentage.
    PayAsYouGo,
}

impl ProviderType {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Metered => "Metered",
            Self::PayAsYouGo => "Pay-as-you-go",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_name_round_trip() {
        for id in ProviderId::all() {
            let parsed = ProviderId::from_wire_name(id.wire_name()).unwrap();
            assert_eq!(parsed, *id);
        }
    }

    #[test]
    fn test_unknown_wire_name() {
        let result = ProviderId::from_wire_name("copilot");
        assert!(matches!(result, Err(CoreError::UnknownProvider(_))));
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&ProviderId::OpenRouter).unwrap();
        assert_eq!(json, "\"openrouter\"");

        let back: ProviderId = serde_json::from_str("\"cursor\"").unwrap();
        assert_eq!(back, ProviderId::Cursor);
    }

    #[test]
    fn test_provider_type_label() {
        assert_eq!(ProviderType::Metered.label(), "Metered");
        assert_eq!(ProviderType::PayAsYouGo.to_string(), "Pay-as-you-go");
    }
}

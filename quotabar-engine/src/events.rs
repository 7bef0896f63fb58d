//! Events flowing into and out of the scheduler.

use quotabar_core::{CachedSnapshot, ProviderId, ProviderResult, SessionState};

// ============================================================================
// Refresh Trigger
// ============================================================================

/// Reasons a refresh round starts.
///
/// Every trigger funnels through the same single-flight gate, so a
/// trigger arriving while a provider is mid-fetch is dropped for that
/// provider, not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The recurring timer fired.
    Timer,
    /// The user asked for a refresh, of one provider or all.
    Manual(Option<ProviderId>),
    /// The browser session just became ready.
    SessionReady,
}

// ============================================================================
// Display Updates
// ============================================================================

/// One message to the display collaborator.
#[derive(Debug, Clone)]
pub enum Update {
    /// A per-provider reading or state change.
    Provider {
        /// The provider this update concerns.
        provider: ProviderId,
        /// What happened.
        payload: UpdatePayload,
    },
    /// A session state transition (prompts sign-in UI when it goes
    /// unauthenticated).
    Session(SessionState),
}

/// Per-provider update payloads.
#[derive(Debug, Clone)]
pub enum UpdatePayload {
    /// A fetch just started.
    Refreshing,
    /// A fresh reading.
    Fresh(ProviderResult),
    /// The last cached reading, shown because a fresh one is not
    /// available; always explicitly marked stale.
    Cached {
        /// The cached snapshot.
        snapshot: CachedSnapshot,
        /// Why the display is seeing a cached value.
        reason: StaleReason,
    },
    /// No reading and no cache: the provider needs a sign-in.
    NotSignedIn,
    /// No reading and no cache: the fetch failed terminally.
    Failed(String),
}

/// Why a cached reading is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The session is not authenticated, so no fetch was attempted.
    Unauthenticated,
    /// The fetch ran and failed.
    FetchFailed,
}

impl StaleReason {
    /// Returns a short display tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "stale/unauthenticated",
            Self::FetchFailed => "cached/old",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

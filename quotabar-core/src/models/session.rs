//! Browser session state machine.
//!
//! Browser-backed providers can only fetch while the embedded document
//! host holds an authenticated session. The state machine here is driven
//! exclusively by explicit [`SessionEvent`]s — no component sets the state
//! directly.

use serde::{Deserialize, Serialize};

// ============================================================================
// Session State
// ============================================================================

/// Authentication state of the browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No valid session; browser-backed fetches degrade immediately.
    #[default]
    Unauthenticated,
    /// Sign-in flow in progress.
    Authenticating,
    /// Session established; browser-backed fetches may run.
    Authenticated,
}

impl SessionState {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Not signed in",
            Self::Authenticating => "Signing in",
            Self::Authenticated => "Signed in",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Session Event
// ============================================================================

/// External events that drive session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The login UI started a sign-in flow.
    SignInStarted,
    /// The document host finished loading the dashboard successfully.
    PageLoaded,
    /// The document host reported the session as expired.
    SessionExpired,
}

// ============================================================================
// Session Tracker
// ============================================================================

/// The session state machine.
///
/// Transitions:
/// - `SignInStarted`: Unauthenticated → Authenticating
/// - `PageLoaded`: any → Authenticated
/// - `SessionExpired`: any → Unauthenticated
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionTracker {
    state: SessionState,
}

impl SessionTracker {
    /// Creates a tracker in the unauthenticated state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Applies an event, returning the new state if it caused a transition.
    pub fn apply(&mut self, event: SessionEvent) -> Option<SessionState> {
        let next = match (self.state, event) {
            (SessionState::Unauthenticated, SessionEvent::SignInStarted) => {
                SessionState::Authenticating
            }
            (_, SessionEvent::PageLoaded) => SessionState::Authenticated,
            (_, SessionEvent::SessionExpired) => SessionState::Unauthenticated,
            _ => return None,
        };

        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_flow() {
        let mut tracker = SessionTracker::new();
        assert_eq!(tracker.state(), SessionState::Unauthenticated);

        assert_eq!(
            tracker.apply(SessionEvent::SignInStarted),
            Some(SessionState::Authenticating)
        );
        assert_eq!(
            tracker.apply(SessionEvent::PageLoaded),
            Some(SessionState::Authenticated)
        );
    }

    #[test]
    fn test_expiry_from_authenticated() {
        let mut tracker = SessionTracker::new();
        tracker.apply(SessionEvent::PageLoaded);

        assert_eq!(
            tracker.apply(SessionEvent::SessionExpired),
            Some(SessionState::Unauthenticated)
        );
    }

    #[test]
    fn test_no_op_events_return_none() {
        let mut tracker = SessionTracker::new();

        // Already unauthenticated; expiry changes nothing.
        assert_eq!(tracker.apply(SessionEvent::SessionExpired), None);

        tracker.apply(SessionEvent::PageLoaded);
        // SignInStarted only applies from Unauthenticated.
        assert_eq!(tracker.apply(SessionEvent::SignInStarted), None);
        assert_eq!(tracker.state(), SessionState::Authenticated);

        // Repeated page loads keep the state without re-announcing it.
        assert_eq!(tracker.apply(SessionEvent::PageLoaded), None);
    }
}

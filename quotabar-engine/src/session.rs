//! Session monitor.
//!
//! Consumes the document host's lifecycle events, drives the session
//! state machine, and publishes transitions two ways: a watch channel the
//! scheduler reads synchronously before each browser-backed fetch, and
//! display updates so the UI can prompt for sign-in. The monitor never
//! calls into the scheduler — a `SessionReady` trigger on the shared
//! trigger channel is the only nudge it sends.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use quotabar_core::{SessionEvent, SessionState, SessionTracker};

use crate::events::{RefreshTrigger, Update};

// ============================================================================
// Session Monitor
// ============================================================================

/// Owns the session state machine.
pub struct SessionMonitor {
    tracker: SessionTracker,
    state_tx: watch::Sender<SessionState>,
    updates: mpsc::UnboundedSender<Update>,
    triggers: mpsc::UnboundedSender<RefreshTrigger>,
}

impl SessionMonitor {
    /// Creates a monitor and the state channel the scheduler observes.
    pub fn new(
        updates: mpsc::UnboundedSender<Update>,
        triggers: mpsc::UnboundedSender<RefreshTrigger>,
    ) -> (Self, watch::Receiver<SessionState>) {
        let (state_tx, state_rx) = watch::channel(SessionState::Unauthenticated);
        (
            Self {
                tracker: SessionTracker::new(),
                state_tx,
                updates,
                triggers,
            },
            state_rx,
        )
    }

    /// Applies one event, publishing any resulting transition.
    pub fn handle(&mut self, event: SessionEvent) {
        let Some(state) = self.tracker.apply(event) else {
            debug!(?event, "Session event caused no transition");
            return;
        };

        info!(state = %state, "Session transition");
        let _ = self.state_tx.send(state);
        let _ = self.updates.send(Update::Session(state));

        if state == SessionState::Authenticated {
            let _ = self.triggers.send(RefreshTrigger::SessionReady);
        }
    }

    /// Consumes events until the channel closes.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        debug!("Session event channel closed");
    }
}

// ============================================================================
// Tests
// ============================================================================

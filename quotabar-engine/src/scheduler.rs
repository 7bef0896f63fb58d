//! Polling scheduler.
//!
//! One asynchronous task per `refresh(id)` invocation, serialized
//! per-provider through a single-flight flag. All mutable state lives
//! here, touched only in short synchronous critical sections around the
//! suspension points. Completions are applied in completion order: every
//! flight carries a generation token, and a completion whose generation
//! has been superseded is discarded rather than allowed to overwrite a
//! fresher cache entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use quotabar_core::{ProviderId, SessionState};
use quotabar_fetch::{FetchContext, FetchError, UsageProvider};
use quotabar_store::CacheStore;

use crate::events::{RefreshTrigger, StaleReason, Update, UpdatePayload};

// ============================================================================
// Flight State
// ============================================================================

/// Per-provider fetch state.
#[derive(Debug, Default)]
struct Flight {
    /// True while a fetch for this provider is outstanding.
    in_flight: bool,
    /// Bumped when a flight begins or is invalidated; a completion only
    /// applies while its generation is still current.
    generation: u64,
}

// ============================================================================
// Scheduler
// ============================================================================

struct Inner {
    providers: HashMap<ProviderId, Arc<dyn UsageProvider>>,
    order: Vec<ProviderId>,
    ctx: Arc<FetchContext>,
    cache: CacheStore,
    session: watch::Receiver<SessionState>,
    updates: mpsc::UnboundedSender<Update>,
    flights: Mutex<HashMap<ProviderId, Flight>>,
    interval: Duration,
}

/// The polling scheduler. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    /// Creates a scheduler over the given providers.
    pub fn new(
        providers: Vec<Arc<dyn UsageProvider>>,
        ctx: Arc<FetchContext>,
        cache: CacheStore,
        session: watch::Receiver<SessionState>,
        updates: mpsc::UnboundedSender<Update>,
        interval: Duration,
    ) -> Self {
        let order: Vec<ProviderId> = providers.iter().map(|p| p.id()).collect();
        let providers = providers.into_iter().map(|p| (p.id(), p)).collect();

        Self {
            inner: Arc::new(Inner {
                providers,
                order,
                ctx,
                cache,
                session,
                updates,
                flights: Mutex::new(HashMap::new()),
                interval,
            }),
        }
    }

    /// Returns the provider ids in refresh order.
    pub fn provider_ids(&self) -> &[ProviderId] {
        &self.inner.order
    }

    // ========================================================================
    // Flight Accounting
    // ========================================================================

    /// Claims the flight for a provider. Returns the generation token,
    /// or `None` if a fetch is already outstanding (single-flight).
    fn begin(&self, id: ProviderId) -> Option<u64> {
        let mut flights = self.inner.flights.lock().expect("flight lock");
        let flight = flights.entry(id).or_default();
        if flight.in_flight {
            return None;
        }
        flight.in_flight = true;
        flight.generation += 1;
        Some(flight.generation)
    }

    /// Returns true if the generation is still the current flight.
    fn is_current(&self, id: ProviderId, generation: u64) -> bool {
        let flights = self.inner.flights.lock().expect("flight lock");
        flights
            .get(&id)
            .is_some_and(|f| f.generation == generation)
    }

    /// Releases the flight, if the generation is still current.
    fn finish(&self, id: ProviderId, generation: u64) {
        let mut flights = self.inner.flights.lock().expect("flight lock");
        if let Some(flight) = flights.get_mut(&id) {
            if flight.generation == generation {
                flight.in_flight = false;
            }
        }
    }

    /// Supersedes any outstanding flight for a provider.
    ///
    /// The superseded completion will be discarded when it arrives, and
    /// a new flight may begin immediately. Called when the session
    /// expires under a browser-backed provider.
    pub fn invalidate(&self, id: ProviderId) {
        let mut flights = self.inner.flights.lock().expect("flight lock");
        let flight = flights.entry(id).or_default();
        flight.generation += 1;
        flight.in_flight = false;
        debug!(provider = %id, generation = flight.generation, "Flight invalidated");
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Sends one update to the display collaborator.
    fn emit(&self, id: ProviderId, payload: UpdatePayload) {
        let _ = self.inner.updates.send(Update::Provider {
            provider: id,
            payload,
        });
    }

    /// Runs one refresh round for a provider.
    ///
    /// Returns immediately when a fetch is already in flight; a trigger
    /// arriving mid-fetch is a no-op, not a queued retry.
    #[instrument(skip(self), fields(provider = %id))]
    pub async fn refresh(&self, id: ProviderId) {
        let Some(provider) = self.inner.providers.get(&id).cloned() else {
            warn!("Refresh requested for unknown provider");
            return;
        };

        let Some(generation) = self.begin(id) else {
            debug!("Fetch already in flight, dropping trigger");
            return;
        };
        self.emit(id, UpdatePayload::Refreshing);

        // Session gate: no network call while unauthenticated.
        if provider.requires_session()
            && *self.inner.session.borrow() != SessionState::Authenticated
        {
            debug!("Session not ready, degrading to cache");
            match self.inner.cache.load(id).await {
                Some(snapshot) => self.emit(
                    id,
                    UpdatePayload::Cached {
                        snapshot,
                        reason: StaleReason::Unauthenticated,
                    },
                ),
                None => self.emit(id, UpdatePayload::NotSignedIn),
            }
            self.finish(id, generation);
            return;
        }

        let result = provider.fetch(&self.inner.ctx).await;

        // A slow completion must not overwrite fresher state.
        if !self.is_current(id, generation) {
            debug!(generation, "Discarding superseded completion");
            return;
        }

        match result {
            Ok(result) => {
                if let Err(e) = self.inner.cache.save(id, &result).await {
                    warn!(error = %e, "Cache save failed");
                }
                info!("Fetch succeeded");
                self.emit(id, UpdatePayload::Fresh(result));
            }
            Err(error) => {
                if error.is_expected() {
                    debug!(error = %error, "Fetch degraded");
                } else {
                    warn!(error = %error, "Fetch failed");
                }

                let unauthenticated = matches!(error, FetchError::NotAuthenticated);
                match self.inner.cache.load(id).await {
                    Some(snapshot) => {
                        let reason = if unauthenticated {
                            StaleReason::Unauthenticated
                        } else {
                            StaleReason::FetchFailed
                        };
                        self.emit(id, UpdatePayload::Cached { snapshot, reason });
                    }
                    None if unauthenticated => self.emit(id, UpdatePayload::NotSignedIn),
                    None => self.emit(id, UpdatePayload::Failed(error.to_string())),
                }
            }
        }

        self.finish(id, generation);
    }

    /// Spawns a refresh task for one provider.
    pub fn spawn_refresh(&self, id: ProviderId) {
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.refresh(id).await });
    }

    /// Spawns refresh tasks for every provider.
    pub fn spawn_refresh_all(&self) {
        for id in &self.inner.order {
            self.spawn_refresh(*id);
        }
    }

    /// Spawns refresh tasks for the session-gated providers only.
    fn spawn_refresh_gated(&self) {
        for (id, provider) in &self.inner.providers {
            if provider.requires_session() {
                self.spawn_refresh(*id);
            }
        }
    }

    // ========================================================================
    // Event Loop
    // ========================================================================

    /// Runs the scheduler until the process shuts down.
    ///
    /// Three inputs feed the loop: the recurring timer, the trigger
    /// channel, and session state changes. A transition away from
    /// `Authenticated` supersedes outstanding browser-backed flights so
    /// their eventual completions are discarded.
    pub async fn run(self, mut triggers: mpsc::UnboundedReceiver<RefreshTrigger>) {
        let mut ticker = tokio::time::interval(self.inner.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut session = self.inner.session.clone();
        let mut session_open = true;

        info!(interval = ?self.inner.interval, "Scheduler running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("Timer tick");
                    self.spawn_refresh_all();
                }
                trigger = triggers.recv() => {
                    let Some(trigger) = trigger else {
                        debug!("Trigger channel closed, stopping");
                        return;
                    };
                    debug!(?trigger, "Trigger received");
                    match trigger {
                        RefreshTrigger::Timer | RefreshTrigger::Manual(None) => {
                            self.spawn_refresh_all();
                        }
                        RefreshTrigger::Manual(Some(id)) => self.spawn_refresh(id),
                        RefreshTrigger::SessionReady => self.spawn_refresh_gated(),
                    }
                }
                changed = session.changed(), if session_open => {
                    if changed.is_err() {
                        session_open = false;
                        continue;
                    }
                    let state = *session.borrow_and_update();
                    if state != SessionState::Authenticated {
                        for (id, provider) in &self.inner.providers {
                            if provider.requires_session() {
                                self.invalidate(*id);
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Quotabar Engine
//!
//! The polling scheduler and the session monitor.
//!
//! The scheduler owns every piece of mutable polling state — per-provider
//! single-flight flags, fetch generations — and is the only component
//! allowed to downgrade a fetch failure into a cached reading for
//! display. The session monitor consumes the document host's lifecycle
//! events and publishes the authenticated/unauthenticated state the
//! scheduler gates browser-backed providers on.
//!
//! ## Wiring
//!
//! ```ignore
//! let (updates_tx, updates_rx) = mpsc::unbounded_channel();
//! let (triggers_tx, triggers_rx) = mpsc::unbounded_channel();
//! let (monitor, session_rx) = SessionMonitor::new(updates_tx.clone(), triggers_tx.clone());
//!
//! let scheduler = Scheduler::new(providers, ctx, cache, session_rx, updates_tx, interval);
//! tokio::spawn(monitor.run(session_events_rx));
//! tokio::spawn(scheduler.run(triggers_rx));
//! // updates_rx now streams per-provider readings and session transitions.
//! ```

pub mod events;
pub mod scheduler;
pub mod session;

pub use events::{RefreshTrigger, StaleReason, Update, UpdatePayload};
pub use scheduler::Scheduler;
pub use session::SessionMonitor;

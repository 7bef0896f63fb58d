// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Quotabar Core
//!
//! Core types and models for the Quotabar application.
//!
//! This crate provides the foundational value types used across all other
//! Quotabar crates:
//!
//! - Provider identity ([`ProviderId`], [`ProviderType`])
//! - Normalized usage readings ([`UsageResult`], [`ProviderResult`])
//! - Optional detail breakdowns ([`DetailedUsage`], [`DailyUsageEntry`])
//! - Cached snapshots ([`CachedSnapshot`])
//! - The browser session state machine ([`SessionState`], [`SessionTracker`])
//!
//! Everything here is a plain value object: no I/O, no shared mutable
//! state, safe to pass across task boundaries.

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Provider identity
    ProviderId,
    ProviderType,
    // Usage readings
    ProviderResult,
    UsageResult,
    // Detail breakdowns
    DailyUsageEntry,
    DetailedUsage,
    // Cached snapshots
    CachedSnapshot,
    // Session state machine
    SessionEvent,
    SessionState,
    SessionTracker,
};

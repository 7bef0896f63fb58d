//! Cached snapshots of provider results.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::usage::ProviderResult;

// ============================================================================
// Cached Snapshot
// ============================================================================

/// The last successful reading for a provider, with its capture time.
///
/// Snapshots are the only durable state in the system. They are written
/// atomically by the cache store on each successful fetch and returned
/// unconditionally on load — staleness is the scheduler's and the display
/// layer's concern, never the store's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    /// The cached result.
    pub result: ProviderResult,
    /// When the result was captured.
    pub captured_at: DateTime<Utc>,
}

impl CachedSnapshot {
    /// Creates a snapshot captured now.
    pub fn new(result: ProviderResult) -> Self {
        Self {
            result,
            captured_at: Utc::now(),
        }
    }

    /// Returns the age of this snapshot.
    pub fn age(&self) -> Duration {
        Utc::now() - self.captured_at
    }

    /// Returns true if this snapshot is older than the threshold.
    pub fn is_older_than(&self, threshold: Duration) -> bool {
        self.age() > threshold
    }
}

// ============================================================================
// Tests
// ============================================================================

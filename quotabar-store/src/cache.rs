//! Snapshot cache.
//!
//! One record per provider, holding the last successful reading. The
//! store never judges staleness and never refuses to return old data —
//! that policy lives in the scheduler and the display layer.

use std::path::PathBuf;
use tracing::{debug, warn};

use quotabar_core::{CachedSnapshot, ProviderId, ProviderResult};

use crate::error::StoreError;
use crate::persistence::{default_cache_dir, load_json, save_json};

// ============================================================================
// Cache Store
// ============================================================================

/// Persistent cache of the last successful snapshot per provider.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Opens a cache rooted at the given directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Opens the cache at the platform default location.
    pub fn open_default() -> Self {
        Self::new(default_cache_dir())
    }

    /// Returns the record path for a provider.
    fn path_for(&self, id: ProviderId) -> PathBuf {
        self.dir.join(format!("{}.json", id.wire_name()))
    }

    /// Atomically replaces the snapshot for a provider, stamped now.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the record cannot be written.
    pub async fn save(&self, id: ProviderId, result: &ProviderResult) -> Result<(), StoreError> {
        let snapshot = CachedSnapshot::new(result.clone());
        save_json(&self.path_for(id), &snapshot).await?;
        debug!(provider = %id, "Snapshot cached");
        Ok(())
    }

    /// Loads the last snapshot for a provider, however old.
    ///
    /// A missing record is `None`; an unreadable or corrupt record is
    /// logged and also `None` — the cache never fails a fetch round.
    pub async fn load(&self, id: ProviderId) -> Option<CachedSnapshot> {
        let path = self.path_for(id);
        match load_json::<CachedSnapshot>(&path).await {
            Ok(snapshot) => Some(snapshot),
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(provider = %id, error = %e, "Cache record unreadable, ignoring");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quotabar_core::{DetailedUsage, UsageResult};

    fn sample_result() -> ProviderResult {
        let mut details = DetailedUsage::new();
        details.session_count = Some(12);
        details.model_costs.insert("claude-sonnet-4".to_string(), 3.5);
        ProviderResult::with_details(
            UsageResult::PayAsYouGo {
                utilization_percent: 42.0,
                cost_so_far: 84.0,
                resets_at: None,
            },
            details,
        )
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        let result = sample_result();
        cache.save(ProviderId::Claude, &result).await.unwrap();

        let snapshot = cache.load(ProviderId::Claude).await.unwrap();
        assert_eq!(snapshot.result, result);
    }

    #[tokio::test]
    async fn test_records_are_keyed_per_provider() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.save(ProviderId::Claude, &sample_result()).await.unwrap();

        assert!(cache.load(ProviderId::Claude).await.is_some());
        assert!(cache.load(ProviderId::OpenRouter).await.is_none());
        assert!(cache.load(ProviderId::Cursor).await.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        cache.save(ProviderId::Cursor, &sample_result()).await.unwrap();

        let newer = ProviderResult::new(UsageResult::Metered {
            used: 45,
            limit: 500,
            resets_at: None,
        });
        cache.save(ProviderId::Cursor, &newer).await.unwrap();

        let snapshot = cache.load(ProviderId::Cursor).await.unwrap();
        assert_eq!(snapshot.result, newer);
    }

    #[tokio::test]
    async fn test_corrupt_record_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());

        tokio::fs::create_dir_all(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join("claude.json"), "{broken")
            .await
            .unwrap();

        assert!(cache.load(ProviderId::Claude).await.is_none());
    }
}

//! User settings with tolerant JSON persistence.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json_or_default, save_json};

/// Default refresh interval between scheduled rounds, seconds.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 1800;

// ============================================================================
// Settings
// ============================================================================

/// Persistent user preferences.
///
/// Decoding is tolerant: missing fields take their defaults and unknown
/// fields are ignored, so settings written by other builds load cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds between scheduled refresh rounds.
    pub refresh_interval_secs: u64,
    /// Name of the external ledger statistics command.
    pub ledger_command: String,
    /// Monthly ledger budget used for utilization, USD.
    pub ledger_monthly_budget_usd: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            ledger_command: "ccusage".to_string(),
            ledger_monthly_budget_usd: 200.0,
        }
    }
}

impl Settings {
    /// Loads settings from the given path, defaulting on any problem.
    pub async fn load(path: &Path) -> Self {
        load_json_or_default(path).await
    }

    /// Loads settings from the default location.
    pub async fn load_default() -> Self {
        Self::load(&default_settings_path()).await
    }

    /// Saves settings to the given path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Returns the refresh interval as a `Duration`.
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_interval_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================

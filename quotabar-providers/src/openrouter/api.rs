//! OpenRouter API response types and client.

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use quotabar_fetch::{FetchError, HttpClient, HttpError};

// ============================================================================
// Constants
// ============================================================================

/// OpenRouter API base URL.
const API_BASE: &str = "https://openrouter.ai/api/v1";

/// Credits summary endpoint.
const CREDITS_ENDPOINT: &str = "/credits";

/// Key limits endpoint.
const KEY_ENDPOINT: &str = "/key";

/// Recent activity endpoint.
const ACTIVITY_ENDPOINT: &str = "/activity";

// ============================================================================
// API Response Types
// ============================================================================

/// Envelope all OpenRouter responses share.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Response from the credits summary endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsData {
    /// Credits purchased in total.
    #[serde(default)]
    pub total_credits: Option<f64>,
    /// Credits consumed in total.
    #[serde(default)]
    pub total_usage: Option<f64>,
}

/// Response from the key limits endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyData {
    /// Hard spend limit on this key, if one is configured.
    #[serde(default)]
    pub limit: Option<f64>,
    /// Spend recorded against this key.
    #[serde(default)]
    pub usage: Option<f64>,
    /// Remaining headroom under the limit.
    #[serde(default)]
    pub limit_remaining: Option<f64>,
    /// Whether the key belongs to the free tier.
    #[serde(default)]
    pub is_free_tier: Option<bool>,
}

/// One record from the activity listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRecord {
    /// Calendar date of the record, `YYYY-MM-DD`.
    #[serde(default, alias = "created_at")]
    pub date: Option<String>,
    /// Model the record belongs to.
    #[serde(default)]
    pub model: Option<String>,
}

// ============================================================================
// API Client
// ============================================================================

/// Thin client over the three OpenRouter endpoints.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    base: String,
}

impl OpenRouterClient {
    /// Creates a client against the production API.
    pub fn new() -> Self {
        Self {
            base: API_BASE.to_string(),
        }
    }

    /// Creates a client against a custom base URL.
    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Classifies a non-2xx status for a required endpoint.
    fn classify_status(err: HttpError) -> FetchError {
        match err {
            // A rejected key is a credential problem, not a session one.
            HttpError::Status(401 | 403) => {
                FetchError::Configuration("OpenRouter API key rejected".to_string())
            }
            other => other.into(),
        }
    }

    /// Fetches the credits summary.
    #[instrument(skip(self, http, token))]
    pub async fn fetch_credits(
        &self,
        http: &HttpClient,
        token: &str,
    ) -> Result<CreditsData, FetchError> {
        let url = format!("{}{}", self.base, CREDITS_ENDPOINT);
        let body = http
            .get_bearer_text(&url, token)
            .await
            .map_err(Self::classify_status)?;
        let envelope: Envelope<CreditsData> = serde_json::from_str(&body)?;
        debug!(
            total_credits = ?envelope.data.total_credits,
            total_usage = ?envelope.data.total_usage,
            "Credits summary fetched"
        );
        Ok(envelope.data)
    }

    /// Fetches the key limits.
    #[instrument(skip(self, http, token))]
    pub async fn fetch_key(&self, http: &HttpClient, token: &str) -> Result<KeyData, FetchError> {
        let url = format!("{}{}", self.base, KEY_ENDPOINT);
        let body = http
            .get_bearer_text(&url, token)
            .await
            .map_err(Self::classify_status)?;
        let envelope: Envelope<KeyData> = serde_json::from_str(&body)?;
        debug!(limit = ?envelope.data.limit, usage = ?envelope.data.usage, "Key limits fetched");
        Ok(envelope.data)
    }

    /// Fetches the recent activity listing, best-effort.
    ///
    /// Any failure here — transport, status, shape — degrades to an empty
    /// listing; activity only feeds the optional daily history.
    #[instrument(skip(self, http, token))]
    pub async fn fetch_activity(&self, http: &HttpClient, token: &str) -> Vec<ActivityRecord> {
        let url = format!("{}{}", self.base, ACTIVITY_ENDPOINT);

        let body = match http.get_bearer_text(&url, token).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Activity listing unavailable");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Envelope<Vec<ActivityRecord>>>(&body) {
            Ok(envelope) => envelope.data,
            Err(e) => {
                warn!(error = %e, "Activity listing unparseable");
                Vec::new()
            }
        }
    }
}

impl Default for OpenRouterClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

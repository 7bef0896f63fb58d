//! JSON output for scripting.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use quotabar_core::{CachedSnapshot, ProviderId, ProviderResult};
use quotabar_engine::UpdatePayload;

// ============================================================================
// Report Shape
// ============================================================================

/// One provider's entry in the JSON report.
#[derive(Debug, Serialize)]
struct ProviderReport {
    provider: &'static str,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<ProviderResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    captured_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stale: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ProviderReport {
    fn from_payload(id: ProviderId, payload: &UpdatePayload) -> Self {
        let provider = id.wire_name();
        match payload {
            UpdatePayload::Refreshing => Self {
                provider,
                state: "refreshing",
                result: None,
                captured_at: None,
                stale: None,
                error: None,
            },
            UpdatePayload::Fresh(result) => Self {
                provider,
                state: "fresh",
                result: Some(result.clone()),
                captured_at: None,
                stale: None,
                error: None,
            },
            UpdatePayload::Cached { snapshot, reason } => {
                let CachedSnapshot {
                    result,
                    captured_at,
                } = snapshot;
                Self {
                    provider,
                    state: "cached",
                    result: Some(result.clone()),
                    captured_at: Some(*captured_at),
                    stale: Some(reason.tag()),
                    error: None,
                }
            }
            UpdatePayload::NotSignedIn => Self {
                provider,
                state: "not_signed_in",
                result: None,
                captured_at: None,
                stale: None,
                error: None,
            },
            UpdatePayload::Failed(message) => Self {
                provider,
                state: "error",
                result: None,
                captured_at: None,
                stale: None,
                error: Some(message.clone()),
            },
        }
    }
}

// ============================================================================
// Json Formatter
// ============================================================================

/// JSON renderer for one refresh round.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Creates a formatter.
    pub fn new() -> Self {
        Self
    }

    /// Formats the terminal payloads of a round, in provider order.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format_round(
        &self,
        order: &[ProviderId],
        terminal: &HashMap<ProviderId, UpdatePayload>,
    ) -> Result<String> {
        let reports: Vec<ProviderReport> = order
            .iter()
            .filter_map(|id| {
                terminal
                    .get(id)
                    .map(|payload| ProviderReport::from_payload(*id, payload))
            })
            .collect();

        Ok(serde_json::to_string_pretty(&reports)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quotabar_core::UsageResult;
    use quotabar_engine::StaleReason;

    fn fresh_payload() -> UpdatePayload {
        UpdatePayload::Fresh(ProviderResult::new(UsageResult::Metered {
            used: 45,
            limit: 500,
            resets_at: None,
        }))
    }

    #[test]
    fn test_round_renders_in_provider_order() {
        let mut terminal = HashMap::new();
        terminal.insert(ProviderId::Cursor, fresh_payload());
        terminal.insert(ProviderId::OpenRouter, UpdatePayload::NotSignedIn);

        let out = JsonFormatter::new()
            .format_round(
                &[ProviderId::OpenRouter, ProviderId::Claude, ProviderId::Cursor],
                &terminal,
            )
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let array = parsed.as_array().unwrap();

        // Claude reported nothing and is absent; order follows the input.
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["provider"], "openrouter");
        assert_eq!(array[0]["state"], "not_signed_in");
        assert_eq!(array[1]["provider"], "cursor");
        assert_eq!(array[1]["result"]["usage"]["type"], "metered");
        assert_eq!(array[1]["result"]["usage"]["used"], 45);
    }

    #[test]
    fn test_cached_entry_carries_staleness() {
        let snapshot = CachedSnapshot::new(ProviderResult::new(UsageResult::PayAsYouGo {
            utilization_percent: 10.0,
            cost_so_far: 20.0,
            resets_at: None,
        }));
        let mut terminal = HashMap::new();
        terminal.insert(
            ProviderId::Claude,
            UpdatePayload::Cached {
                snapshot,
                reason: StaleReason::FetchFailed,
            },
        );

        let out = JsonFormatter::new()
            .format_round(&[ProviderId::Claude], &terminal)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed[0]["state"], "cached");
        assert_eq!(parsed[0]["stale"], "cached/old");
        assert!(parsed[0]["captured_at"].is_string());
    }

    #[test]
    fn test_error_entry() {
        let mut terminal = HashMap::new();
        terminal.insert(
            ProviderId::OpenRouter,
            UpdatePayload::Failed("boom".to_string()),
        );

        let out = JsonFormatter::new()
            .format_round(&[ProviderId::OpenRouter], &terminal)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed[0]["state"], "error");
        assert_eq!(parsed[0]["error"], "boom");
    }
}

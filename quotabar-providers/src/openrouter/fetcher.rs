//! OpenRouter usage fetcher.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use quotabar_core::{
    DailyUsageEntry, DetailedUsage, ProviderId, ProviderResult, ProviderType, UsageResult,
};
use quotabar_fetch::{FetchContext, FetchError, UsageProvider};

use super::api::{ActivityRecord, OpenRouterClient};

/// Credential location in the system store.
const CREDENTIAL_SERVICE: &str = "quotabar";
const CREDENTIAL_ACCOUNT: &str = "openrouter";

// ============================================================================
// Provider
// ============================================================================

/// Token-credit API provider for OpenRouter.
#[derive(Debug, Clone, Default)]
pub struct OpenRouterProvider {
    client: OpenRouterClient,
}

impl OpenRouterProvider {
    /// Creates a provider against the production API.
    pub fn new() -> Self {
        Self {
            client: OpenRouterClient::new(),
        }
    }

    /// Creates a provider against a custom base URL.
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            client: OpenRouterClient::with_base(base),
        }
    }
}

#[async_trait]
impl UsageProvider for OpenRouterProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenRouter
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::PayAsYouGo
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderResult, FetchError> {
        let token = ctx
            .credentials
            .get(CREDENTIAL_SERVICE, CREDENTIAL_ACCOUNT)
            .await?
            .ok_or_else(|| {
                FetchError::Configuration("No OpenRouter API key stored".to_string())
            })?;

        let (credits, key) = tokio::try_join!(
            self.client.fetch_credits(&ctx.http, &token),
            self.client.fetch_key(&ctx.http, &token),
        )?;

        let mut usage = match key.limit {
            // A configured hard limit makes this a metered reading.
            Some(limit) if limit > 0.0 => UsageResult::Metered {
                used: key.usage.unwrap_or(0.0).max(0.0).round() as u64,
                limit: limit.round() as u64,
                resets_at: None,
            },
            _ => {
                let total_usage = credits.total_usage.unwrap_or(0.0).max(0.0);
                let utilization = match credits.total_credits {
                    Some(total) if total > 0.0 => (total_usage / total) * 100.0,
                    _ => 0.0,
                };
                UsageResult::PayAsYouGo {
                    utilization_percent: utilization,
                    cost_so_far: total_usage,
                    resets_at: None,
                }
            }
        };
        usage.sanitize();

        let activity = self.client.fetch_activity(&ctx.http, &token).await;
        let details = bucket_activity(&activity);

        info!(
            has_details = details.is_some(),
            "OpenRouter usage fetched"
        );

        Ok(ProviderResult {
            usage,
            details,
        })
    }
}

// ============================================================================
// Activity Bucketing
// ============================================================================

/// Buckets activity records by calendar date.
///
/// Each bucket carries the number of records that day and the sorted set
/// of distinct model names seen. Records without a parseable date are
/// skipped; an empty listing yields no detail payload at all.
fn bucket_activity(records: &[ActivityRecord]) -> Option<DetailedUsage> {
    let mut buckets: BTreeMap<NaiveDate, (u64, Vec<String>)> = BTreeMap::new();

    for record in records {
        let Some(date) = record
            .date
            .as_deref()
            .and_then(|d| d.get(..10))
            .and_then(|d| d.parse::<NaiveDate>().ok())
        else {
            debug!(date = ?record.date, "Skipping activity record without date");
            continue;
        };

        let (count, models) = buckets.entry(date).or_default();
        *count += 1;
        if let Some(model) = &record.model {
            if !models.contains(model) {
                models.push(model.clone());
            }
        }
    }

    if buckets.is_empty() {
        return None;
    }

    let mut details = DetailedUsage::new();
    for (date, (count, mut models)) in buckets {
        models.sort();
        let mut entry = DailyUsageEntry::new(date);
        entry.request_count = Some(count);
        entry.models_used = Some(models);
        details.push_day(entry);
    }
    Some(details)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, model: &str) -> ActivityRecord {
        ActivityRecord {
            date: Some(date.to_string()),
            model: Some(model.to_string()),
        }
    }

    #[test]
    fn test_bucket_activity_by_date() {
        let records = vec![
            record("2025-03-01", "qwen/qwen3-coder"),
            record("2025-03-01", "deepseek/deepseek-v3"),
            record("2025-03-01", "qwen/qwen3-coder"),
            record("2025-03-02", "qwen/qwen3-coder"),
        ];

        let details = bucket_activity(&records).unwrap();
        assert_eq!(details.daily.len(), 2);

        let day1 = &details.daily[0];
        assert_eq!(day1.date, "2025-03-01".parse().unwrap());
        assert_eq!(day1.request_count, Some(3));
        assert_eq!(
            day1.models_used.as_deref().unwrap(),
            ["deepseek/deepseek-v3", "qwen/qwen3-coder"]
        );

        let day2 = &details.daily[1];
        assert_eq!(day2.request_count, Some(1));
    }

    #[test]
    fn test_bucket_activity_handles_datetime_strings() {
        let records = vec![record("2025-03-01T10:30:00Z", "some/model")];
        let details = bucket_activity(&records).unwrap();
        assert_eq!(details.daily[0].date, "2025-03-01".parse().unwrap());
    }

    #[test]
    fn test_empty_activity_is_no_details() {
        assert!(bucket_activity(&[]).is_none());

        // Records with no usable date bucket to nothing.
        let dateless = vec![ActivityRecord {
            date: None,
            model: Some("m".to_string()),
        }];
        assert!(bucket_activity(&dateless).is_none());
    }
}

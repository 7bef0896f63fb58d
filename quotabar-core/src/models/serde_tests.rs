//! Serde serialization/deserialization tests for core types.
//!
//! These tests verify the wire format of the cache records: round-trips
//! preserve all data, and decoding is tolerant of missing optional fields
//! and unknown fields (old or newer snapshots load with defaults rather
//! than failing).

use chrono::Utc;

use crate::{
    CachedSnapshot, DailyUsageEntry, DetailedUsage, ProviderId, ProviderResult, UsageResult,
};

// ============================================================================
// UsageResult Serde Tests
// ============================================================================

#[test]
fn test_usage_result_tagged_format() {
    let usage = UsageResult::Metered {
        used: 120,
        limit: 500,
        resets_at: None,
    };
    let json = serde_json::to_string(&usage).unwrap();
    assert!(json.contains(r#""type":"metered""#), "got {json}");

    let back: UsageResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, usage);
}

#[test]
fn test_usage_result_missing_resets_at_defaults() {
    let json = r#"{"type":"pay_as_you_go","utilization_percent":40.0,"cost_so_far":80.0}"#;
    let usage: UsageResult = serde_json::from_str(json).unwrap();

    match usage {
        UsageResult::PayAsYouGo { resets_at, .. } => assert!(resets_at.is_none()),
        UsageResult::Metered { .. } => panic!("wrong variant"),
    }
}

// ============================================================================
// ProviderResult / DetailedUsage Serde Tests
// ============================================================================

#[test]
fn test_provider_result_roundtrip_with_details() {
    let mut details = DetailedUsage::new();
    details.session_count = Some(30);
    details.message_count = Some(120);
    details.avg_daily_cost = Some(0.41);
    details.model_costs.insert("claude-sonnet-4".to_string(), 8.12);
    let mut day = DailyUsageEntry::new("2025-03-01".parse().unwrap());
    day.cost_usd = Some(1.5);
    day.models_used = Some(vec!["claude-sonnet-4".to_string()]);
    details.push_day(day);

    let result = ProviderResult::with_details(
        UsageResult::PayAsYouGo {
            utilization_percent: 6.17,
            cost_so_far: 12.34,
            resets_at: None,
        },
        details,
    );

    let json = serde_json::to_string(&result).unwrap();
    let back: ProviderResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn test_provider_result_missing_details_defaults() {
    let json = r#"{"usage":{"type":"metered","used":10,"limit":500}}"#;
    let result: ProviderResult = serde_json::from_str(json).unwrap();
    assert!(result.details.is_none());
}

#[test]
fn test_daily_entry_sparse_fields_default() {
    let json = r#"{"date":"2025-03-01","cost_usd":2.0}"#;
    let entry: DailyUsageEntry = serde_json::from_str(json).unwrap();

    assert_eq!(entry.cost_usd, Some(2.0));
    assert!(entry.included_requests.is_none());
    assert!(entry.billed_requests.is_none());
    assert!(entry.models_used.is_none());
}

// ============================================================================
// CachedSnapshot Serde Tests
// ============================================================================

#[test]
fn test_cached_snapshot_roundtrip() {
    let snapshot = CachedSnapshot {
        result: ProviderResult::new(UsageResult::Metered {
            used: 45,
            limit: 500,
            resets_at: Some(Utc::now()),
        }),
        captured_at: Utc::now(),
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: CachedSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_cached_snapshot_ignores_unknown_fields() {
    // A record written by a newer build must still load.
    let json = r#"{
        "result": {"usage": {"type": "metered", "used": 1, "limit": 2}},
        "captured_at": "2025-03-01T12:00:00Z",
        "schema_hint": "future"
    }"#;
    let snapshot: CachedSnapshot = serde_json::from_str(json).unwrap();
    assert_eq!(snapshot.result.usage.used_percent(), 50.0);
}

// ============================================================================
// ProviderId Serde Tests
// ============================================================================

#[test]
fn test_provider_id_roundtrip_all_variants() {
    for id in ProviderId::all() {
        let json = serde_json::to_string(id).unwrap();
        let back: ProviderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, *id, "Round-trip failed for {id:?}");
    }
}

#[test]
fn test_provider_id_invalid_deserialize() {
    let result: Result<ProviderId, _> = serde_json::from_str(r#""copilot""#);
    assert!(result.is_err());
}

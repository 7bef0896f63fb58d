//! Detail breakdowns attached to a usage reading.
//!
//! This module contains the optional richer payload a provider may emit
//! alongside its normalized reading:
//! - [`DetailedUsage`] - Per-model costs, counters, daily history
//! - [`DailyUsageEntry`] - One day of the trailing history

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Detailed Usage
// ============================================================================

/// Optional richer payload accompanying a usage reading.
///
/// All fields are best-effort: providers fill what they can observe and
/// leave the rest empty. The daily history is ordered ascending by date
/// with no duplicate dates; use [`DetailedUsage::push_day`] to keep that
/// invariant when building incrementally.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailedUsage {
    /// Cost per model name, in USD.
    #[serde(default)]
    pub model_costs: BTreeMap<String, f64>,
    /// Number of sessions in the observed window.
    #[serde(default)]
    pub session_count: Option<u64>,
    /// Number of messages in the observed window.
    #[serde(default)]
    pub message_count: Option<u64>,
    /// Average daily cost over the observed window, in USD.
    #[serde(default)]
    pub avg_daily_cost: Option<f64>,
    /// Trailing per-day history, ascending by date.
    #[serde(default)]
    pub daily: Vec<DailyUsageEntry>,
}

impl DetailedUsage {
    /// Creates an empty detail payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a daily entry, keeping the history sorted and deduplicated.
    ///
    /// An entry for an already-present date replaces the existing one.
    pub fn push_day(&mut self, entry: DailyUsageEntry) {
        match self.daily.binary_search_by(|e| e.date.cmp(&entry.date)) {
            Ok(idx) => self.daily[idx] = entry,
            Err(idx) => self.daily.insert(idx, entry),
        }
    }

    /// Returns the total cost across all daily entries.
    pub fn total_daily_cost(&self) -> f64 {
        self.daily.iter().filter_map(|d| d.cost_usd).sum()
    }

    /// Returns the number of days with history data.
    pub fn days_with_data(&self) -> usize {
        self.daily.len()
    }

    /// Returns true if the payload carries no information at all.
    pub fn is_empty(&self) -> bool {
        self.model_costs.is_empty()
            && self.session_count.is_none()
            && self.message_count.is_none()
            && self.avg_daily_cost.is_none()
            && self.daily.is_empty()
    }
}

// ============================================================================
// Daily Usage Entry
// ============================================================================

/// One day of the trailing usage history.
///
/// Which fields are populated depends on the provider: the billing
/// dashboard reports request quantities and amounts, the cost ledger
/// reports a daily cost, the credit API reports a request count and the
/// models seen that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsageEntry {
    /// Calendar date of this entry.
    pub date: NaiveDate,
    /// Requests covered by the plan allowance.
    #[serde(default)]
    pub included_requests: Option<u64>,
    /// Requests billed beyond the allowance.
    #[serde(default)]
    pub billed_requests: Option<u64>,
    /// Gross amount before plan discounts, in USD.
    #[serde(default)]
    pub gross_amount: Option<f64>,
    /// Amount actually billed, in USD.
    #[serde(default)]
    pub billed_amount: Option<f64>,
    /// Total cost attributed to this day, in USD.
    #[serde(default)]
    pub cost_usd: Option<f64>,
    /// Number of usage records observed this day.
    #[serde(default)]
    pub request_count: Option<u64>,
    /// Distinct model names used this day.
    #[serde(default)]
    pub models_used: Option<Vec<String>>,
}

impl DailyUsageEntry {
    /// Creates an empty entry for the given date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            included_requests: None,
            billed_requests: None,
            gross_amount: None,
            billed_amount: None,
            cost_usd: None,
            request_count: None,
            models_used: None,
        }
    }

    /// Returns the total request quantity (included + billed).
    pub fn total_requests(&self) -> u64 {
        self.included_requests.unwrap_or(0) + self.billed_requests.unwrap_or(0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_push_day_keeps_ascending_order() {
        let mut details = DetailedUsage::new();
        details.push_day(DailyUsageEntry::new(date("2025-03-03")));
        details.push_day(DailyUsageEntry::new(date("2025-03-01")));
        details.push_day(DailyUsageEntry::new(date("2025-03-02")));

        let dates: Vec<_> = details.daily.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date("2025-03-01"), date("2025-03-02"), date("2025-03-03")]
        );
    }

    #[test]
    fn test_push_day_replaces_duplicate_date() {
        let mut details = DetailedUsage::new();
        let mut first = DailyUsageEntry::new(date("2025-03-01"));
        first.cost_usd = Some(1.0);
        details.push_day(first);

        let mut second = DailyUsageEntry::new(date("2025-03-01"));
        second.cost_usd = Some(2.5);
        details.push_day(second);

        assert_eq!(details.daily.len(), 1);
        assert_eq!(details.daily[0].cost_usd, Some(2.5));
    }

    #[test]
    fn test_total_daily_cost() {
        let mut details = DetailedUsage::new();
        let mut a = DailyUsageEntry::new(date("2025-03-01"));
        a.cost_usd = Some(1.25);
        let mut b = DailyUsageEntry::new(date("2025-03-02"));
        b.cost_usd = Some(0.75);
        details.push_day(a);
        details.push_day(b);

        assert_eq!(details.total_daily_cost(), 2.0);
        assert_eq!(details.days_with_data(), 2);
    }

    #[test]
    fn test_total_requests() {
        let mut entry = DailyUsageEntry::new(date("2025-03-01"));
        entry.included_requests = Some(40);
        entry.billed_requests = Some(5);
        assert_eq!(entry.total_requests(), 45);
    }

    #[test]
    fn test_is_empty() {
        assert!(DetailedUsage::new().is_empty());

        let mut details = DetailedUsage::new();
        details.session_count = Some(3);
        assert!(!details.is_empty());
    }
}

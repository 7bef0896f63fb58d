//! Dashboard endpoint readers.
//!
//! Both endpoints are fetched through the document host so the page's
//! authenticated session carries the requests. Responses come back as raw
//! text: the usage table is parsed as JSON rows first and as markup rows
//! on fallback; the entitlement card tolerates both known field casings.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

use quotabar_core::{DailyUsageEntry, DetailedUsage};
use quotabar_fetch::{DocumentHost, FetchError, ParseError};

use crate::extract::rows;

// ============================================================================
// Endpoints
// ============================================================================

/// Usage-table endpoint (relative; the host resolves against the page).
const USAGE_TABLE_PATH: &str = "/api/dashboard/usage";

/// Premium-request entitlement endpoint.
const ENTITLEMENT_PATH: &str = "/api/dashboard/premium-requests";

/// Builds a fetch-as-text script for a dashboard path.
fn fetch_text_script(path_and_query: &str) -> String {
    format!("fetch('{path_and_query}', {{credentials: 'include'}}).then(r => r.text())")
}

/// Evaluates a fetch-as-text script and returns the body.
async fn fetch_text(host: &dyn DocumentHost, path_and_query: &str) -> Result<String, FetchError> {
    let value = host.eval(&fetch_text_script(path_and_query)).await?;
    match value {
        serde_json::Value::String(body) => Ok(body),
        other => Err(ParseError::InvalidJson(format!(
            "expected text body, got {other}"
        ))
        .into()),
    }
}

// ============================================================================
// Usage Table
// ============================================================================

/// One row of the usage table.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageRow {
    /// Calendar date of the row, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    /// Requests covered by the plan allowance.
    #[serde(default, alias = "includedRequests", alias = "included_requests")]
    pub included: u64,
    /// Requests billed beyond the allowance.
    #[serde(default, alias = "billedRequests", alias = "billed_requests")]
    pub billed: u64,
    /// Gross amount before discounts, USD.
    #[serde(default, alias = "grossAmount")]
    pub gross_amount: Option<f64>,
    /// Amount actually billed, USD.
    #[serde(default, alias = "billedAmount")]
    pub billed_amount: Option<f64>,
}

/// Summed table quantities plus the per-day breakdown.
#[derive(Debug, Clone, Default)]
pub struct TableTotals {
    /// Total requests used (included + billed across all rows).
    pub used_requests: u64,
    /// Dated rows, for the detail payload.
    pub details: Option<DetailedUsage>,
}

/// Markup fallback: `<td>date</td><td>included</td><td>billed</td>` rows.
static MARKUP_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<tr[^>]*>\s*<td[^>]*>(\d{4}-\d{2}-\d{2})</td>\s*<td[^>]*>([\d,]+)</td>\s*<td[^>]*>([\d,]+)</td>",
    )
    .expect("static table-row pattern")
});

/// Parses the usage-table body.
///
/// JSON rows are preferred; markup rows are the fallback when the body is
/// not a JSON array. Zero rows is a valid table (no usage yet).
fn parse_usage_table(body: &str) -> TableTotals {
    let parsed_rows: Vec<UsageRow> = match serde_json::from_str(body) {
        Ok(rows) => rows,
        Err(_) => rows(&MARKUP_ROW, body, |cap| {
            Some(UsageRow {
                date: Some(cap[1].to_string()),
                included: cap[2].replace(',', "").parse().ok()?,
                billed: cap[3].replace(',', "").parse().ok()?,
                gross_amount: None,
                billed_amount: None,
            })
        }),
    };

    let used_requests = parsed_rows.iter().map(|r| r.included + r.billed).sum();

    let mut details = DetailedUsage::new();
    for row in &parsed_rows {
        let Some(date) = row.date.as_deref().and_then(|d| d.parse().ok()) else {
            continue;
        };
        let mut entry = DailyUsageEntry::new(date);
        entry.included_requests = Some(row.included);
        entry.billed_requests = Some(row.billed);
        entry.gross_amount = row.gross_amount;
        entry.billed_amount = row.billed_amount;
        details.push_day(entry);
    }

    TableTotals {
        used_requests,
        details: (!details.is_empty()).then_some(details),
    }
}

/// Fetches and parses the usage table for an account. Required: any
/// failure here fails the whole fetch.
#[instrument(skip(host))]
pub async fn fetch_usage_table(
    host: &dyn DocumentHost,
    account_id: &str,
) -> Result<TableTotals, FetchError> {
    let path = format!("{USAGE_TABLE_PATH}?customerId={account_id}");
    let body = fetch_text(host, &path).await?;
    let totals = parse_usage_table(&body);
    debug!(
        used_requests = totals.used_requests,
        days = totals.details.as_ref().map_or(0, |d| d.daily.len()),
        "Usage table parsed"
    );
    Ok(totals)
}

// ============================================================================
// Entitlement Card
// ============================================================================

/// The premium-request entitlement card.
#[derive(Debug, Clone, Deserialize)]
struct EntitlementCard {
    /// Entitled premium requests; both casings appear in the wild.
    #[serde(default, alias = "premiumRequests")]
    premium_requests: Option<u64>,
}

/// Fetches the premium-request entitlement.
///
/// # Errors
///
/// Callers treat a failure here as non-fatal (the reading degrades to an
/// unknown limit); the error is still typed so it can be logged.
#[instrument(skip(host))]
pub async fn fetch_entitlement(host: &dyn DocumentHost) -> Result<u64, FetchError> {
    let body = fetch_text(host, ENTITLEMENT_PATH).await?;

    let card: EntitlementCard = serde_json::from_str(&body)?;
    match card.premium_requests {
        Some(limit) => Ok(limit),
        None => {
            warn!("Entitlement card carried no premium-request field");
            Err(ParseError::MissingField {
                field: "premiumRequests".to_string(),
            }
            .into())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_rows() {
        let body = r#"[
            {"date": "2025-03-01", "includedRequests": 40, "billedRequests": 5},
            {"date": "2025-03-02", "included_requests": 10, "billed_requests": 0, "grossAmount": 1.2}
        ]"#;

        let totals = parse_usage_table(body);
        assert_eq!(totals.used_requests, 55);

        let details = totals.details.unwrap();
        assert_eq!(details.daily.len(), 2);
        assert_eq!(details.daily[0].included_requests, Some(40));
        assert_eq!(details.daily[1].gross_amount, Some(1.2));
    }

    #[test]
    fn test_parse_markup_rows_fallback() {
        let body = "\
<table><tbody>
<tr><td>2025-03-01</td><td>1,200</td><td>34</td><td>$0.00</td></tr>
<tr><td>2025-03-02</td><td>90</td><td>0</td><td>$0.00</td></tr>
</tbody></table>";

        let totals = parse_usage_table(body);
        assert_eq!(totals.used_requests, 1324);
        assert_eq!(totals.details.unwrap().daily.len(), 2);
    }

    #[test]
    fn test_empty_table_is_zero_usage() {
        let totals = parse_usage_table("[]");
        assert_eq!(totals.used_requests, 0);
        assert!(totals.details.is_none());
    }

    #[test]
    fn test_entitlement_both_casings() {
        let camel: EntitlementCard =
            serde_json::from_str(r#"{"premiumRequests": 500}"#).unwrap();
        assert_eq!(camel.premium_requests, Some(500));

        let snake: EntitlementCard =
            serde_json::from_str(r#"{"premium_requests": 500}"#).unwrap();
        assert_eq!(snake.premium_requests, Some(500));
    }

    #[test]
    fn test_fetch_text_script_shape() {
        let script = fetch_text_script("/api/dashboard/usage?customerId=42");
        assert!(script.contains("customerId=42"));
        assert!(script.contains("credentials: 'include'"));
    }
}

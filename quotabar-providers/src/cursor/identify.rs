//! Account-identifier discovery.
//!
//! The dashboard's internal API and page structure are both liable to
//! change, so three stages are tried in order: the first-party user-info
//! endpoint, the embedded page-data JSON, and finally a regex scan over
//! the rendered markup. The patterns here are best-effort fixtures, kept
//! private to this module so they can change without touching anything
//! above the provider boundary.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

use quotabar_fetch::{DocumentHost, FetchError};

// ============================================================================
// Stage Scripts
// ============================================================================

/// Stage 1: the first-party user-info endpoint.
const USER_INFO_SCRIPT: &str =
    "fetch('/api/auth/me', {credentials: 'include'}).then(r => r.json())";

/// Stage 2: the embedded page-data payload.
const PAGE_DATA_SCRIPT: &str =
    "JSON.parse(document.getElementById('__NEXT_DATA__').textContent)";

/// Stage 3: the full rendered markup.
const MARKUP_SCRIPT: &str = "document.documentElement.outerHTML";

/// Stage 3 patterns, tried in order; the first match wins.
static MARKUP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#""customerId"\s*:\s*"(\d+)""#,
        r#""customerId"\s*:\s*(\d+)"#,
        r"customer_id=(\d+)",
        r#"data-customer-id="(\d+)""#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static identifier pattern"))
    .collect()
});

// ============================================================================
// Discovery
// ============================================================================

/// Reads an identifier out of a JSON value, accepting a number or a
/// string of digits.
fn numeric_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Some(s.clone())
        }
        _ => None,
    }
}

/// Runs the fallback chain against the document host.
///
/// # Errors
///
/// `FetchError::NoAccountIdentifier` when every stage fails — the caller
/// must not guess. Transport failures inside a stage are logged and
/// treated as that stage failing, not as a fatal error, because later
/// stages may still succeed.
#[instrument(skip(host))]
pub async fn discover_account_id(host: &dyn DocumentHost) -> Result<String, FetchError> {
    // Stage 1: user-info endpoint.
    match host.eval(USER_INFO_SCRIPT).await {
        Ok(value) => {
            if let Some(id) = numeric_id(&value["id"]) {
                debug!(stage = 1, "Account identifier from user-info endpoint");
                return Ok(id);
            }
            warn!(stage = 1, "User-info response carried no numeric id");
        }
        Err(e) => warn!(stage = 1, error = %e, "User-info endpoint failed"),
    }

    // Stage 2: embedded page data.
    match host.eval(PAGE_DATA_SCRIPT).await {
        Ok(value) => {
            let nested = &value["props"]["pageProps"]["customer"]["customerId"];
            if let Some(id) = numeric_id(nested) {
                debug!(stage = 2, "Account identifier from embedded page data");
                return Ok(id);
            }
            warn!(stage = 2, "Page data carried no customer id");
        }
        Err(e) => warn!(stage = 2, error = %e, "Page data extraction failed"),
    }

    // Stage 3: regex scan over the markup.
    match host.eval(MARKUP_SCRIPT).await {
        Ok(serde_json::Value::String(markup)) => {
            for pattern in MARKUP_PATTERNS.iter() {
                if let Some(cap) = pattern.captures(&markup) {
                    debug!(stage = 3, pattern = %pattern.as_str(), "Account identifier from markup");
                    return Ok(cap[1].to_string());
                }
            }
            warn!(stage = 3, len = markup.len(), "No identifier pattern matched markup");
        }
        Ok(_) => warn!(stage = 3, "Markup evaluation returned a non-string"),
        Err(e) => warn!(stage = 3, error = %e, "Markup evaluation failed"),
    }

    Err(FetchError::NoAccountIdentifier)
}

// ============================================================================
// Tests
// ============================================================================

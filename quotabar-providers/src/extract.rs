//! Tolerant extraction of typed values from semi-structured text.
//!
//! Upstream text formatting is not contractually stable, so the two
//! disciplines here are anchor-tolerant: labels match across any run of
//! whitespace and an optional colon, and row patterns are line-anchored
//! with flexible column widths.
//!
//! - **Labeled fields** are required: a missing label or a garbled value
//!   is a hard [`ParseError`] naming the field (and the raw text), so a
//!   shape change upstream is diagnosable from the error alone.
//! - **Repeated rows** are best-effort: zero matches is an empty
//!   collection, since row data only ever feeds optional breakdowns.

use regex::{Captures, Regex};
use std::collections::BTreeMap;

use quotabar_fetch::ParseError;

// ============================================================================
// Labeled Fields
// ============================================================================

/// Builds the whitespace-tolerant pattern for a label.
fn label_pattern(label: &str) -> Regex {
    let escaped = label
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    // The label text is a compile-time constant at every call site, so a
    // malformed pattern is a programming error, not a data error.
    Regex::new(&format!(r"(?i){escaped}\s*:?")).expect("static label pattern")
}

/// Extracts the raw token following a label.
fn labeled_raw<'t>(text: &'t str, label: &str) -> Result<&'t str, ParseError> {
    let found = label_pattern(label)
        .find(text)
        .ok_or_else(|| ParseError::MissingField {
            field: label.to_string(),
        })?;

    text[found.end()..]
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::InvalidNumber {
            field: label.to_string(),
            raw: String::new(),
        })
}

/// Strips thousands separators and currency symbols.
fn normalize_numeric(raw: &str) -> String {
    raw.trim_matches(|c: char| matches!(c, '$' | '€' | '£' | '(' | ')'))
        .replace(',', "")
}

/// Extracts the first numeric value following a label.
///
/// # Errors
///
/// `ParseError::MissingField` if the label is absent;
/// `ParseError::InvalidNumber` (naming the field and the raw token) if
/// the value after the label does not convert.
pub fn labeled_number(text: &str, label: &str) -> Result<f64, ParseError> {
    let raw = labeled_raw(text, label)?;
    normalize_numeric(raw)
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber {
            field: label.to_string(),
            raw: raw.to_string(),
        })
}

/// Extracts the first integer value following a label.
///
/// # Errors
///
/// Same contract as [`labeled_number`].
pub fn labeled_count(text: &str, label: &str) -> Result<u64, ParseError> {
    let raw = labeled_raw(text, label)?;
    normalize_numeric(raw)
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidNumber {
            field: label.to_string(),
            raw: raw.to_string(),
        })
}

// ============================================================================
// Repeated Rows
// ============================================================================

/// Extracts all matches of a row pattern in document order.
///
/// The closure maps each capture set to a value; returning `None` skips
/// the row. Zero matches yields an empty vector.
pub fn rows<T>(
    pattern: &Regex,
    text: &str,
    mut f: impl FnMut(&Captures<'_>) -> Option<T>,
) -> Vec<T> {
    pattern.captures_iter(text).filter_map(|c| f(&c)).collect()
}

/// Extracts `name  $cost` rows into a name→cost mapping.
///
/// A name must contain at least one `-` or `.` separator, so summary
/// labels (`Total`, `Sessions`) never alias as model names. Repeated
/// rows for the same name accumulate.
pub fn model_cost_rows(text: &str) -> BTreeMap<String, f64> {
    static ROW: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"(?m)^\s*([A-Za-z0-9]+(?:[-.][A-Za-z0-9]+)+)\s+\$?\s*([\d,]+(?:\.\d+)?)\s*$")
            .expect("static row pattern")
    });

    let mut costs = BTreeMap::new();
    for cap in ROW.captures_iter(text) {
        let name = cap[1].to_string();
        if let Ok(cost) = normalize_numeric(&cap[2]).parse::<f64>() {
            *costs.entry(name).or_insert(0.0) += cost;
        }
    }
    costs
}

// ============================================================================
// Tests
// ============================================================================

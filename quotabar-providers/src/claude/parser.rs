//! Ledger CLI output parser.
//!
//! The statistics command prints a human-oriented summary table whose
//! exact column layout is not stable; parsing goes through the tolerant
//! extraction utilities so only the labels themselves are load-bearing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use quotabar_fetch::ParseError;

use crate::extract::{labeled_count, labeled_number, model_cost_rows};

// ============================================================================
// Parsed Statistics
// ============================================================================

/// Typed statistics extracted from one summary invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliUsageStats {
    /// Total cost over the window, in USD.
    pub total_cost: f64,
    /// Average cost per day, in USD.
    pub avg_cost_per_day: f64,
    /// Session count over the window.
    pub sessions: u64,
    /// Message count over the window.
    pub messages: u64,
    /// Cost per model, best-effort.
    pub model_costs: BTreeMap<String, f64>,
}

// ============================================================================
// Parser
// ============================================================================

/// Required summary labels.
const LABEL_TOTAL_COST: &str = "Total Cost";
const LABEL_AVG_COST: &str = "Avg Cost/Day";
const LABEL_SESSIONS: &str = "Sessions";
const LABEL_MESSAGES: &str = "Messages";

/// Parses the summary table printed by the ledger CLI.
///
/// The four summary labels are required — a missing one fails with an
/// error naming the field. Model rows are best-effort and may be absent.
///
/// # Errors
///
/// `ParseError::MissingField` / `ParseError::InvalidNumber` naming the
/// offending label.
pub fn parse_usage_summary(text: &str) -> Result<CliUsageStats, ParseError> {
    let stats = CliUsageStats {
        total_cost: labeled_number(text, LABEL_TOTAL_COST)?,
        avg_cost_per_day: labeled_number(text, LABEL_AVG_COST)?,
        sessions: labeled_count(text, LABEL_SESSIONS)?,
        messages: labeled_count(text, LABEL_MESSAGES)?,
        model_costs: model_cost_rows(text),
    };

    debug!(
        total_cost = stats.total_cost,
        sessions = stats.sessions,
        models = stats.model_costs.len(),
        "Ledger summary parsed"
    );

    Ok(stats)
}

/// Parses only the cumulative total from a windowed summary.
///
/// The daily-history invocations need nothing else from the table.
///
/// # Errors
///
/// Same contract as [`parse_usage_summary`] for the `Total Cost` label.
pub fn parse_cumulative_total(text: &str) -> Result<f64, ParseError> {
    labeled_number(text, LABEL_TOTAL_COST)
}

// ============================================================================
// Tests
// ============================================================================

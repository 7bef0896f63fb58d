//! Normalized usage readings.
//!
//! This module contains the reading types providers emit:
//! - [`UsageResult`] - Tagged union of metered and pay-as-you-go readings
//! - [`ProviderResult`] - A reading paired with an optional detail payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::details::DetailedUsage;
use super::provider::ProviderType;
use crate::error::CoreError;

// ============================================================================
// Usage Result
// ============================================================================

/// One normalized usage reading.
///
/// Percentages derived from either variant are always within [0, 100];
/// use [`UsageResult::sanitize`] after parsing upstream responses to clamp
/// out-of-range values, or [`UsageResult::validate`] to reject them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UsageResult {
    /// Usage against a hard numeric limit.
    Metered {
        /// Units consumed so far.
        used: u64,
        /// Hard limit. Zero means "limit unknown", not "zero quota".
        limit: u64,
        /// When the window resets, if known.
        #[serde(default)]
        resets_at: Option<DateTime<Utc>>,
    },
    /// Usage billed by accrued cost.
    PayAsYouGo {
        /// Derived utilization percentage (0-100).
        utilization_percent: f64,
        /// Cost accrued so far, in USD.
        cost_so_far: f64,
        /// When the billing window resets, if known.
        #[serde(default)]
        resets_at: Option<DateTime<Utc>>,
    },
}

impl UsageResult {
    /// Returns the billing model this reading belongs to.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Metered { .. } => ProviderType::Metered,
            Self::PayAsYouGo { .. } => ProviderType::PayAsYouGo,
        }
    }

    /// Returns the usage percentage for this reading, clamped to [0, 100].
    ///
    /// For metered readings with an unknown limit (zero) this is 0.
    pub fn used_percent(&self) -> f64 {
        match self {
            Self::Metered { used, limit, .. } => {
                if *limit == 0 {
                    0.0
                } else {
                    ((*used as f64 / *limit as f64) * 100.0).clamp(0.0, 100.0)
                }
            }
            Self::PayAsYouGo {
                utilization_percent,
                ..
            } => utilization_percent.clamp(0.0, 100.0),
        }
    }

    /// Returns the reset time, if known.
    pub fn resets_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Metered { resets_at, .. } | Self::PayAsYouGo { resets_at, .. } => *resets_at,
        }
    }

    /// Returns true if usage is at or over the limit.
    pub fn is_over_limit(&self) -> bool {
        self.used_percent() >= 100.0
    }

    /// Validates the reading.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if a percentage is negative,
    /// greater than 100, or non-finite, or if a cost is negative or
    /// non-finite.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Metered { .. } => Ok(()),
            Self::PayAsYouGo {
                utilization_percent,
                cost_so_far,
                ..
            } => {
                if !utilization_percent.is_finite() {
                    return Err(CoreError::InvalidData(
                        "utilization_percent is not a finite number".to_string(),
                    ));
                }
                if *utilization_percent < 0.0 || *utilization_percent > 100.0 {
                    return Err(CoreError::InvalidData(format!(
                        "utilization_percent {utilization_percent} out of valid range [0, 100]"
                    )));
                }
                if !cost_so_far.is_finite() || *cost_so_far < 0.0 {
                    return Err(CoreError::InvalidData(format!(
                        "cost_so_far {cost_so_far} is negative or non-finite"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Clamps values to valid ranges instead of rejecting them.
    ///
    /// - `utilization_percent` is clamped to [0, 100]; NaN/Infinity become 0
    /// - `cost_so_far` is floored at 0; NaN/Infinity become 0
    pub fn sanitize(&mut self) {
        if let Self::PayAsYouGo {
            utilization_percent,
            cost_so_far,
            ..
        } = self
        {
            if !utilization_percent.is_finite() {
                *utilization_percent = 0.0;
            }
            *utilization_percent = utilization_percent.clamp(0.0, 100.0);

            if !cost_so_far.is_finite() {
                *cost_so_far = 0.0;
            }
            *cost_so_far = cost_so_far.max(0.0);
        }
    }
}

// ============================================================================
// Provider Result
// ============================================================================

/// The full outcome of one successful fetch: a reading plus an optional
/// richer breakdown. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    /// The normalized reading.
    pub usage: UsageResult,
    /// Optional detail breakdown.
    #[serde(default)]
    pub details: Option<DetailedUsage>,
}

impl ProviderResult {
    /// Creates a result with no detail payload.
    pub fn new(usage: UsageResult) -> Self {
        Self {
            usage,
            details: None,
        }
    }

    /// Creates a result with a detail payload.
    pub fn with_details(usage: UsageResult, details: DetailedUsage) -> Self {
        Self {
            usage,
            details: Some(details),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Structuring detector.
//!
//! Structuring: splitting purchases into amounts just under the $10k TTR
//! threshold to evade reporting. The detector looks at a customer's trailing
//! 7-day window and flags when either
//!   (a) three or more transactions fall in the $4,000–$4,999 band, or
//!   (b) the window total plus the current amount reaches $10,000 and two or
//!       more transactions fall in that band.
//!
//! The evaluation is pure: the engine fetches the window from the store and
//! hands the amounts in.

use crate::thresholds::TTR_THRESHOLD;
use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

pub const STRUCTURING_BAND_MIN: f64 = 4_000.0;
/// Exclusive upper bound: $4,999.99 is in the band, $5,000 is not.
pub const STRUCTURING_BAND_MAX: f64 = 5_000.0;
pub const STRUCTURING_LOOKBACK_DAYS: i64 = 7;
pub const BAND_COUNT_THRESHOLD: usize = 3;
pub const AGGREGATE_BAND_COUNT_THRESHOLD: usize = 2;

// ── Assessment ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuringAssessment {
    pub flagged: bool,
    /// Window transactions inside the sub-threshold band.
    pub band_count: usize,
    /// Sum of all window transactions, current amount excluded.
    pub window_total: f64,
    pub reason: Option<String>,
}

/// True iff `amount` falls in the sub-threshold band [4000, 5000).
pub fn in_band(amount: f64) -> bool {
    amount >= STRUCTURING_BAND_MIN && amount < STRUCTURING_BAND_MAX
}

/// Evaluate the current amount against the customer's trailing window.
///
/// `window_amounts` are the amounts of the customer's transactions from the
/// last 7 days, most recent window only, current transaction excluded.
pub fn evaluate(current_amount: f64, window_amounts: &[f64]) -> StructuringAssessment {
    let band_count = window_amounts.iter().filter(|a| in_band(**a)).count();
    let window_total: f64 = window_amounts.iter().sum();

    if band_count >= BAND_COUNT_THRESHOLD {
        return StructuringAssessment {
            flagged: true,
            band_count,
            window_total,
            reason: Some(format!(
                "{band_count} transactions in the ${STRUCTURING_BAND_MIN:.0}-${STRUCTURING_BAND_MAX:.0} band over {STRUCTURING_LOOKBACK_DAYS} days"
            )),
        };
    }

    if window_total + current_amount >= TTR_THRESHOLD
        && band_count >= AGGREGATE_BAND_COUNT_THRESHOLD
    {
        return StructuringAssessment {
            flagged: true,
            band_count,
            window_total,
            reason: Some(format!(
                "7-day total ${:.2} with current amount reaches the ${TTR_THRESHOLD:.0} reporting threshold, {band_count} band transactions",
                window_total
            )),
        };
    }

    StructuringAssessment {
        flagged: false,
        band_count,
        window_total,
        reason: None,
    }
}

//! Reporting-threshold lookup.
//!
//! Three fixed AUD thresholds drive the mandatory compliance actions on a
//! single transaction:
//!   > $5,000  — identity verification (KYC) before settlement
//!   > $10,000 — Threshold Transaction Report (TTR) to AUSTRAC
//!   > $50,000 — enhanced due diligence review
//!
//! Pure arithmetic, no state, no error cases.

use serde::{Deserialize, Serialize};

pub const KYC_THRESHOLD: f64 = 5_000.0;
pub const TTR_THRESHOLD: f64 = 10_000.0;
pub const EDD_THRESHOLD: f64 = 50_000.0;

/// Compliance actions required for a transaction amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdFlags {
    pub requires_kyc: bool,
    pub requires_ttr: bool,
    pub requires_enhanced_dd: bool,
}

/// Map an AUD amount to its required compliance actions.
/// Amounts at or below a threshold do not trip it.
pub fn check_thresholds(amount: f64) -> ThresholdFlags {
    ThresholdFlags {
        requires_kyc: amount > KYC_THRESHOLD,
        requires_ttr: amount > TTR_THRESHOLD,
        requires_enhanced_dd: amount > EDD_THRESHOLD,
    }
}

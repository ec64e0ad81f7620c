//! Transaction risk scorer.
//!
//! Additive point model over a fixed set of transaction and customer
//! attributes. Deterministic, no I/O: callers assemble the factors from
//! stored history and the scorer does arithmetic only. The score is an
//! integer in 0..=100; two cutoffs map it to a risk tier.

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

pub const MEDIUM_RISK_CUTOFF: u8 = 40;
pub const HIGH_RISK_CUTOFF: u8 = 70;

const POINTS_AMOUNT_OVER_50K: u8 = 40;
const POINTS_AMOUNT_OVER_10K: u8 = 25;
const POINTS_AMOUNT_OVER_5K: u8 = 15;
const POINTS_AMOUNT_BASE: u8 = 5;

const POINTS_ACCOUNT_UNDER_30D: u8 = 20;
const POINTS_ACCOUNT_UNDER_180D: u8 = 10;

const POINTS_INTERNATIONAL: u8 = 15;
const POINTS_REPEAT_TRANSACTION: u8 = 10;
const POINTS_UNUSUAL_PATTERN: u8 = 20;

// ── Inputs and outputs ───────────────────────────────────────────────────────

/// Attributes the scorer weighs. Plain data, assembled by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactors {
    /// Transaction amount in AUD.
    pub amount: f64,
    /// Days since the customer record was created.
    pub account_age_days: i64,
    /// Cross-border transaction, or customer domiciled overseas.
    pub is_international: bool,
    /// Customer transacted within the repeat lookback window.
    pub is_repeat_transaction: bool,
    /// Structuring or other anomaly flagged on this transaction.
    pub unusual_pattern: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// High iff score >= 70, medium iff 40 <= score < 70, else low.
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_RISK_CUTOFF {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_CUTOFF {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Sum the factor weights, clamped to 100.
///
/// Amount points are bracketed and monotonic non-decreasing in the amount.
pub fn score_transaction(factors: &RiskFactors) -> u8 {
    let mut score: u32 = amount_points(factors.amount) as u32;

    score += account_age_points(factors.account_age_days) as u32;

    if factors.is_international {
        score += POINTS_INTERNATIONAL as u32;
    }
    if factors.is_repeat_transaction {
        score += POINTS_REPEAT_TRANSACTION as u32;
    }
    if factors.unusual_pattern {
        score += POINTS_UNUSUAL_PATTERN as u32;
    }

    score.min(100) as u8
}

fn amount_points(amount: f64) -> u8 {
    if amount > 50_000.0 {
        POINTS_AMOUNT_OVER_50K
    } else if amount > 10_000.0 {
        POINTS_AMOUNT_OVER_10K
    } else if amount > 5_000.0 {
        POINTS_AMOUNT_OVER_5K
    } else {
        POINTS_AMOUNT_BASE
    }
}

fn account_age_points(age_days: i64) -> u8 {
    if age_days < 30 {
        POINTS_ACCOUNT_UNDER_30D
    } else if age_days < 180 {
        POINTS_ACCOUNT_UNDER_180D
    } else {
        0
    }
}

//! AUSTRAC report records: TTRs and SMRs.
//!
//! A TTR (Threshold Transaction Report) is raised automatically for every
//! transaction over the $10k threshold. An SMR (Suspicious Matter Report) is
//! raised when structuring is flagged or a screening hit lands. Reports are
//! rows in the store with a filing deadline; marking one filed is an explicit
//! operation by the compliance officer or an upstream batch job.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ComplianceResult,
    store::{ComplianceStore, SmrReportRow, TtrReportRow},
    types::{CustomerId, TransactionId},
};

// ── Constants ────────────────────────────────────────────────────────────────

/// AUSTRAC allows 10 business days to lodge a TTR. Calendar days here; the
/// deadline is advisory, not enforced.
pub const TTR_FILING_DEADLINE_DAYS: i64 = 10;
/// SMRs must be lodged within 3 business days of forming the suspicion.
pub const SMR_FILING_DEADLINE_DAYS: i64 = 3;

pub const REPORT_STATUS_PENDING: &str = "pending";
pub const REPORT_STATUS_FILED: &str = "filed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmrReason {
    Structuring,
    SanctionsMatch,
    HighRiskCustomer,
}

impl SmrReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmrReason::Structuring => "structuring",
            SmrReason::SanctionsMatch => "sanctions_match",
            SmrReason::HighRiskCustomer => "high_risk_customer",
        }
    }
}

// ── Operations ───────────────────────────────────────────────────────────────

/// Raise a TTR for a threshold transaction. Deadline is detection + 10 days.
pub fn raise_ttr(
    store: &ComplianceStore,
    transaction_id: &TransactionId,
    customer_id: &CustomerId,
    amount: f64,
    at: DateTime<Utc>,
) -> ComplianceResult<TtrReportRow> {
    let row = TtrReportRow {
        ttr_id: format!("ttr-{}", Uuid::new_v4()),
        transaction_id: transaction_id.clone(),
        customer_id: customer_id.clone(),
        amount,
        detected_at: at.timestamp(),
        deadline: (at + Duration::days(TTR_FILING_DEADLINE_DAYS)).timestamp(),
        status: REPORT_STATUS_PENDING.to_string(),
    };
    store.insert_ttr(&row)?;

    log::info!(
        "TTR {} raised for transaction {} (${:.2})",
        row.ttr_id,
        transaction_id,
        amount
    );

    Ok(row)
}

/// Raise an SMR. Deadline is detection + 3 days.
pub fn raise_smr(
    store: &ComplianceStore,
    customer_id: &CustomerId,
    transaction_id: Option<&TransactionId>,
    reason: SmrReason,
    detail: &str,
    at: DateTime<Utc>,
) -> ComplianceResult<SmrReportRow> {
    let row = SmrReportRow {
        smr_id: format!("smr-{}", Uuid::new_v4()),
        customer_id: customer_id.clone(),
        transaction_id: transaction_id.cloned(),
        reason: reason.as_str().to_string(),
        narrative: smr_narrative(customer_id, reason, detail),
        detected_at: at.timestamp(),
        deadline: (at + Duration::days(SMR_FILING_DEADLINE_DAYS)).timestamp(),
        status: REPORT_STATUS_PENDING.to_string(),
    };
    store.insert_smr(&row)?;

    log::warn!(
        "SMR {} raised for customer {} ({})",
        row.smr_id,
        customer_id,
        reason.as_str()
    );

    Ok(row)
}

/// Narrative text lodged with the report, keyed on the suspicion type.
fn smr_narrative(customer_id: &CustomerId, reason: SmrReason, detail: &str) -> String {
    match reason {
        SmrReason::Structuring => format!(
            "Customer {customer_id} engaged in a pattern of purchases consistent with structuring to avoid the threshold transaction reporting obligation. {detail}"
        ),
        SmrReason::SanctionsMatch => format!(
            "Customer {customer_id} matched an entry on the sanctions watchlist. {detail}"
        ),
        SmrReason::HighRiskCustomer => format!(
            "Customer {customer_id} assessed as high risk under the program's customer risk methodology. {detail}"
        ),
    }
}

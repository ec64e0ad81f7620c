//! Enhanced due diligence investigations.
//!
//! An investigation is a row with a status advanced by direct compliance
//! officer action; there is no enforced transition table. The one rule that
//! is checked: a customer can have at most one open (non-terminal)
//! investigation at a time. Opening a second returns an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ComplianceError, ComplianceResult},
    store::{ComplianceStore, EddInvestigationRow},
    types::CustomerId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationStatus {
    Open,
    AwaitingInformation,
    UnderReview,
    Cleared,
    Escalated,
}

impl InvestigationStatus {
    /// Cleared and Escalated end the investigation; everything else keeps it
    /// open and blocks a second one from being raised.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvestigationStatus::Cleared | InvestigationStatus::Escalated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestigationStatus::Open => "open",
            InvestigationStatus::AwaitingInformation => "awaiting_information",
            InvestigationStatus::UnderReview => "under_review",
            InvestigationStatus::Cleared => "cleared",
            InvestigationStatus::Escalated => "escalated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(InvestigationStatus::Open),
            "awaiting_information" => Some(InvestigationStatus::AwaitingInformation),
            "under_review" => Some(InvestigationStatus::UnderReview),
            "cleared" => Some(InvestigationStatus::Cleared),
            "escalated" => Some(InvestigationStatus::Escalated),
            _ => None,
        }
    }
}

/// Open a new investigation for a customer.
///
/// Checked, not schema-enforced: errors with `InvestigationAlreadyOpen` when
/// a non-terminal investigation already exists.
pub fn open_investigation(
    store: &ComplianceStore,
    customer_id: &CustomerId,
    reason: &str,
    at: DateTime<Utc>,
) -> ComplianceResult<EddInvestigationRow> {
    if store.get_open_investigation(customer_id)?.is_some() {
        return Err(ComplianceError::InvestigationAlreadyOpen {
            customer_id: customer_id.clone(),
        });
    }

    let row = EddInvestigationRow {
        investigation_id: format!("edd-{}", Uuid::new_v4()),
        customer_id: customer_id.clone(),
        reason: reason.to_string(),
        status: InvestigationStatus::Open.as_str().to_string(),
        opened_at: at.timestamp(),
        closed_at: None,
        notes: None,
    };
    store.insert_investigation(&row)?;

    log::info!(
        "EDD investigation {} opened for customer {}: {}",
        row.investigation_id,
        customer_id,
        reason
    );

    Ok(row)
}

/// Advance an investigation to a new status. Direct admin action; any target
/// status is accepted. Terminal statuses record the closing time.
pub fn advance_investigation(
    store: &ComplianceStore,
    investigation_id: &str,
    status: InvestigationStatus,
    notes: Option<&str>,
    at: DateTime<Utc>,
) -> ComplianceResult<()> {
    let closed_at = status.is_terminal().then(|| at.timestamp());
    let updated = store.set_investigation_status(investigation_id, status.as_str(), closed_at, notes)?;
    if !updated {
        return Err(ComplianceError::InvestigationNotFound {
            investigation_id: investigation_id.to_string(),
        });
    }

    log::info!("EDD investigation {investigation_id} moved to {}", status.as_str());
    Ok(())
}

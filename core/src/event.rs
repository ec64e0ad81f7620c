//! Audit events.
//!
//! Every decision the engine takes is recorded as an event in the audit log.
//! Rows are append-only; nothing in the crate deletes them. Variants are
//! added over time, never removed or reordered.

use crate::types::{CustomerId, TransactionId, UnixSeconds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComplianceEvent {
    TransactionAssessed {
        transaction_id: TransactionId,
        customer_id: CustomerId,
        amount: f64,
        outcome: String,
        risk_score: u8,
        risk_level: String,
    },
    TransactionBlocked {
        transaction_id: TransactionId,
        customer_id: CustomerId,
        reason: String,
    },
    KycRequired {
        transaction_id: TransactionId,
        customer_id: CustomerId,
        amount: f64,
    },
    KycCompleted {
        customer_id: CustomerId,
        approved: bool,
    },
    StructuringDetected {
        transaction_id: TransactionId,
        customer_id: CustomerId,
        band_count: usize,
        window_total: f64,
    },
    ScreeningHit {
        customer_id: CustomerId,
        list: String,
        list_ref: String,
        matched_name: String,
        match_score: f64,
    },
    TtrRaised {
        ttr_id: String,
        transaction_id: TransactionId,
        customer_id: CustomerId,
        amount: f64,
        deadline: UnixSeconds,
    },
    SmrRaised {
        smr_id: String,
        customer_id: CustomerId,
        reason: String,
    },
    EddOpened {
        investigation_id: String,
        customer_id: CustomerId,
        reason: String,
    },
    TransactionReviewed {
        transaction_id: TransactionId,
        approved: bool,
    },
}

impl ComplianceEvent {
    /// Stable string name for the event_type column in audit_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            ComplianceEvent::TransactionAssessed { .. } => "transaction_assessed",
            ComplianceEvent::TransactionBlocked { .. } => "transaction_blocked",
            ComplianceEvent::KycRequired { .. } => "kyc_required",
            ComplianceEvent::KycCompleted { .. } => "kyc_completed",
            ComplianceEvent::StructuringDetected { .. } => "structuring_detected",
            ComplianceEvent::ScreeningHit { .. } => "screening_hit",
            ComplianceEvent::TtrRaised { .. } => "ttr_raised",
            ComplianceEvent::SmrRaised { .. } => "smr_raised",
            ComplianceEvent::EddOpened { .. } => "edd_opened",
            ComplianceEvent::TransactionReviewed { .. } => "transaction_reviewed",
        }
    }
}

/// The audit log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Option<i64>,
    pub event_type: String,
    /// JSON-serialized ComplianceEvent.
    pub payload: String,
    pub created_at: UnixSeconds,
}

//! TTR and SMR record tests: deadlines, filing, narratives.

use aml_core::engine::ComplianceEngine;
use aml_core::reporting::{
    raise_smr, raise_ttr, SmrReason, SMR_FILING_DEADLINE_DAYS, TTR_FILING_DEADLINE_DAYS,
};
use aml_core::store::{CustomerRow, TransactionRow};
use chrono::{Duration, TimeZone, Utc};

fn engine_with_transaction() -> ComplianceEngine {
    let engine = ComplianceEngine::build_test().unwrap();
    engine
        .store
        .insert_customer(&CustomerRow {
            customer_id: "c-1".to_string(),
            full_name: "Test Customer".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().timestamp(),
            verification_status: "verified".to_string(),
            risk_level: "low".to_string(),
            risk_score: 0,
            is_pep: false,
            is_international: false,
            country_code: "AU".to_string(),
            source_of_funds: None,
        })
        .unwrap();
    engine
        .store
        .insert_transaction(&TransactionRow {
            transaction_id: "t-1".to_string(),
            customer_id: "c-1".to_string(),
            amount: 12_000.0,
            currency: "AUD".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap().timestamp(),
            requires_kyc: true,
            requires_ttr: true,
            requires_enhanced_dd: false,
            flagged_for_review: false,
            outcome: "approved".to_string(),
            risk_score: 25,
        })
        .unwrap();
    engine
}

/// TTR deadline is detection plus 10 days, status starts pending.
#[test]
fn ttr_deadline_and_status() {
    let engine = engine_with_transaction();
    let at = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();

    let ttr = raise_ttr(&engine.store, &"t-1".to_string(), &"c-1".to_string(), 12_000.0, at).unwrap();
    assert_eq!(ttr.status, "pending");
    assert_eq!(
        ttr.deadline,
        (at + Duration::days(TTR_FILING_DEADLINE_DAYS)).timestamp()
    );

    let stored = engine.store.get_ttr_for_transaction("t-1").unwrap().unwrap();
    assert_eq!(stored.ttr_id, ttr.ttr_id);
    assert_eq!(stored.amount, 12_000.0);
}

/// Marking a TTR filed removes it from the pending queue.
#[test]
fn filed_ttr_leaves_pending_queue() {
    let engine = engine_with_transaction();
    let at = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();

    let ttr = raise_ttr(&engine.store, &"t-1".to_string(), &"c-1".to_string(), 12_000.0, at).unwrap();
    assert_eq!(engine.store.pending_ttrs().unwrap().len(), 1);

    assert!(engine.store.mark_ttr_filed(&ttr.ttr_id).unwrap());
    assert!(engine.store.pending_ttrs().unwrap().is_empty());
    assert_eq!(engine.store.ttr_count().unwrap(), 1);
}

/// SMR deadline is detection plus 3 days and the narrative names the
/// suspicion type.
#[test]
fn smr_deadline_and_narrative() {
    let engine = engine_with_transaction();
    let at = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();

    let smr = raise_smr(
        &engine.store,
        &"c-1".to_string(),
        Some(&"t-1".to_string()),
        SmrReason::Structuring,
        "3 band transactions over 7 days",
        at,
    )
    .unwrap();
    assert_eq!(
        smr.deadline,
        (at + Duration::days(SMR_FILING_DEADLINE_DAYS)).timestamp()
    );
    assert!(smr.narrative.contains("structuring"));
    assert!(smr.narrative.contains("c-1"));

    let stored = engine.store.smrs_for_customer("c-1").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].reason, "structuring");
}

/// SMRs can be raised without a transaction reference.
#[test]
fn smr_without_transaction() {
    let engine = engine_with_transaction();
    let at = Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap();

    let smr = raise_smr(
        &engine.store,
        &"c-1".to_string(),
        None,
        SmrReason::HighRiskCustomer,
        "periodic review",
        at,
    )
    .unwrap();
    assert!(smr.transaction_id.is_none());
    assert!(engine.store.mark_smr_filed(&smr.smr_id).unwrap());
}

//! End-to-end decision tests: the engine against an in-memory store.

use aml_core::engine::{ComplianceEngine, DecisionOutcome, TransactionInput};
use aml_core::error::ComplianceError;
use aml_core::store::{BusinessProfileRow, CustomerRow, WatchlistEntryRow};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
}

fn seed_customer(
    engine: &ComplianceEngine,
    id: &str,
    name: &str,
    status: &str,
    created_at: DateTime<Utc>,
) {
    engine
        .store
        .insert_customer(&CustomerRow {
            customer_id: id.to_string(),
            full_name: name.to_string(),
            created_at: created_at.timestamp(),
            verification_status: status.to_string(),
            risk_level: "low".to_string(),
            risk_score: 0,
            is_pep: false,
            is_international: false,
            country_code: "AU".to_string(),
            source_of_funds: None,
        })
        .unwrap();
}

fn txn(id: &str, customer: &str, amount: f64, at: DateTime<Utc>) -> TransactionInput {
    TransactionInput {
        transaction_id: id.to_string(),
        customer_id: customer.to_string(),
        amount,
        currency: "AUD".to_string(),
        occurred_at: at,
        is_international: false,
    }
}

/// Assessing a transaction for an unknown customer is an error, not a
/// decision.
#[test]
fn unknown_customer_errors() {
    let engine = ComplianceEngine::build_test().unwrap();
    let err = engine.assess(&txn("t-1", "c-missing", 100.0, base_time())).unwrap_err();
    assert!(matches!(err, ComplianceError::CustomerNotFound { .. }));
}

/// A small purchase by a long-standing customer sails through.
#[test]
fn small_purchase_approved() {
    let engine = ComplianceEngine::build_test().unwrap();
    let created = base_time() - Duration::days(500);
    seed_customer(&engine, "c-1", "Alice Nguyen", "unverified", created);

    let decision = engine.assess(&txn("t-1", "c-1", 900.0, base_time())).unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::Approved);
    assert!(decision.ttr_id.is_none());
    assert!(decision.smr_id.is_none());

    let row = engine.store.get_transaction("t-1").unwrap().unwrap();
    assert_eq!(row.outcome, "approved");
    assert!(!row.flagged_for_review);
}

/// Over $5k from an unverified customer requires KYC before settlement.
#[test]
fn unverified_above_kyc_threshold_requires_kyc() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(&engine, "c-1", "Ben Carter", "unverified", base_time() - Duration::days(400));

    let decision = engine.assess(&txn("t-1", "c-1", 6_000.0, base_time())).unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::RequiresKyc);
    assert!(decision.thresholds.requires_kyc);

    let row = engine.store.get_transaction("t-1").unwrap().unwrap();
    assert!(row.requires_kyc);
    assert!(row.flagged_for_review);
    assert_eq!(row.outcome, "requires_kyc");
}

/// A verified customer over the $10k threshold gets a TTR automatically.
#[test]
fn verified_above_ttr_threshold_gets_ttr() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(&engine, "c-1", "Alice Nguyen", "verified", base_time() - Duration::days(500));

    let decision = engine.assess(&txn("t-1", "c-1", 12_000.0, base_time())).unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::Approved);
    assert!(decision.thresholds.requires_ttr);
    assert!(decision.ttr_id.is_some());

    let ttr = engine.store.get_ttr_for_transaction("t-1").unwrap().unwrap();
    assert_eq!(ttr.status, "pending");
    assert_eq!(engine.store.ttr_count().unwrap(), 1);
}

/// Completing KYC unblocks the customer's next threshold purchase.
#[test]
fn kyc_completion_unlocks_approval() {
    let engine = ComplianceEngine::build_test().unwrap();
    let t0 = base_time();
    seed_customer(&engine, "c-1", "Ben Carter", "unverified", t0 - Duration::days(10));

    let first = engine.assess(&txn("t-1", "c-1", 6_000.0, t0)).unwrap();
    assert_eq!(first.outcome, DecisionOutcome::RequiresKyc);

    engine.complete_kyc(&"c-1".to_string(), true, t0).unwrap();

    let second = engine
        .assess(&txn("t-2", "c-1", 6_000.0, t0 + Duration::days(1)))
        .unwrap();
    assert_eq!(second.outcome, DecisionOutcome::Approved);
}

/// A run of sub-threshold purchases escalates, raises an SMR, and opens an
/// EDD investigation; further flagged purchases reuse the open case.
#[test]
fn structuring_series_escalates_and_reuses_investigation() {
    let engine = ComplianceEngine::build_test().unwrap();
    let t0 = base_time();
    seed_customer(&engine, "c-1", "Alice Nguyen", "verified", t0 - Duration::days(500));

    let d1 = engine.assess(&txn("t-1", "c-1", 4_500.0, t0)).unwrap();
    assert_eq!(d1.outcome, DecisionOutcome::Approved);

    let d2 = engine
        .assess(&txn("t-2", "c-1", 4_600.0, t0 + Duration::days(1)))
        .unwrap();
    assert_eq!(d2.outcome, DecisionOutcome::Approved);
    assert!(!d2.structuring.flagged);

    // Third purchase: two band transactions in the window and the running
    // total crosses $10k.
    let d3 = engine
        .assess(&txn("t-3", "c-1", 4_400.0, t0 + Duration::days(2)))
        .unwrap();
    assert_eq!(d3.outcome, DecisionOutcome::Escalated);
    assert!(d3.structuring.flagged);
    assert!(d3.smr_id.is_some());
    let investigation = d3.investigation_id.clone().unwrap();

    // Fourth purchase: three band transactions, flagged on count alone.
    let d4 = engine
        .assess(&txn("t-4", "c-1", 4_700.0, t0 + Duration::days(3)))
        .unwrap();
    assert_eq!(d4.outcome, DecisionOutcome::Escalated);
    assert_eq!(d4.structuring.band_count, 3);
    assert_eq!(d4.investigation_id.as_deref(), Some(investigation.as_str()));

    assert_eq!(engine.store.open_investigation_count().unwrap(), 1);
    assert_eq!(engine.store.smr_count().unwrap(), 2);
}

/// Transactions outside the trailing 7 days drop out of the window.
#[test]
fn stale_history_does_not_flag() {
    let engine = ComplianceEngine::build_test().unwrap();
    let t0 = base_time();
    seed_customer(&engine, "c-1", "Alice Nguyen", "verified", t0 - Duration::days(500));

    engine.assess(&txn("t-1", "c-1", 4_500.0, t0)).unwrap();
    engine
        .assess(&txn("t-2", "c-1", 4_600.0, t0 + Duration::days(1)))
        .unwrap();

    // Ten days later both priors are stale.
    let decision = engine
        .assess(&txn("t-3", "c-1", 4_400.0, t0 + Duration::days(11)))
        .unwrap();
    assert!(!decision.structuring.flagged);
    assert_eq!(decision.structuring.band_count, 0);
}

/// Over the $50k threshold the matter escalates even for a verified,
/// otherwise unremarkable customer.
#[test]
fn amount_above_edd_threshold_escalates() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(&engine, "c-1", "Alice Nguyen", "verified", base_time() - Duration::days(500));

    let decision = engine.assess(&txn("t-1", "c-1", 60_000.0, base_time())).unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::Escalated);
    assert!(decision.thresholds.requires_enhanced_dd);
    assert!(decision.investigation_id.is_some());
    // Escalated is not blocked: the TTR is still raised.
    assert!(decision.ttr_id.is_some());
}

/// A sanctioned UBO hard-blocks the business regardless of score, and no
/// TTR is raised for a transaction that never settles.
#[test]
fn sanctioned_business_blocked_without_ttr() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(&engine, "c-1", "Goldline Trading Pty Ltd", "verified", base_time() - Duration::days(500));
    engine
        .store
        .insert_business_profile(&BusinessProfileRow {
            customer_id: "c-1".to_string(),
            legal_name: "Goldline Trading Pty Ltd".to_string(),
            entity_type: "private_company".to_string(),
            abn: "51824753556".to_string(),
            abn_status: "active".to_string(),
            industry_code: "6910".to_string(),
            ubo_count: 2,
            any_ubo_pep: false,
            any_ubo_sanctioned: true,
        })
        .unwrap();

    let decision = engine.assess(&txn("t-1", "c-1", 20_000.0, base_time())).unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::Blocked);
    assert!(decision.business.as_ref().unwrap().block.blocked);
    assert!(decision.ttr_id.is_none());
    assert_eq!(engine.store.ttr_count().unwrap(), 0);

    // The transaction row is still written: audit rows are never dropped.
    let row = engine.store.get_transaction("t-1").unwrap().unwrap();
    assert_eq!(row.outcome, "blocked");
}

/// An exact watchlist match blocks the transaction and raises an SMR.
#[test]
fn watchlist_exact_match_blocks_and_raises_smr() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(&engine, "c-1", "Dmitri Volkov", "verified", base_time() - Duration::days(500));
    engine
        .store
        .upsert_watchlist_entry(&WatchlistEntryRow {
            entry_id: "wl-1".to_string(),
            full_name: "Dmitri Volkov".to_string(),
            program: "UNSC".to_string(),
        })
        .unwrap();

    let decision = engine.assess(&txn("t-1", "c-1", 3_000.0, base_time())).unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::Blocked);
    assert_eq!(decision.screening_hits.len(), 1);
    assert!(decision.screening_hits[0].exact);
    assert!(decision.smr_id.is_some());

    let smrs = engine.store.smrs_for_customer("c-1").unwrap();
    assert_eq!(smrs.len(), 1);
    assert_eq!(smrs[0].reason, "sanctions_match");
    assert_eq!(engine.store.screening_result_count().unwrap(), 1);
}

/// An exact watchlist match blocks even when a fuzzy variant of the same
/// name sits earlier in the list.
#[test]
fn exact_match_behind_fuzzy_variant_still_blocks() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(
        &engine,
        "c-1",
        "Jean Claude Marie Dubois Sr",
        "verified",
        base_time() - Duration::days(500),
    );
    engine
        .store
        .upsert_watchlist_entry(&WatchlistEntryRow {
            entry_id: "wl-1".to_string(),
            full_name: "Jean Claude Marie Dubois Jr".to_string(),
            program: "UNSC".to_string(),
        })
        .unwrap();
    engine
        .store
        .upsert_watchlist_entry(&WatchlistEntryRow {
            entry_id: "wl-2".to_string(),
            full_name: "Jean Claude Marie Dubois Sr".to_string(),
            program: "UNSC".to_string(),
        })
        .unwrap();

    let decision = engine.assess(&txn("t-1", "c-1", 3_000.0, base_time())).unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::Blocked);
    assert_eq!(decision.screening_hits.len(), 1);
    assert_eq!(decision.screening_hits[0].list_ref, "wl-2");
    assert!(decision.screening_hits[0].exact);
}

/// A PEP match marks the customer but does not block a small purchase.
#[test]
fn pep_hit_sets_flag_without_blocking() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(&engine, "c-1", "Maria Santos", "verified", base_time() - Duration::days(500));
    engine
        .store
        .upsert_pep_entry(&aml_core::store::PepEntryRow {
            pep_id: "pep-1".to_string(),
            full_name: "Maria Santos".to_string(),
            position: "Deputy Finance Minister".to_string(),
            country_code: "PH".to_string(),
        })
        .unwrap();

    let decision = engine.assess(&txn("t-1", "c-1", 1_000.0, base_time())).unwrap();
    assert_eq!(decision.outcome, DecisionOutcome::Approved);
    assert_eq!(decision.screening_hits.len(), 1);

    let customer = engine.store.get_customer("c-1").unwrap().unwrap();
    assert!(customer.is_pep);

    let results = engine.store.screening_results_for_customer("c-1").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].list, "pep");
}

/// Manual review clears the flag and records the final outcome.
#[test]
fn review_clears_flag() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(&engine, "c-1", "Ben Carter", "unverified", base_time() - Duration::days(400));

    engine.assess(&txn("t-1", "c-1", 6_000.0, base_time())).unwrap();
    engine
        .review_transaction(&"t-1".to_string(), true, base_time() + Duration::days(1))
        .unwrap();

    let row = engine.store.get_transaction("t-1").unwrap().unwrap();
    assert!(!row.flagged_for_review);
    assert_eq!(row.outcome, "approved");
}

/// Every assessment leaves a transaction_assessed audit event; the
/// customer's stored risk score tracks the latest assessment.
#[test]
fn audit_trail_and_risk_refresh() {
    let engine = ComplianceEngine::build_test().unwrap();
    seed_customer(&engine, "c-1", "Alice Nguyen", "verified", base_time() - Duration::days(500));

    engine.assess(&txn("t-1", "c-1", 900.0, base_time())).unwrap();
    engine
        .assess(&txn("t-2", "c-1", 12_000.0, base_time() + Duration::days(1)))
        .unwrap();

    let assessed = engine.store.events_by_type("transaction_assessed").unwrap();
    assert_eq!(assessed.len() as i64, engine.store.transaction_count().unwrap());

    let customer = engine.store.get_customer("c-1").unwrap().unwrap();
    let latest = engine.store.get_transaction("t-2").unwrap().unwrap();
    assert_eq!(customer.risk_score, latest.risk_score);
}

//! Business risk scorer tests: hard block predicate and point model.

use aml_core::business_risk::{
    score_business, should_block_business, AbnStatus, BusinessRiskFactors, EntityType,
};
use aml_core::risk_scoring::RiskLevel;

fn clean_company() -> BusinessRiskFactors {
    BusinessRiskFactors {
        entity_type: EntityType::PrivateCompany,
        industry_code: "6910".to_string(),
        abn_status: AbnStatus::Active,
        ubo_count: 2,
        any_ubo_pep: false,
        any_ubo_sanctioned: false,
    }
}

/// A sanctioned UBO blocks regardless of everything else.
#[test]
fn sanctioned_ubo_blocks() {
    let factors = BusinessRiskFactors {
        any_ubo_sanctioned: true,
        ..clean_company()
    };
    let decision = should_block_business(&factors);
    assert!(decision.blocked);
    assert!(decision.reason.unwrap().contains("sanctioned"));
}

/// A cancelled or deleted ABN blocks regardless of score.
#[test]
fn dead_abn_blocks() {
    for status in [AbnStatus::Cancelled, AbnStatus::Deleted] {
        let factors = BusinessRiskFactors {
            abn_status: status,
            ..clean_company()
        };
        assert!(should_block_business(&factors).blocked, "{status:?} should block");
    }
}

/// An active ABN with clean UBOs never blocks, even at a high score.
#[test]
fn high_score_alone_does_not_block() {
    let factors = BusinessRiskFactors {
        entity_type: EntityType::Trust,
        industry_code: "9201".to_string(),
        ubo_count: 6,
        any_ubo_pep: true,
        ..clean_company()
    };
    assert!(score_business(&factors) >= 70);
    assert!(!should_block_business(&factors).blocked);
}

/// A plain active sole trader in a low-risk industry scores low.
#[test]
fn clean_sole_trader_scores_low() {
    let factors = BusinessRiskFactors {
        entity_type: EntityType::SoleTrader,
        ubo_count: 1,
        ..clean_company()
    };
    let score = score_business(&factors);
    assert!(score < 40, "expected low-tier score, got {score}");
    assert_eq!(RiskLevel::from_score(score), RiskLevel::Low);
}

/// Every adverse factor at once clamps at 100.
#[test]
fn business_score_clamped_at_100() {
    let factors = BusinessRiskFactors {
        entity_type: EntityType::Trust,
        industry_code: "9201".to_string(),
        abn_status: AbnStatus::Cancelled,
        ubo_count: 8,
        any_ubo_pep: true,
        any_ubo_sanctioned: true,
    };
    assert_eq!(score_business(&factors), 100);
}

/// Trusts carry more entity-type weight than public companies.
#[test]
fn trust_scores_above_public_company() {
    let trust = score_business(&BusinessRiskFactors {
        entity_type: EntityType::Trust,
        ..clean_company()
    });
    let public = score_business(&BusinessRiskFactors {
        entity_type: EntityType::PublicCompany,
        ..clean_company()
    });
    assert!(trust > public);
}

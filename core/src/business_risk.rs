//! Business-entity risk scorer.
//!
//! Same additive point model as the transaction scorer, extended with the
//! attributes that matter for a business counterparty: entity type, industry
//! code, ABN status, beneficial-owner count, and UBO PEP/sanctions flags.
//!
//! A separate hard-block predicate sits outside the score: a sanctioned UBO
//! or a dead ABN stops the transaction regardless of how the points add up.

use crate::risk_scoring::RiskLevel;
use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

const POINTS_ENTITY_TRUST: u8 = 20;
const POINTS_ENTITY_PARTNERSHIP: u8 = 10;
const POINTS_ENTITY_PRIVATE_COMPANY: u8 = 10;
const POINTS_ENTITY_PUBLIC_COMPANY: u8 = 5;
const POINTS_ENTITY_SOLE_TRADER: u8 = 5;

const POINTS_CASH_INTENSIVE_INDUSTRY: u8 = 15;
const POINTS_ABN_NOT_ACTIVE: u8 = 25;

const POINTS_UBO_COUNT_5_PLUS: u8 = 15;
const POINTS_UBO_COUNT_3_PLUS: u8 = 10;

const POINTS_UBO_PEP: u8 = 25;
const POINTS_UBO_SANCTIONED: u8 = 40;

/// ANZSIC divisions treated as cash-intensive: jewellery and watch retail,
/// cafes and takeaway, pubs and casinos, money services.
const CASH_INTENSIVE_INDUSTRIES: &[&str] = &["4253", "4511", "4512", "4520", "9201", "6419"];

// ── Inputs and outputs ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    SoleTrader,
    Partnership,
    PrivateCompany,
    PublicCompany,
    Trust,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::SoleTrader => "sole_trader",
            EntityType::Partnership => "partnership",
            EntityType::PrivateCompany => "private_company",
            EntityType::PublicCompany => "public_company",
            EntityType::Trust => "trust",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sole_trader" => Some(EntityType::SoleTrader),
            "partnership" => Some(EntityType::Partnership),
            "private_company" => Some(EntityType::PrivateCompany),
            "public_company" => Some(EntityType::PublicCompany),
            "trust" => Some(EntityType::Trust),
            _ => None,
        }
    }
}

/// ABN registration status as reported by the ABR lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbnStatus {
    Active,
    Cancelled,
    Deleted,
}

impl AbnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbnStatus::Active => "active",
            AbnStatus::Cancelled => "cancelled",
            AbnStatus::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(AbnStatus::Active),
            "cancelled" => Some(AbnStatus::Cancelled),
            "deleted" => Some(AbnStatus::Deleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRiskFactors {
    pub entity_type: EntityType,
    /// ANZSIC industry code.
    pub industry_code: String,
    pub abn_status: AbnStatus,
    /// Ultimate beneficial owners on record.
    pub ubo_count: u32,
    pub any_ubo_pep: bool,
    pub any_ubo_sanctioned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDecision {
    pub blocked: bool,
    pub reason: Option<String>,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Sum the business factor weights, clamped to 100. Tier cutoffs are shared
/// with the transaction scorer.
pub fn score_business(factors: &BusinessRiskFactors) -> u8 {
    let mut score: u32 = match factors.entity_type {
        EntityType::Trust => POINTS_ENTITY_TRUST,
        EntityType::Partnership => POINTS_ENTITY_PARTNERSHIP,
        EntityType::PrivateCompany => POINTS_ENTITY_PRIVATE_COMPANY,
        EntityType::PublicCompany => POINTS_ENTITY_PUBLIC_COMPANY,
        EntityType::SoleTrader => POINTS_ENTITY_SOLE_TRADER,
    } as u32;

    if is_cash_intensive(&factors.industry_code) {
        score += POINTS_CASH_INTENSIVE_INDUSTRY as u32;
    }
    if factors.abn_status != AbnStatus::Active {
        score += POINTS_ABN_NOT_ACTIVE as u32;
    }
    if factors.ubo_count >= 5 {
        score += POINTS_UBO_COUNT_5_PLUS as u32;
    } else if factors.ubo_count >= 3 {
        score += POINTS_UBO_COUNT_3_PLUS as u32;
    }
    if factors.any_ubo_pep {
        score += POINTS_UBO_PEP as u32;
    }
    if factors.any_ubo_sanctioned {
        score += POINTS_UBO_SANCTIONED as u32;
    }

    score.min(100) as u8
}

pub fn business_risk_level(score: u8) -> RiskLevel {
    RiskLevel::from_score(score)
}

/// Binary override, independent of score: a sanctioned beneficial owner or
/// an ABN that is no longer registered blocks the transaction outright.
pub fn should_block_business(factors: &BusinessRiskFactors) -> BlockDecision {
    if factors.any_ubo_sanctioned {
        return BlockDecision {
            blocked: true,
            reason: Some("sanctioned ultimate beneficial owner".to_string()),
        };
    }
    if matches!(factors.abn_status, AbnStatus::Cancelled | AbnStatus::Deleted) {
        return BlockDecision {
            blocked: true,
            reason: Some(format!("ABN status is {}", factors.abn_status.as_str())),
        };
    }
    BlockDecision {
        blocked: false,
        reason: None,
    }
}

pub fn is_cash_intensive(industry_code: &str) -> bool {
    CASH_INTENSIVE_INDUSTRIES.contains(&industry_code)
}

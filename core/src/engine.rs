//! The compliance decision engine.
//!
//! One entry point: `assess()` takes a proposed transaction and returns the
//! decision. ORDER (fixed, documented, never reordered):
//!   1. Load the customer — unknown customers are an error, not a decision.
//!   2. Threshold lookup (KYC / TTR / EDD flags).
//!   3. Structuring check over the trailing 7-day window.
//!   4. Transaction risk score (structuring feeds the unusual-pattern flag).
//!   5. Sanctions / PEP screening of the customer name.
//!   6. Business risk score and hard block, when a business profile exists.
//!   7. Outcome resolution: Blocked > RequiresKyc > Escalated > Approved.
//!   8. Persist the transaction row, raise TTR/SMR/EDD records, append the
//!      audit events.
//!
//! RULES:
//!   - The engine never deletes rows; review actions mutate flags only.
//!   - All SQL goes through the store.
//!   - Scores are recomputed per assessment, never read back as a cache.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    business_risk::{self, AbnStatus, BlockDecision, BusinessRiskFactors, EntityType},
    config::EngineConfig,
    edd,
    error::{ComplianceError, ComplianceResult},
    event::{AuditLogEntry, ComplianceEvent},
    reporting::{self, SmrReason},
    risk_scoring::{self, RiskFactors, RiskLevel},
    screening::{self, ScreeningHit, ScreeningList},
    store::{BusinessProfileRow, ComplianceStore, ScreeningResultRow, TransactionRow},
    structuring::{self, StructuringAssessment, STRUCTURING_LOOKBACK_DAYS},
    thresholds::{check_thresholds, ThresholdFlags},
    types::{CustomerId, TransactionId},
};

// ── Inputs and outputs ───────────────────────────────────────────────────────

/// A proposed purchase, before any compliance flag is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub transaction_id: TransactionId,
    pub customer_id: CustomerId,
    /// AUD amount.
    pub amount: f64,
    pub currency: String,
    pub occurred_at: DateTime<Utc>,
    /// Cross-border delivery or payment.
    pub is_international: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approved,
    RequiresKyc,
    Escalated,
    Blocked,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Approved => "approved",
            DecisionOutcome::RequiresKyc => "requires_kyc",
            DecisionOutcome::Escalated => "escalated",
            DecisionOutcome::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub block: BlockDecision,
}

/// Everything `assess()` decided, for the caller to act on. The same facts
/// are already persisted by the time this is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceDecision {
    pub outcome: DecisionOutcome,
    pub thresholds: ThresholdFlags,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub structuring: StructuringAssessment,
    pub screening_hits: Vec<ScreeningHit>,
    pub business: Option<BusinessAssessment>,
    pub ttr_id: Option<String>,
    pub smr_id: Option<String>,
    pub investigation_id: Option<String>,
}

// ── Engine ───────────────────────────────────────────────────────────────────

pub struct ComplianceEngine {
    pub store: ComplianceStore,
    config: EngineConfig,
}

impl ComplianceEngine {
    pub fn new(store: ComplianceStore, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// In-memory engine with defaults and migrations applied. Used in tests.
    pub fn build_test() -> ComplianceResult<Self> {
        let store = ComplianceStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(store, EngineConfig::default()))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assess a proposed transaction and persist the decision.
    pub fn assess(&self, input: &TransactionInput) -> ComplianceResult<ComplianceDecision> {
        let customer = self.store.get_customer(&input.customer_id)?.ok_or_else(|| {
            ComplianceError::CustomerNotFound {
                customer_id: input.customer_id.clone(),
            }
        })?;
        let at = input.occurred_at;

        // 2. Threshold lookup.
        let flags = check_thresholds(input.amount);

        // 3. Structuring over the trailing window. The current transaction
        //    is not yet persisted, so the window is history only.
        let window_from = (at - Duration::days(STRUCTURING_LOOKBACK_DAYS)).timestamp();
        let window_rows =
            self.store
                .transactions_in_window(&input.customer_id, window_from, at.timestamp())?;
        let window_amounts: Vec<f64> = window_rows.iter().map(|t| t.amount).collect();
        let structuring = structuring::evaluate(input.amount, &window_amounts);

        // 4. Transaction risk score.
        let repeat_from = (at - Duration::days(self.config.repeat_window_days)).timestamp();
        let prior_count =
            self.store
                .count_transactions_in_window(&input.customer_id, repeat_from, at.timestamp())?;
        let factors = RiskFactors {
            amount: input.amount,
            account_age_days: (at.timestamp() - customer.created_at) / 86_400,
            is_international: input.is_international || customer.is_international,
            is_repeat_transaction: prior_count > 0,
            unusual_pattern: structuring.flagged,
        };
        let risk_score = risk_scoring::score_transaction(&factors);
        let risk_level = RiskLevel::from_score(risk_score);

        // 5. Sanctions / PEP screening.
        let screening_hits = self.screen_customer(&input.customer_id, &customer.full_name, at)?;
        let sanctions_hit = screening_hits
            .iter()
            .find(|h| h.list == ScreeningList::Sanctions);
        let sanctions_exact = sanctions_hit.map(|h| h.exact).unwrap_or(false);

        // 6. Business risk, when a profile exists.
        let business = match self.store.get_business_profile(&input.customer_id)? {
            Some(profile) => Some(self.assess_business(&profile)?),
            None => None,
        };

        // 7. Outcome resolution.
        let block_reason = if sanctions_exact {
            Some("exact sanctions watchlist match".to_string())
        } else {
            business
                .as_ref()
                .filter(|b| b.block.blocked)
                .and_then(|b| b.block.reason.clone())
        };

        let escalation_reason = self.escalation_reason(risk_level, &structuring, &flags, &business);

        let outcome = if block_reason.is_some() {
            DecisionOutcome::Blocked
        } else if flags.requires_kyc && customer.verification_status != "verified" {
            DecisionOutcome::RequiresKyc
        } else if escalation_reason.is_some() {
            DecisionOutcome::Escalated
        } else {
            DecisionOutcome::Approved
        };

        // 8. Persist. The transaction row is written for every outcome,
        //    blocked included — audit rows are never deleted.
        let flagged_for_review = !matches!(outcome, DecisionOutcome::Approved) || structuring.flagged;
        self.store.insert_transaction(&TransactionRow {
            transaction_id: input.transaction_id.clone(),
            customer_id: input.customer_id.clone(),
            amount: input.amount,
            currency: input.currency.clone(),
            occurred_at: at.timestamp(),
            requires_kyc: flags.requires_kyc,
            requires_ttr: flags.requires_ttr,
            requires_enhanced_dd: flags.requires_enhanced_dd,
            flagged_for_review,
            outcome: outcome.as_str().to_string(),
            risk_score: risk_score as i64,
        })?;
        self.store
            .update_customer_risk(&input.customer_id, risk_score as i64, risk_level.as_str())?;

        if structuring.flagged {
            self.append(
                ComplianceEvent::StructuringDetected {
                    transaction_id: input.transaction_id.clone(),
                    customer_id: input.customer_id.clone(),
                    band_count: structuring.band_count,
                    window_total: structuring.window_total,
                },
                at,
            )?;
            log::warn!(
                "Structuring pattern for customer {}: {} band transactions, ${:.2} window total",
                input.customer_id,
                structuring.band_count,
                structuring.window_total
            );
        }

        // TTRs apply to transactions that settle; a blocked transaction
        // never settles.
        let mut ttr_id = None;
        if flags.requires_ttr && self.config.auto_raise_ttr && outcome != DecisionOutcome::Blocked {
            let ttr = reporting::raise_ttr(
                &self.store,
                &input.transaction_id,
                &input.customer_id,
                input.amount,
                at,
            )?;
            self.append(
                ComplianceEvent::TtrRaised {
                    ttr_id: ttr.ttr_id.clone(),
                    transaction_id: input.transaction_id.clone(),
                    customer_id: input.customer_id.clone(),
                    amount: input.amount,
                    deadline: ttr.deadline,
                },
                at,
            )?;
            ttr_id = Some(ttr.ttr_id);
        }

        let mut smr_id = None;
        if sanctions_hit.is_some() || structuring.flagged {
            let (reason, detail) = match sanctions_hit {
                Some(hit) => (
                    SmrReason::SanctionsMatch,
                    format!(
                        "Matched '{}' with score {:.2}.",
                        hit.matched_name, hit.score
                    ),
                ),
                None => (
                    SmrReason::Structuring,
                    structuring.reason.clone().unwrap_or_default(),
                ),
            };
            let smr = reporting::raise_smr(
                &self.store,
                &input.customer_id,
                Some(&input.transaction_id),
                reason,
                &detail,
                at,
            )?;
            self.append(
                ComplianceEvent::SmrRaised {
                    smr_id: smr.smr_id.clone(),
                    customer_id: input.customer_id.clone(),
                    reason: reason.as_str().to_string(),
                },
                at,
            )?;
            smr_id = Some(smr.smr_id);
        }

        let mut investigation_id = None;
        if outcome == DecisionOutcome::Escalated {
            let reason = escalation_reason.clone().unwrap_or_default();
            // Reuse the open investigation if one exists; the invariant is
            // one open investigation per customer.
            let inv = match self.store.get_open_investigation(&input.customer_id)? {
                Some(existing) => existing,
                None => {
                    let opened = edd::open_investigation(&self.store, &input.customer_id, &reason, at)?;
                    self.append(
                        ComplianceEvent::EddOpened {
                            investigation_id: opened.investigation_id.clone(),
                            customer_id: input.customer_id.clone(),
                            reason,
                        },
                        at,
                    )?;
                    opened
                }
            };
            investigation_id = Some(inv.investigation_id);
        }

        match outcome {
            DecisionOutcome::Blocked => {
                let reason = block_reason.clone().unwrap_or_default();
                self.append(
                    ComplianceEvent::TransactionBlocked {
                        transaction_id: input.transaction_id.clone(),
                        customer_id: input.customer_id.clone(),
                        reason: reason.clone(),
                    },
                    at,
                )?;
                log::warn!(
                    "Transaction {} blocked for customer {}: {}",
                    input.transaction_id,
                    input.customer_id,
                    reason
                );
            }
            DecisionOutcome::RequiresKyc => {
                self.append(
                    ComplianceEvent::KycRequired {
                        transaction_id: input.transaction_id.clone(),
                        customer_id: input.customer_id.clone(),
                        amount: input.amount,
                    },
                    at,
                )?;
            }
            _ => {}
        }

        self.append(
            ComplianceEvent::TransactionAssessed {
                transaction_id: input.transaction_id.clone(),
                customer_id: input.customer_id.clone(),
                amount: input.amount,
                outcome: outcome.as_str().to_string(),
                risk_score,
                risk_level: risk_level.as_str().to_string(),
            },
            at,
        )?;
        log::info!(
            "Transaction {} assessed: {} (score {}, {})",
            input.transaction_id,
            outcome.as_str(),
            risk_score,
            risk_level.as_str()
        );

        Ok(ComplianceDecision {
            outcome,
            thresholds: flags,
            risk_score,
            risk_level,
            structuring,
            screening_hits,
            business,
            ttr_id,
            smr_id,
            investigation_id,
        })
    }

    /// Record a KYC outcome for a customer. Direct admin action.
    pub fn complete_kyc(
        &self,
        customer_id: &CustomerId,
        approved: bool,
        at: DateTime<Utc>,
    ) -> ComplianceResult<()> {
        let status = if approved { "verified" } else { "rejected" };
        let updated = self.store.set_verification_status(customer_id, status)?;
        if !updated {
            return Err(ComplianceError::CustomerNotFound {
                customer_id: customer_id.clone(),
            });
        }
        self.append(
            ComplianceEvent::KycCompleted {
                customer_id: customer_id.clone(),
                approved,
            },
            at,
        )?;
        Ok(())
    }

    /// Resolve a flagged transaction after manual review. Direct admin
    /// action: clears the review flag and records the final outcome.
    pub fn review_transaction(
        &self,
        transaction_id: &TransactionId,
        approved: bool,
        at: DateTime<Utc>,
    ) -> ComplianceResult<()> {
        let outcome = if approved { "approved" } else { "blocked" };
        let updated = self
            .store
            .set_transaction_review(transaction_id, false, outcome)?;
        if !updated {
            return Err(ComplianceError::TransactionNotFound {
                transaction_id: transaction_id.clone(),
            });
        }
        self.append(
            ComplianceEvent::TransactionReviewed {
                transaction_id: transaction_id.clone(),
                approved,
            },
            at,
        )?;
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn screen_customer(
        &self,
        customer_id: &CustomerId,
        full_name: &str,
        at: DateTime<Utc>,
    ) -> ComplianceResult<Vec<ScreeningHit>> {
        let watchlist = self.store.get_watchlist()?;
        let pep_registry = self.store.get_pep_registry()?;
        let hits = screening::screen_name(full_name, &watchlist, &pep_registry, &self.config.screening);

        for hit in &hits {
            self.store.insert_screening_result(&ScreeningResultRow {
                screening_id: format!("scr-{}", Uuid::new_v4()),
                customer_id: customer_id.clone(),
                screened_at: at.timestamp(),
                list: hit.list.as_str().to_string(),
                list_ref: hit.list_ref.clone(),
                matched_name: hit.matched_name.clone(),
                match_score: hit.score,
                exact: hit.exact,
            })?;
            self.append(
                ComplianceEvent::ScreeningHit {
                    customer_id: customer_id.clone(),
                    list: hit.list.as_str().to_string(),
                    list_ref: hit.list_ref.clone(),
                    matched_name: hit.matched_name.clone(),
                    match_score: hit.score,
                },
                at,
            )?;
            if hit.list == ScreeningList::Pep {
                self.store.set_pep_flag(customer_id, true)?;
            }
            log::warn!(
                "Screening hit for customer {}: {} '{}' ({:.2})",
                customer_id,
                hit.list.as_str(),
                hit.matched_name,
                hit.score
            );
        }

        Ok(hits)
    }

    fn assess_business(&self, profile: &BusinessProfileRow) -> ComplianceResult<BusinessAssessment> {
        let entity_type = EntityType::parse(&profile.entity_type).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown entity type '{}' for customer {}",
                profile.entity_type,
                profile.customer_id
            )
        })?;
        let abn_status = AbnStatus::parse(&profile.abn_status).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown ABN status '{}' for customer {}",
                profile.abn_status,
                profile.customer_id
            )
        })?;
        let factors = BusinessRiskFactors {
            entity_type,
            industry_code: profile.industry_code.clone(),
            abn_status,
            ubo_count: profile.ubo_count.max(0) as u32,
            any_ubo_pep: profile.any_ubo_pep,
            any_ubo_sanctioned: profile.any_ubo_sanctioned,
        };
        let score = business_risk::score_business(&factors);
        Ok(BusinessAssessment {
            score,
            level: business_risk::business_risk_level(score),
            block: business_risk::should_block_business(&factors),
        })
    }

    fn escalation_reason(
        &self,
        risk_level: RiskLevel,
        structuring: &StructuringAssessment,
        flags: &ThresholdFlags,
        business: &Option<BusinessAssessment>,
    ) -> Option<String> {
        if structuring.flagged {
            return Some("structuring pattern in trailing 7-day window".to_string());
        }
        if risk_level == RiskLevel::High {
            return Some("high transaction risk score".to_string());
        }
        if flags.requires_enhanced_dd {
            return Some("amount above the enhanced due diligence threshold".to_string());
        }
        if let Some(b) = business {
            if b.level == RiskLevel::High {
                return Some("high business entity risk score".to_string());
            }
        }
        None
    }

    fn append(&self, event: ComplianceEvent, at: DateTime<Utc>) -> ComplianceResult<()> {
        self.store.append_event(&AuditLogEntry {
            id: None,
            event_type: event.type_name().to_string(),
            payload: serde_json::to_string(&event)?,
            created_at: at.timestamp(),
        })
    }
}

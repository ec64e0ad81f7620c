//! aml-core: AML/CTF compliance decision engine for a bullion dealer.
//!
//! The engine decides, per transaction, whether settlement is approved,
//! identity verification is required, reporting is triggered, the matter
//! must be escalated to enhanced due diligence, or the transaction is
//! hard-blocked. Decisions and their supporting records (TTRs, SMRs,
//! screening results, investigations) are persisted to SQLite with an
//! append-only audit log.

pub mod business_risk;
pub mod config;
pub mod edd;
pub mod engine;
pub mod error;
pub mod event;
pub mod reporting;
pub mod risk_scoring;
pub mod screening;
pub mod store;
pub mod structuring;
pub mod thresholds;
pub mod types;

//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Domain modules and the engine call store methods — they never execute SQL
//! directly. Transaction and audit rows are append-only: there is no delete
//! anywhere in this module.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{
    error::ComplianceResult,
    event::AuditLogEntry,
    types::{CustomerId, TransactionId, UnixSeconds},
};

mod edd;
mod reporting;
mod screening;

pub struct ComplianceStore {
    conn: Connection,
}

impl ComplianceStore {
    pub fn open(path: &str) -> ComplianceResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ComplianceResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ComplianceResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_screening.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_reporting.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/004_edd.sql"))?;
        Ok(())
    }

    // ── Audit log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &AuditLogEntry) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO audit_log (event_type, payload, created_at)
             VALUES (?1, ?2, ?3)",
            params![entry.event_type, entry.payload, entry.created_at],
        )?;
        Ok(())
    }

    pub fn events_by_type(&self, event_type: &str) -> ComplianceResult<Vec<AuditLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_type, payload, created_at
             FROM audit_log WHERE event_type = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![event_type], |row| {
                Ok(AuditLogEntry {
                    id: Some(row.get(0)?),
                    event_type: row.get(1)?,
                    payload: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn audit_event_count(&self) -> ComplianceResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |r| r.get(0))?)
    }

    // ── Customers ──────────────────────────────────────────────

    pub fn insert_customer(&self, row: &CustomerRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO customer (
                 customer_id, full_name, created_at, verification_status,
                 risk_level, risk_score, is_pep, is_international,
                 country_code, source_of_funds
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
            params![
                row.customer_id,
                row.full_name,
                row.created_at,
                row.verification_status,
                row.risk_level,
                row.risk_score,
                row.is_pep,
                row.is_international,
                row.country_code,
                row.source_of_funds,
            ],
        )?;
        Ok(())
    }

    pub fn get_customer(&self, customer_id: &str) -> ComplianceResult<Option<CustomerRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, full_name, created_at, verification_status,
                    risk_level, risk_score, is_pep, is_international,
                    country_code, source_of_funds
             FROM customer WHERE customer_id = ?1",
        )?;
        let row = stmt
            .query_row(params![customer_id], |r| {
                Ok(CustomerRow {
                    customer_id: r.get(0)?,
                    full_name: r.get(1)?,
                    created_at: r.get(2)?,
                    verification_status: r.get(3)?,
                    risk_level: r.get(4)?,
                    risk_score: r.get(5)?,
                    is_pep: r.get(6)?,
                    is_international: r.get(7)?,
                    country_code: r.get(8)?,
                    source_of_funds: r.get(9)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    pub fn set_verification_status(
        &self,
        customer_id: &str,
        status: &str,
    ) -> ComplianceResult<bool> {
        let n = self.conn.execute(
            "UPDATE customer SET verification_status = ?2 WHERE customer_id = ?1",
            params![customer_id, status],
        )?;
        Ok(n > 0)
    }

    /// Persist the latest assessment's score for reference. The score is
    /// recomputed on every assessment, never read back as a cache.
    pub fn update_customer_risk(
        &self,
        customer_id: &str,
        risk_score: i64,
        risk_level: &str,
    ) -> ComplianceResult<()> {
        self.conn.execute(
            "UPDATE customer SET risk_score = ?2, risk_level = ?3 WHERE customer_id = ?1",
            params![customer_id, risk_score, risk_level],
        )?;
        Ok(())
    }

    pub fn set_pep_flag(&self, customer_id: &str, is_pep: bool) -> ComplianceResult<()> {
        self.conn.execute(
            "UPDATE customer SET is_pep = ?2 WHERE customer_id = ?1",
            params![customer_id, is_pep],
        )?;
        Ok(())
    }

    pub fn customer_count(&self) -> ComplianceResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM customer", [], |r| r.get(0))?)
    }

    // ── Business profiles ──────────────────────────────────────

    pub fn insert_business_profile(&self, row: &BusinessProfileRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO business_profile (
                 customer_id, legal_name, entity_type, abn, abn_status,
                 industry_code, ubo_count, any_ubo_pep, any_ubo_sanctioned
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                row.customer_id,
                row.legal_name,
                row.entity_type,
                row.abn,
                row.abn_status,
                row.industry_code,
                row.ubo_count,
                row.any_ubo_pep,
                row.any_ubo_sanctioned,
            ],
        )?;
        Ok(())
    }

    pub fn get_business_profile(
        &self,
        customer_id: &str,
    ) -> ComplianceResult<Option<BusinessProfileRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, legal_name, entity_type, abn, abn_status,
                    industry_code, ubo_count, any_ubo_pep, any_ubo_sanctioned
             FROM business_profile WHERE customer_id = ?1",
        )?;
        let row = stmt
            .query_row(params![customer_id], |r| {
                Ok(BusinessProfileRow {
                    customer_id: r.get(0)?,
                    legal_name: r.get(1)?,
                    entity_type: r.get(2)?,
                    abn: r.get(3)?,
                    abn_status: r.get(4)?,
                    industry_code: r.get(5)?,
                    ubo_count: r.get(6)?,
                    any_ubo_pep: r.get(7)?,
                    any_ubo_sanctioned: r.get(8)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    // ── Transactions ───────────────────────────────────────────

    pub fn insert_transaction(&self, row: &TransactionRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO txn (
                 transaction_id, customer_id, amount, currency, occurred_at,
                 requires_kyc, requires_ttr, requires_enhanced_dd,
                 flagged_for_review, outcome, risk_score
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
            params![
                row.transaction_id,
                row.customer_id,
                row.amount,
                row.currency,
                row.occurred_at,
                row.requires_kyc,
                row.requires_ttr,
                row.requires_enhanced_dd,
                row.flagged_for_review,
                row.outcome,
                row.risk_score,
            ],
        )?;
        Ok(())
    }

    pub fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> ComplianceResult<Option<TransactionRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_id, customer_id, amount, currency, occurred_at,
                    requires_kyc, requires_ttr, requires_enhanced_dd,
                    flagged_for_review, outcome, risk_score
             FROM txn WHERE transaction_id = ?1",
        )?;
        let row = stmt
            .query_row(params![transaction_id], Self::map_transaction)
            .optional()?;
        Ok(row)
    }

    /// All of a customer's transactions with `from < occurred_at <= to`,
    /// oldest first. Used for the structuring lookback window.
    pub fn transactions_in_window(
        &self,
        customer_id: &str,
        from: UnixSeconds,
        to: UnixSeconds,
    ) -> ComplianceResult<Vec<TransactionRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_id, customer_id, amount, currency, occurred_at,
                    requires_kyc, requires_ttr, requires_enhanced_dd,
                    flagged_for_review, outcome, risk_score
             FROM txn
             WHERE customer_id = ?1 AND occurred_at > ?2 AND occurred_at <= ?3
             ORDER BY occurred_at ASC",
        )?;
        let rows = stmt
            .query_map(params![customer_id, from, to], Self::map_transaction)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_transactions_in_window(
        &self,
        customer_id: &str,
        from: UnixSeconds,
        to: UnixSeconds,
    ) -> ComplianceResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM txn
             WHERE customer_id = ?1 AND occurred_at > ?2 AND occurred_at <= ?3",
            params![customer_id, from, to],
            |r| r.get(0),
        )?)
    }

    pub fn set_transaction_review(
        &self,
        transaction_id: &str,
        flagged_for_review: bool,
        outcome: &str,
    ) -> ComplianceResult<bool> {
        let n = self.conn.execute(
            "UPDATE txn SET flagged_for_review = ?2, outcome = ?3 WHERE transaction_id = ?1",
            params![transaction_id, flagged_for_review, outcome],
        )?;
        Ok(n > 0)
    }

    pub fn transaction_count(&self) -> ComplianceResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM txn", [], |r| r.get(0))?)
    }

    fn map_transaction(r: &rusqlite::Row<'_>) -> rusqlite::Result<TransactionRow> {
        Ok(TransactionRow {
            transaction_id: r.get(0)?,
            customer_id: r.get(1)?,
            amount: r.get(2)?,
            currency: r.get(3)?,
            occurred_at: r.get(4)?,
            requires_kyc: r.get(5)?,
            requires_ttr: r.get(6)?,
            requires_enhanced_dd: r.get(7)?,
            flagged_for_review: r.get(8)?,
            outcome: r.get(9)?,
            risk_score: r.get(10)?,
        })
    }
}

// ── Row types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRow {
    pub customer_id: CustomerId,
    pub full_name: String,
    pub created_at: UnixSeconds,
    /// unverified | pending | verified | rejected
    pub verification_status: String,
    pub risk_level: String,
    pub risk_score: i64,
    pub is_pep: bool,
    pub is_international: bool,
    pub country_code: String,
    pub source_of_funds: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfileRow {
    pub customer_id: CustomerId,
    pub legal_name: String,
    pub entity_type: String,
    pub abn: String,
    pub abn_status: String,
    pub industry_code: String,
    pub ubo_count: i64,
    pub any_ubo_pep: bool,
    pub any_ubo_sanctioned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
    pub transaction_id: TransactionId,
    pub customer_id: CustomerId,
    pub amount: f64,
    pub currency: String,
    pub occurred_at: UnixSeconds,
    pub requires_kyc: bool,
    pub requires_ttr: bool,
    pub requires_enhanced_dd: bool,
    pub flagged_for_review: bool,
    /// approved | requires_kyc | escalated | blocked
    pub outcome: String,
    pub risk_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntryRow {
    pub entry_id: String,
    pub full_name: String,
    /// Sanctions program the entry belongs to, e.g. "DFAT Consolidated".
    pub program: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PepEntryRow {
    pub pep_id: String,
    pub full_name: String,
    pub position: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResultRow {
    pub screening_id: String,
    pub customer_id: CustomerId,
    pub screened_at: UnixSeconds,
    /// sanctions | pep
    pub list: String,
    pub list_ref: String,
    pub matched_name: String,
    pub match_score: f64,
    pub exact: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtrReportRow {
    pub ttr_id: String,
    pub transaction_id: TransactionId,
    pub customer_id: CustomerId,
    pub amount: f64,
    pub detected_at: UnixSeconds,
    pub deadline: UnixSeconds,
    /// pending | filed
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmrReportRow {
    pub smr_id: String,
    pub customer_id: CustomerId,
    pub transaction_id: Option<TransactionId>,
    pub reason: String,
    pub narrative: String,
    pub detected_at: UnixSeconds,
    pub deadline: UnixSeconds,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EddInvestigationRow {
    pub investigation_id: String,
    pub customer_id: CustomerId,
    pub reason: String,
    /// open | awaiting_information | under_review | cleared | escalated
    pub status: String,
    pub opened_at: UnixSeconds,
    pub closed_at: Option<UnixSeconds>,
    pub notes: Option<String>,
}

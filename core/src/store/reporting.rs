use super::{ComplianceStore, SmrReportRow, TtrReportRow};
use crate::error::ComplianceResult;
use rusqlite::{params, OptionalExtension};

impl ComplianceStore {
    // ── ttr_report ────────────────────────────────────────────────────────

    pub fn insert_ttr(&self, row: &TtrReportRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO ttr_report (
                 ttr_id, transaction_id, customer_id, amount,
                 detected_at, deadline, status
             ) VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                row.ttr_id,
                row.transaction_id,
                row.customer_id,
                row.amount,
                row.detected_at,
                row.deadline,
                row.status,
            ],
        )?;
        Ok(())
    }

    pub fn get_ttr_for_transaction(
        &self,
        transaction_id: &str,
    ) -> ComplianceResult<Option<TtrReportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT ttr_id, transaction_id, customer_id, amount,
                    detected_at, deadline, status
             FROM ttr_report WHERE transaction_id = ?1",
        )?;
        let row = stmt
            .query_row(params![transaction_id], Self::map_ttr)
            .optional()?;
        Ok(row)
    }

    pub fn pending_ttrs(&self) -> ComplianceResult<Vec<TtrReportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT ttr_id, transaction_id, customer_id, amount,
                    detected_at, deadline, status
             FROM ttr_report WHERE status = 'pending'
             ORDER BY deadline ASC",
        )?;
        let rows = stmt
            .query_map([], Self::map_ttr)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn mark_ttr_filed(&self, ttr_id: &str) -> ComplianceResult<bool> {
        let n = self.conn.execute(
            "UPDATE ttr_report SET status = 'filed' WHERE ttr_id = ?1",
            params![ttr_id],
        )?;
        Ok(n > 0)
    }

    pub fn ttr_count(&self) -> ComplianceResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM ttr_report", [], |r| r.get(0))?)
    }

    fn map_ttr(r: &rusqlite::Row<'_>) -> rusqlite::Result<TtrReportRow> {
        Ok(TtrReportRow {
            ttr_id: r.get(0)?,
            transaction_id: r.get(1)?,
            customer_id: r.get(2)?,
            amount: r.get(3)?,
            detected_at: r.get(4)?,
            deadline: r.get(5)?,
            status: r.get(6)?,
        })
    }

    // ── smr_report ────────────────────────────────────────────────────────

    pub fn insert_smr(&self, row: &SmrReportRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO smr_report (
                 smr_id, customer_id, transaction_id, reason, narrative,
                 detected_at, deadline, status
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                row.smr_id,
                row.customer_id,
                row.transaction_id,
                row.reason,
                row.narrative,
                row.detected_at,
                row.deadline,
                row.status,
            ],
        )?;
        Ok(())
    }

    pub fn smrs_for_customer(&self, customer_id: &str) -> ComplianceResult<Vec<SmrReportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT smr_id, customer_id, transaction_id, reason, narrative,
                    detected_at, deadline, status
             FROM smr_report WHERE customer_id = ?1
             ORDER BY detected_at ASC",
        )?;
        let rows = stmt
            .query_map(params![customer_id], Self::map_smr)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn mark_smr_filed(&self, smr_id: &str) -> ComplianceResult<bool> {
        let n = self.conn.execute(
            "UPDATE smr_report SET status = 'filed' WHERE smr_id = ?1",
            params![smr_id],
        )?;
        Ok(n > 0)
    }

    pub fn smr_count(&self) -> ComplianceResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM smr_report", [], |r| r.get(0))?)
    }

    fn map_smr(r: &rusqlite::Row<'_>) -> rusqlite::Result<SmrReportRow> {
        Ok(SmrReportRow {
            smr_id: r.get(0)?,
            customer_id: r.get(1)?,
            transaction_id: r.get(2)?,
            reason: r.get(3)?,
            narrative: r.get(4)?,
            detected_at: r.get(5)?,
            deadline: r.get(6)?,
            status: r.get(7)?,
        })
    }
}

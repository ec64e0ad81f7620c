use super::{ComplianceStore, EddInvestigationRow};
use crate::error::ComplianceResult;
use rusqlite::{params, OptionalExtension};

impl ComplianceStore {
    pub fn insert_investigation(&self, row: &EddInvestigationRow) -> ComplianceResult<()> {
        self.conn.execute(
            "INSERT INTO edd_investigation (
                 investigation_id, customer_id, reason, status,
                 opened_at, closed_at, notes
             ) VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                row.investigation_id,
                row.customer_id,
                row.reason,
                row.status,
                row.opened_at,
                row.closed_at,
                row.notes,
            ],
        )?;
        Ok(())
    }

    /// The customer's open (non-terminal) investigation, if any.
    pub fn get_open_investigation(
        &self,
        customer_id: &str,
    ) -> ComplianceResult<Option<EddInvestigationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT investigation_id, customer_id, reason, status,
                    opened_at, closed_at, notes
             FROM edd_investigation
             WHERE customer_id = ?1 AND status NOT IN ('cleared', 'escalated')
             ORDER BY opened_at DESC LIMIT 1",
        )?;
        let row = stmt
            .query_row(params![customer_id], Self::map_investigation)
            .optional()?;
        Ok(row)
    }

    pub fn get_investigation(
        &self,
        investigation_id: &str,
    ) -> ComplianceResult<Option<EddInvestigationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT investigation_id, customer_id, reason, status,
                    opened_at, closed_at, notes
             FROM edd_investigation WHERE investigation_id = ?1",
        )?;
        let row = stmt
            .query_row(params![investigation_id], Self::map_investigation)
            .optional()?;
        Ok(row)
    }

    pub fn set_investigation_status(
        &self,
        investigation_id: &str,
        status: &str,
        closed_at: Option<i64>,
        notes: Option<&str>,
    ) -> ComplianceResult<bool> {
        let n = self.conn.execute(
            "UPDATE edd_investigation
             SET status = ?2,
                 closed_at = COALESCE(?3, closed_at),
                 notes = COALESCE(?4, notes)
             WHERE investigation_id = ?1",
            params![investigation_id, status, closed_at, notes],
        )?;
        Ok(n > 0)
    }

    pub fn investigations_for_customer(
        &self,
        customer_id: &str,
    ) -> ComplianceResult<Vec<EddInvestigationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT investigation_id, customer_id, reason, status,
                    opened_at, closed_at, notes
             FROM edd_investigation WHERE customer_id = ?1
             ORDER BY opened_at ASC",
        )?;
        let rows = stmt
            .query_map(params![customer_id], Self::map_investigation)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn open_investigation_count(&self) -> ComplianceResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM edd_investigation
             WHERE status NOT IN ('cleared', 'escalated')",
            [],
            |r| r.get(0),
        )?)
    }

    fn map_investigation(r: &rusqlite::Row<'_>) -> rusqlite::Result<EddInvestigationRow> {
        Ok(EddInvestigationRow {
            investigation_id: r.get(0)?,
            customer_id: r.get(1)?,
            reason: r.get(2)?,
            status: r.get(3)?,
            opened_at: r.get(4)?,
            closed_at: r.get(5)?,
            notes: r.get(6)?,
        })
    }
}
